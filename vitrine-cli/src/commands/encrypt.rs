//! Encrypt/Decrypt commands - manage store database encryption

use std::env;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Password};
use vitrine_core::services::{BackupService, EncryptResult, EncryptionService};
use vitrine_core::{LogEvent, STORE_DB};

use super::{get_data_dir, get_logger, log_event};

/// Env var read by encrypt/decrypt when --password is absent
const PASSWORD_ENV: &str = "VITRINE_PASSWORD";

/// Get password from --password flag, VITRINE_PASSWORD env var, or prompt
fn get_password(password_flag: Option<String>, prompt: &str, confirm: bool) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }
    if let Ok(p) = env::var(PASSWORD_ENV) {
        return Ok(p);
    }

    let p1 = Password::new().with_prompt(prompt).interact()?;
    if confirm {
        let p2 = Password::new().with_prompt("Confirm encryption password").interact()?;
        if p1 != p2 {
            anyhow::bail!("Passwords do not match");
        }
    }
    Ok(p1)
}

#[derive(Subcommand)]
pub enum EncryptCommands {
    /// Show encryption status
    Status,
}

fn services() -> Result<(EncryptionService, BackupService)> {
    let data_dir = get_data_dir()?;
    let encryption_service = EncryptionService::new(data_dir.clone(), data_dir.join(STORE_DB));
    let backup_service = BackupService::new(data_dir, STORE_DB);
    Ok((encryption_service, backup_service))
}

fn report(result: Result<EncryptResult>, action: &str, json: bool) -> Result<()> {
    let logger = get_logger();
    match result {
        Ok(result) => {
            log_event(&logger, LogEvent::new(format!("{}_completed", action)).with_command(action));
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", format!("Database {}ed successfully", action).green());
                if let Some(backup_name) = result.backup_name {
                    println!("  Backup created: {}", backup_name);
                }
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new(format!("{}_failed", action))
                    .with_command(action)
                    .with_error(e.to_string()),
            );
            Err(e)
        }
    }
}

pub fn run(command: Option<EncryptCommands>, password: Option<String>, json: bool) -> Result<()> {
    let (encryption_service, backup_service) = services()?;

    match command {
        Some(EncryptCommands::Status) => {
            let status = encryption_service.get_status()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else if status.encrypted {
                println!("{}", "Database is encrypted".green());
            } else {
                println!("{}", "Database is not encrypted".yellow());
            }
            Ok(())
        }
        None => {
            if encryption_service.is_encrypted()? {
                anyhow::bail!("Database is already encrypted. Use 'vt decrypt' first.");
            }

            let interactive = password.is_none() && env::var(PASSWORD_ENV).is_err();
            let pwd = get_password(password, "Enter encryption password", true)?;

            if interactive
                && !Confirm::new()
                    .with_prompt("Are you sure you want to encrypt the database? A backup will be created.")
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }

            report(encryption_service.encrypt(&pwd, &backup_service), "encrypt", json)
        }
    }
}

pub fn run_decrypt(password: Option<String>, json: bool) -> Result<()> {
    let (encryption_service, backup_service) = services()?;

    if !encryption_service.is_encrypted()? {
        anyhow::bail!("Database is not encrypted");
    }

    let pwd = get_password(password, "Enter decryption password", false)?;
    report(encryption_service.decrypt(&pwd, &backup_service), "decrypt", json)
}
