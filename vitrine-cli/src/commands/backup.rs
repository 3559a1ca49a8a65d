//! Backup command - manage store database backups

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use vitrine_core::services::BackupService;
use vitrine_core::{LogEvent, STORE_DB};

use super::{get_data_dir, get_logger, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create {
        /// Maximum number of backups to keep
        #[arg(long, short = 'm')]
        max_backups: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available backups
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore from a backup
    Restore {
        /// Backup name to restore
        name: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear all backups
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Backups work on the database file, so no context is opened
fn get_backup_service() -> Result<BackupService> {
    Ok(BackupService::new(get_data_dir()?, STORE_DB))
}

fn confirm(prompt: String) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

pub fn run(command: BackupCommands) -> Result<()> {
    let backup_service = get_backup_service()?;

    match command {
        BackupCommands::Create { max_backups, json } => {
            let result = backup_service.create(max_backups)?;
            log_event(&get_logger(), LogEvent::new("backup_created").with_command("backup create"));
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", "Backup created".green());
                println!("  Name: {}", result.name);
                println!("  Size: {}", result.size_display());
            }
        }
        BackupCommands::List { json } => {
            let backups = backup_service.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
                return Ok(());
            }

            if backups.is_empty() {
                println!("No backups found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Name", "Created", "Size"]);
            for backup in &backups {
                table.add_row(vec![
                    backup.name.clone(),
                    backup.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    backup.size_display(),
                ]);
            }
            println!("{}", table);
        }
        BackupCommands::Restore { name, force, json } => {
            if !force && !json && !confirm(format!("Restore from backup '{}'?", name))? {
                println!("Cancelled.");
                return Ok(());
            }
            backup_service.restore(&name)?;
            log_event(&get_logger(), LogEvent::new("backup_restored").with_command("backup restore"));
            if json {
                println!("{}", serde_json::json!({ "restored": name }));
            } else {
                println!("Database restored from backup: {}", name);
            }
        }
        BackupCommands::Clear { force, json } => {
            if !force && !json && !confirm("Delete all backups?".to_string())? {
                println!("Cancelled.");
                return Ok(());
            }
            let result = backup_service.clear()?;
            if json {
                println!("{}", serde_json::json!({ "deleted": result.deleted }));
            } else {
                println!("Deleted {} backup(s)", result.deleted);
            }
        }
    }

    Ok(())
}
