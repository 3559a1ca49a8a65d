//! Vitrine CLI - your product catalog in the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{auth, backup, encrypt, logs, products, profile, status};

/// Vitrine - your product catalog in the terminal
#[derive(Parser)]
#[command(name = "vt", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show session and catalog summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in with a known account
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out
    Logout {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: profile::ProfileCommands,
    },

    /// Browse and edit the product catalog
    Products {
        #[command(subcommand)]
        command: products::ProductsCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Manage backups
    Backup {
        #[command(subcommand)]
        command: backup::BackupCommands,
    },

    /// Encrypt the database
    Encrypt {
        /// Subcommand (status) or encrypt the database
        #[command(subcommand)]
        command: Option<encrypt::EncryptCommands>,
        /// Password for encryption
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decrypt the database
    Decrypt {
        /// Password for decryption
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("{:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Login { email, password } => auth::run_login(email, password),
        Commands::Register {
            name,
            email,
            password,
        } => auth::run_register(name, email, password),
        Commands::Logout { force } => auth::run_logout(force),
        Commands::Profile { command } => profile::run(command),
        Commands::Products { command } => products::run(command),
        Commands::Logs { command } => logs::run(command),
        Commands::Backup { command } => backup::run(command),
        Commands::Encrypt {
            command,
            password,
            json,
        } => encrypt::run(command, password, json),
        Commands::Decrypt { password, json } => encrypt::run_decrypt(password, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_product_filters() {
        let cli = Cli::try_parse_from([
            "vt", "products", "list", "--search", "phone", "--min-price", "100.5", "--page", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Products {
                command: products::ProductsCommands::List {
                    search, min_price, page, ..
                },
            } => {
                assert_eq!(search.as_deref(), Some("phone"));
                assert_eq!(min_price.map(|p| p.to_string()).as_deref(), Some("100.5"));
                assert_eq!(page, 2);
            }
            _ => panic!("expected products list"),
        }
    }
}
