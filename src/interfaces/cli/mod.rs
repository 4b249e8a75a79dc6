//! CLI interface module

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands, UserCommands};
use crate::errors::LedgerError;
use crate::storage::{SeaOrmStorage, StorageFactory};
use commands::{
    add_user, config_generate, export_report, list_users, remove_user, run_auto_process,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<LedgerError> for CliError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(msg)
            | LedgerError::DateParse(msg)
            | LedgerError::AlreadyTaken(msg) => CliError::ParseError(msg),
            LedgerError::DatabaseConfig(_)
            | LedgerError::DatabaseConnection(_)
            | LedgerError::DatabaseOperation(_) => CliError::StorageError(err.message().to_string()),
            other => CliError::CommandError(other.message().to_string()),
        }
    }
}

async fn open_storage() -> Result<Arc<SeaOrmStorage>, CliError> {
    StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))
}

/// Run a parsed CLI command; `Serve` is handled by the caller
///
/// `config generate` runs without touching the database.
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::AutoProcess => run_auto_process(open_storage().await?).await,

        Commands::Report { date, output } => {
            export_report(open_storage().await?, date, output).await
        }

        Commands::User { action } => {
            let storage = open_storage().await?;
            match action {
                UserCommands::Add {
                    name,
                    email,
                    password,
                    role,
                } => add_user(storage, name, email, password, role).await,
                UserCommands::List => list_users(storage).await,
                UserCommands::Remove { id } => remove_user(storage, id).await,
            }
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve is not a CLI command".to_string(),
        )),
    }
}
