//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Treasury ledger - instrument balances, ledger entries and daily reports
#[derive(Parser)]
#[command(name = "treasury-ledger")]
#[command(version)]
#[command(about = "Treasury back-office ledger service", long_about = None)]
pub struct Cli {
    /// Override the database URL from config
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Mark every pending collection and disbursement as processed
    AutoProcess,

    /// Write the daily deposit report as CSV
    Report {
        /// Report date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// At least 8 characters
        #[arg(long)]
        password: String,

        /// admin, treasury, treasury2, treasury3, accounting, accounting2
        #[arg(long, default_value = "treasury")]
        role: String,
    },

    /// List users
    List,

    /// Remove a user by id
    Remove { id: i64 },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
