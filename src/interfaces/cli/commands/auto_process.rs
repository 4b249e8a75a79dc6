//! One-off auto-process run

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::EntryService;
use crate::storage::SeaOrmStorage;

pub async fn run_auto_process(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let service = EntryService::new(storage);
    let counts = service.auto_process_pending().await?;

    println!(
        "{} {} collections and {} disbursements marked processed",
        "✓".bold().green(),
        counts.collections.to_string().cyan(),
        counts.disbursements.to_string().cyan()
    );
    Ok(())
}
