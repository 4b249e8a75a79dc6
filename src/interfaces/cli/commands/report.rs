//! Daily report export

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::ReportService;
use crate::storage::SeaOrmStorage;
use crate::utils::parse_iso_date;

pub async fn export_report(
    storage: Arc<SeaOrmStorage>,
    date: Option<String>,
    output: Option<String>,
) -> Result<(), CliError> {
    let date = date
        .as_deref()
        .map(parse_iso_date)
        .transpose()
        .map_err(|e| CliError::ParseError(e.message().to_string()))?;

    let report = ReportService::new(storage).daily_report(date).await?;
    let csv = report.to_csv()?;

    match output {
        Some(path) => {
            std::fs::write(&path, csv).map_err(|e| {
                CliError::CommandError(format!("Failed to write {}: {}", path, e))
            })?;
            let rows: usize = report.modules.iter().map(|m| m.record_count).sum();
            println!(
                "{} Report for {} written to {} ({} rows)",
                "✓".bold().green(),
                report.report_date,
                path.blue(),
                rows
            );
        }
        None => print!("{}", csv),
    }
    Ok(())
}
