//! Date parsing and display for ledger dates

use chrono::NaiveDate;

use crate::errors::{LedgerError, Result};

/// Parse a user-supplied date in `MM/DD/YYYY` or `YYYY-MM-DD` form
pub fn parse_input_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::date_parse("Date is required"));
    }

    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| {
            LedgerError::date_parse(format!(
                "Invalid date '{}'. Use MM/DD/YYYY or YYYY-MM-DD",
                trimmed
            ))
        })
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::date_parse(format!("Invalid date '{}'. Use YYYY-MM-DD", input.trim()))
    })
}

/// `Mon DD, YYYY`, or `N/A` when absent
pub fn format_report_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}
