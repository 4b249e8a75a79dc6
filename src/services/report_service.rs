//! Daily deposit report
//!
//! One module per instrument kind, in the fixed report order. Only
//! instruments carrying a maturity date are listed.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use csv::{Terminator, WriterBuilder};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::config::get_config;
use crate::errors::{LedgerError, Result};
use crate::storage::{Instrument, InstrumentKind, SeaOrmStorage};
use crate::utils::{format_amount, format_report_date, round_money};

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub id: i64,
    pub name: String,
    pub account_number: String,
    pub acquisition_date: Option<NaiveDate>,
    pub maturity_date: Option<NaiveDate>,
    pub beginning_balance: Decimal,
    pub collection: Decimal,
    pub disbursement: Decimal,
    pub ending_balance: Decimal,
}

impl From<Instrument> for ReportRow {
    fn from(i: Instrument) -> Self {
        Self {
            id: i.id,
            name: i.name,
            account_number: i.account_number,
            acquisition_date: i.acquisition_date,
            maturity_date: i.maturity_date,
            beginning_balance: i.beginning_balance,
            collection: i.collection,
            disbursement: i.disbursement,
            ending_balance: i.ending_balance,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleTotals {
    pub beginning_balance: Decimal,
    pub collection: Decimal,
    pub disbursement: Decimal,
    pub ending_balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportModule {
    pub kind: InstrumentKind,
    pub name: &'static str,
    pub identifier_label: &'static str,
    pub record_count: usize,
    pub rows: Vec<ReportRow>,
    pub totals: ModuleTotals,
}

impl ReportModule {
    pub fn new(kind: InstrumentKind, instruments: Vec<Instrument>) -> Self {
        let rows: Vec<ReportRow> = instruments.into_iter().map(ReportRow::from).collect();

        let mut totals = ModuleTotals::default();
        for row in &rows {
            totals.beginning_balance += row.beginning_balance;
            totals.collection += row.collection;
            totals.disbursement += row.disbursement;
            totals.ending_balance += row.ending_balance;
        }
        totals.beginning_balance = round_money(totals.beginning_balance);
        totals.collection = round_money(totals.collection);
        totals.disbursement = round_money(totals.disbursement);
        totals.ending_balance = round_money(totals.ending_balance);

        Self {
            kind,
            name: kind.display_name(),
            identifier_label: kind.identifier_label(),
            record_count: rows.len(),
            rows,
            totals,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub title: String,
    pub currency: String,
    pub report_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub modules: Vec<ReportModule>,
}

/// Render one CSV record, quoting as needed
fn csv_line<I, T>(fields: I) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| LedgerError::report(format!("Failed to flush CSV writer: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| LedgerError::report(format!("CSV output is not valid UTF-8: {}", e)))
}

impl DailyReport {
    pub fn filename(&self) -> String {
        format!("Daily_Deposit_Report_{}.csv", self.report_date.format("%Y-%m-%d"))
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut out = String::new();

        // title line is free text, not a CSV record
        out.push_str(&format!(
            "{} - {}\n\n",
            self.title,
            format_report_date(Some(self.report_date))
        ));

        out.push_str(&csv_line(["Module Summary"])?);
        out.push_str(&csv_line(["Module", "Record Count"])?);
        for module in &self.modules {
            out.push_str(&csv_line([
                module.name.to_string(),
                module.record_count.to_string(),
            ])?);
        }
        out.push_str("\n\n");

        for module in &self.modules {
            out.push_str(&csv_line([format!("{} Details", module.name)])?);
            out.push_str(&csv_line([
                format!("{} Name", module.name),
                module.identifier_label.to_string(),
                "Acquisition Date".to_string(),
                "Maturity Date".to_string(),
                "Beginning Balance".to_string(),
                "Collection".to_string(),
                "Disbursement".to_string(),
                "Ending Balance".to_string(),
            ])?);
            for row in &module.rows {
                out.push_str(&csv_line([
                    row.name.clone(),
                    row.account_number.clone(),
                    format_report_date(row.acquisition_date),
                    format_report_date(row.maturity_date),
                    format_amount(row.beginning_balance),
                    format_amount(row.collection),
                    format_amount(row.disbursement),
                    format_amount(row.ending_balance),
                ])?);
            }
            out.push('\n');
        }

        Ok(out)
    }
}

pub struct ReportService {
    storage: Arc<SeaOrmStorage>,
}

impl ReportService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Build the report for `date`, today when absent
    pub async fn daily_report(&self, date: Option<NaiveDate>) -> Result<DailyReport> {
        let report_date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
        let config = get_config();

        let mut modules = Vec::new();
        for kind in InstrumentKind::report_order() {
            let instruments = self.storage.list_reportable(kind).await?;
            modules.push(ReportModule::new(kind, instruments));
        }

        let total: usize = modules.iter().map(|m| m.record_count).sum();
        info!("Daily report for {} built with {} rows", report_date, total);

        Ok(DailyReport {
            title: config.reports.title.clone(),
            currency: config.reports.currency.clone(),
            report_date,
            generated_at: Utc::now(),
            modules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument(name: &str, acquisition: Option<NaiveDate>, amounts: [i64; 4]) -> Instrument {
        let now = Utc::now();
        Instrument {
            id: 1,
            kind: InstrumentKind::Collateral,
            name: name.to_string(),
            account_number: "COL-1".to_string(),
            beginning_balance: round_money(Decimal::from(amounts[0])),
            collection: round_money(Decimal::from(amounts[1])),
            collection_date: None,
            disbursement: round_money(Decimal::from(amounts[2])),
            disbursement_date: None,
            ending_balance: round_money(Decimal::from(amounts[3])),
            maturity_date: NaiveDate::from_ymd_opt(2027, 6, 30),
            acquisition_date: acquisition,
            explanation: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn report(modules: Vec<ReportModule>) -> DailyReport {
        DailyReport {
            title: "Daily Deposit Report".to_string(),
            currency: "PHP".to_string(),
            report_date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            generated_at: Utc::now(),
            modules,
        }
    }

    #[test]
    fn test_module_totals() {
        let module = ReportModule::new(
            InstrumentKind::Collateral,
            vec![
                instrument("A", None, [1000, 100, 50, 1050]),
                instrument("B", None, [500, 0, 0, 500]),
            ],
        );
        assert_eq!(module.record_count, 2);
        assert_eq!(module.totals.beginning_balance.to_string(), "1500.00");
        assert_eq!(module.totals.ending_balance.to_string(), "1550.00");
    }

    #[test]
    fn test_filename() {
        assert_eq!(report(vec![]).filename(), "Daily_Deposit_Report_2026-10-16.csv");
    }

    #[test]
    fn test_csv_layout() {
        let collateral = ReportModule::new(
            InstrumentKind::Collateral,
            vec![instrument(
                "BDO, Makati",
                NaiveDate::from_ymd_opt(2026, 1, 5),
                [1000, 0, 0, 1000],
            )],
        );
        let investment = ReportModule::new(InstrumentKind::Investment, vec![]);
        let csv = report(vec![collateral, investment]).to_csv().unwrap();

        let expected = "Daily Deposit Report - Oct 16, 2026\n\
\n\
Module Summary\n\
Module,Record Count\n\
Collateral,1\n\
Investment,0\n\
\n\
\n\
Collateral Details\n\
Collateral Name,Account number,Acquisition Date,Maturity Date,Beginning Balance,Collection,Disbursement,Ending Balance\n\
\"BDO, Makati\",COL-1,\"Jan 05, 2026\",\"Jun 30, 2027\",1000.00,0.00,0.00,1000.00\n\
\n\
Investment Details\n\
Investment Name,Reference number,Acquisition Date,Maturity Date,Beginning Balance,Collection,Disbursement,Ending Balance\n\
\n";
        assert_eq!(csv, expected);
    }
}
