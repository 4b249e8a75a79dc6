//! Collections and disbursement entries
//!
//! Entries are created `pending` and flipped to `processed` either on
//! request or by the daily auto-process job.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::{LedgerError, Result};
use crate::storage::backend::AutoProcessCounts;
use crate::storage::{Collection, Disbursement, EntryStatus, Instrument, SeaOrmStorage};
use crate::utils::{bounded_money, parse_input_date};

const MAX_CHECK_NUMBER_LEN: usize = 50;

// ============ Request/Response DTOs ============

/// One collection line of a batch
#[derive(Debug, Clone)]
pub struct CollectionItem {
    pub amount: Decimal,
    pub deposit_slip: Option<String>,
    pub check_reference: Option<String>,
}

/// One disbursement line of a batch
#[derive(Debug, Clone)]
pub struct DisbursementItem {
    pub check_number: String,
    /// `MM/DD/YYYY` or `YYYY-MM-DD`
    pub date: String,
    pub amount: Decimal,
}

/// Fields for an existing disbursement
#[derive(Debug, Clone)]
pub struct UpdateDisbursementRequest {
    pub check_number: String,
    pub date: String,
    pub amount: Decimal,
    /// None = keep current status
    pub status: Option<EntryStatus>,
}

/// Outcome of a check-number pre-validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    fn duplicate(check_number: &str) -> Self {
        Self {
            valid: false,
            message: Some(format!(
                "Check number {} already exists. Check numbers must be unique.",
                check_number
            )),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_check_number(raw: &str) -> Result<String> {
    let check_number = raw.trim();
    if check_number.is_empty() {
        return Err(LedgerError::validation("Check number is required"));
    }
    if check_number.chars().count() > MAX_CHECK_NUMBER_LEN {
        return Err(LedgerError::validation(format!(
            "Check number must not exceed {} characters",
            MAX_CHECK_NUMBER_LEN
        )));
    }
    Ok(check_number.to_string())
}

fn validate_disbursement_amount(amount: Decimal) -> Result<Decimal> {
    let amount = bounded_money(amount, "Disbursement amount")?;
    if amount < Decimal::new(1, 2) {
        return Err(LedgerError::validation(
            "Disbursement amount must be at least 0.01",
        ));
    }
    Ok(amount)
}

/// First check number that repeats inside the batch
fn first_batch_duplicate(numbers: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    numbers
        .iter()
        .find(|n| !seen.insert(n.as_str()))
        .map(String::as_str)
}

pub struct EntryService {
    storage: Arc<SeaOrmStorage>,
}

impl EntryService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    async fn load_instrument(&self, instrument_id: i64) -> Result<Instrument> {
        self.storage
            .get_instrument(instrument_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("Instrument {} not found", instrument_id)))
    }

    // ============ Collections ============

    pub async fn list_collections(&self, instrument_id: Option<i64>) -> Result<Vec<Collection>> {
        self.storage.list_collections(instrument_id).await
    }

    pub async fn store_collections(
        &self,
        instrument_id: i64,
        items: Vec<CollectionItem>,
    ) -> Result<Vec<Collection>> {
        let instrument = self.load_instrument(instrument_id).await?;
        if !instrument.kind.accepts_collections() {
            return Err(LedgerError::unsupported(format!(
                "{} instruments do not accept collections",
                instrument.kind
            )));
        }
        if items.is_empty() {
            return Err(LedgerError::validation("At least one collection is required"));
        }

        let now = Utc::now();
        let mut rows = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let amount = bounded_money(item.amount, &format!("Collection #{}: amount", idx + 1))?;
            if amount <= Decimal::ZERO {
                return Err(LedgerError::validation(format!(
                    "Collection #{}: amount must be greater than zero",
                    idx + 1
                )));
            }
            rows.push(Collection {
                id: 0,
                instrument_id,
                amount,
                deposit_slip: normalize_optional(item.deposit_slip),
                check_reference: normalize_optional(item.check_reference),
                status: EntryStatus::Pending,
                created_at: now,
                updated_at: now,
            });
        }

        self.storage.insert_collections(&rows).await
    }

    pub async fn process_collections(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Err(LedgerError::validation("No collection ids given"));
        }

        let existing: HashSet<i64> = self
            .storage
            .existing_collection_ids(ids)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = ids.iter().find(|id| !existing.contains(id)) {
            return Err(LedgerError::not_found(format!(
                "Collection {} not found",
                missing
            )));
        }

        let updated = self.storage.mark_collections_processed(ids).await?;
        info!("Processed {} collections", updated);
        Ok(updated)
    }

    // ============ Disbursements ============

    pub async fn list_disbursements(&self, instrument_id: Option<i64>) -> Result<Vec<Disbursement>> {
        self.storage.list_disbursements(instrument_id).await
    }

    /// Check-number uniqueness, inside the batch and against stored rows
    pub async fn validate_disbursements(&self, items: &[DisbursementItem]) -> Result<CheckValidation> {
        let numbers: Vec<String> = items
            .iter()
            .map(|i| i.check_number.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        let taken: HashSet<String> = self
            .storage
            .taken_check_numbers(&numbers, None)
            .await?
            .into_iter()
            .collect();

        // report in input order so the caller sees the first offending line
        let mut seen = HashSet::new();
        for number in &numbers {
            if taken.contains(number) || !seen.insert(number.as_str()) {
                return Ok(CheckValidation::duplicate(number));
            }
        }
        Ok(CheckValidation::ok())
    }

    pub async fn store_disbursements(
        &self,
        instrument_id: i64,
        items: Vec<DisbursementItem>,
    ) -> Result<Vec<Disbursement>> {
        let instrument = self.load_instrument(instrument_id).await?;
        if !instrument.kind.accepts_disbursement_entries() {
            return Err(LedgerError::unsupported(format!(
                "{} instruments do not accept disbursement entries",
                instrument.kind
            )));
        }
        if items.is_empty() {
            return Err(LedgerError::validation(
                "At least one disbursement is required",
            ));
        }

        let now = Utc::now();
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let check_number = validate_check_number(&item.check_number)?;
            let date = parse_input_date(&item.date)?;
            let amount = validate_disbursement_amount(item.amount)?;
            rows.push(Disbursement {
                id: 0,
                instrument_id,
                check_number,
                date,
                amount,
                status: EntryStatus::Pending,
                created_at: now,
                updated_at: now,
            });
        }

        let numbers: Vec<String> = rows.iter().map(|r| r.check_number.clone()).collect();
        if let Some(dup) = first_batch_duplicate(&numbers) {
            return Err(LedgerError::conflict(format!(
                "Check number {} already exists. Check numbers must be unique.",
                dup
            )));
        }
        if let Some(taken) = self
            .storage
            .taken_check_numbers(&numbers, None)
            .await?
            .into_iter()
            .next()
        {
            return Err(LedgerError::conflict(format!(
                "Check number {} already exists. Check numbers must be unique.",
                taken
            )));
        }

        self.storage.insert_disbursements(&rows).await
    }

    pub async fn update_disbursement(
        &self,
        id: i64,
        req: UpdateDisbursementRequest,
    ) -> Result<Disbursement> {
        let mut existing = self
            .storage
            .get_disbursement(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("Disbursement {} not found", id)))?;

        let check_number = validate_check_number(&req.check_number)?;
        let date: NaiveDate = parse_input_date(&req.date)?;
        let amount = validate_disbursement_amount(req.amount)?;

        if !self
            .storage
            .taken_check_numbers(std::slice::from_ref(&check_number), Some(id))
            .await?
            .is_empty()
        {
            return Err(LedgerError::conflict(format!(
                "Check number {} already exists. Check numbers must be unique.",
                check_number
            )));
        }

        existing.check_number = check_number;
        existing.date = date;
        existing.amount = amount;
        if let Some(status) = req.status {
            existing.status = status;
        }
        existing.updated_at = Utc::now();

        self.storage.update_disbursement(&existing).await
    }

    pub async fn delete_disbursement(&self, id: i64) -> Result<()> {
        self.storage.delete_disbursement(id).await
    }

    /// Flip pending rows among `ids`; already processed rows are left alone
    pub async fn process_disbursements(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Err(LedgerError::validation("No disbursement ids given"));
        }
        let updated = self.storage.mark_disbursements_processed(ids).await?;
        if updated == 0 {
            warn!("No pending disbursements among {} ids", ids.len());
        } else {
            info!("Processed {} disbursements", updated);
        }
        Ok(updated)
    }

    // ============ Auto-process ============

    pub async fn auto_process_pending(&self) -> Result<AutoProcessCounts> {
        let counts = self.storage.process_all_pending().await?;
        info!(
            "Auto-process: {} collections and {} disbursements marked processed",
            counts.collections, counts.disbursements
        );
        Ok(counts)
    }
}
