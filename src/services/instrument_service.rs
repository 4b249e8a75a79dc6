//! Instrument management service
//!
//! One service covers every instrument kind. Per-kind rules come from
//! `InstrumentKind`; the balance arithmetic lives in `services::ledger`.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::errors::{LedgerError, Result};
use crate::services::ledger;
use crate::storage::{HistoryRecord, Instrument, InstrumentDetail, InstrumentKind, SeaOrmStorage};
use crate::utils::{parse_input_date, round_money};

const MAX_NAME_LEN: usize = 255;
const MAX_ACCOUNT_NUMBER_LEN: usize = 255;
const MAX_EXPLANATION_LEN: usize = 1000;

/// Fields accepted on create and update
#[derive(Debug, Clone, Default)]
pub struct InstrumentInput {
    pub name: String,
    /// Account or reference number, depending on the kind
    pub account_number: String,
    pub beginning_balance: Decimal,
    /// `MM/DD/YYYY` or `YYYY-MM-DD`
    pub maturity_date: String,
    pub acquisition_date: Option<String>,
    pub explanation: Option<String>,
}

/// Validated form of `InstrumentInput`
struct ValidatedInput {
    name: String,
    account_number: String,
    beginning_balance: Decimal,
    maturity_date: NaiveDate,
    acquisition_date: Option<NaiveDate>,
    explanation: Option<String>,
}

pub struct InstrumentService {
    storage: Arc<SeaOrmStorage>,
}

impl InstrumentService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn validate_input(kind: InstrumentKind, input: &InstrumentInput) -> Result<ValidatedInput> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("Name is required"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(LedgerError::validation(format!(
                "Name must not exceed {} characters",
                MAX_NAME_LEN
            )));
        }

        let label = kind.identifier_label();
        let account_number = input.account_number.trim();
        if account_number.is_empty() {
            return Err(LedgerError::validation(format!("{} is required", label)));
        }
        if account_number.chars().count() > MAX_ACCOUNT_NUMBER_LEN {
            return Err(LedgerError::validation(format!(
                "{} must not exceed {} characters",
                label, MAX_ACCOUNT_NUMBER_LEN
            )));
        }

        let beginning_balance =
            ledger::require_non_negative(input.beginning_balance, "Beginning balance")?;

        let maturity_date = parse_input_date(&input.maturity_date)?;

        let acquisition_date = match input.acquisition_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_input_date(raw)?),
            _ => None,
        };

        let explanation = input
            .explanation
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        if let Some(text) = &explanation
            && text.chars().count() > MAX_EXPLANATION_LEN
        {
            return Err(LedgerError::validation(format!(
                "Explanation must not exceed {} characters",
                MAX_EXPLANATION_LEN
            )));
        }

        if kind.requires_acquisition_details() {
            if acquisition_date.is_none() {
                return Err(LedgerError::validation(format!(
                    "Acquisition date is required for {}",
                    kind.display_name()
                )));
            }
            if explanation.is_none() {
                return Err(LedgerError::validation(format!(
                    "Explanation is required for {}",
                    kind.display_name()
                )));
            }
        }

        Ok(ValidatedInput {
            name: name.to_string(),
            account_number: account_number.to_string(),
            beginning_balance,
            maturity_date,
            acquisition_date,
            explanation,
        })
    }

    async fn ensure_unique_account(
        &self,
        kind: InstrumentKind,
        account_number: &str,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        if self
            .storage
            .account_number_exists(kind, account_number, exclude_id)
            .await?
        {
            return Err(kind.account_taken(account_number));
        }
        Ok(())
    }

    fn not_found(kind: InstrumentKind, id: i64) -> LedgerError {
        LedgerError::not_found(format!("{} {} not found", kind.display_name(), id))
    }

    /// Load an instrument and make sure it belongs to `kind`
    async fn load(&self, kind: InstrumentKind, id: i64) -> Result<Instrument> {
        match self.storage.get_instrument(id).await? {
            Some(instrument) if instrument.kind == kind => Ok(instrument),
            _ => Err(Self::not_found(kind, id)),
        }
    }

    /// Apply `change` to the current row of instrument `id` under a lock
    async fn modify<F>(&self, kind: InstrumentKind, id: i64, change: F) -> Result<Instrument>
    where
        F: Fn(&mut Instrument) -> Result<Option<HistoryRecord>>,
    {
        self.storage
            .modify_instrument(id, |instrument| {
                if instrument.kind != kind {
                    return Err(Self::not_found(kind, id));
                }
                let history = change(instrument)?;
                instrument.updated_at = Utc::now();
                Ok(history)
            })
            .await?
            .ok_or_else(|| Self::not_found(kind, id))
    }

    // ============ CRUD ============

    pub async fn list(&self, kind: InstrumentKind) -> Result<Vec<InstrumentDetail>> {
        let instruments = self.storage.list_instruments(kind).await?;
        self.storage.load_details(instruments).await
    }

    pub async fn get(&self, kind: InstrumentKind, id: i64) -> Result<InstrumentDetail> {
        let instrument = self.load(kind, id).await?;
        let mut details = self.storage.load_details(vec![instrument]).await?;
        details
            .pop()
            .ok_or_else(|| LedgerError::not_found(format!("{} {} not found", kind, id)))
    }

    pub async fn create(&self, kind: InstrumentKind, input: InstrumentInput) -> Result<Instrument> {
        let valid = Self::validate_input(kind, &input)?;
        self.ensure_unique_account(kind, &valid.account_number, None)
            .await?;

        let now = Utc::now();
        let mut instrument = Instrument {
            id: 0,
            kind,
            name: valid.name,
            account_number: valid.account_number,
            beginning_balance: valid.beginning_balance,
            collection: round_money(Decimal::ZERO),
            collection_date: None,
            disbursement: round_money(Decimal::ZERO),
            disbursement_date: None,
            ending_balance: Decimal::ZERO,
            maturity_date: Some(valid.maturity_date),
            acquisition_date: valid.acquisition_date,
            explanation: valid.explanation,
            created_at: now,
            updated_at: now,
        };
        ledger::recompute_ending(&mut instrument)?;

        self.storage.insert_instrument(&instrument).await
    }

    /// Replace the descriptive fields; collection/disbursement totals stay
    pub async fn update(
        &self,
        kind: InstrumentKind,
        id: i64,
        input: InstrumentInput,
    ) -> Result<Instrument> {
        self.load(kind, id).await?;
        let valid = Self::validate_input(kind, &input)?;
        self.ensure_unique_account(kind, &valid.account_number, Some(id))
            .await?;

        let saved = self
            .modify(kind, id, |instrument| {
                instrument.name = valid.name.clone();
                instrument.account_number = valid.account_number.clone();
                instrument.beginning_balance = valid.beginning_balance;
                instrument.maturity_date = Some(valid.maturity_date);
                instrument.acquisition_date = valid.acquisition_date;
                instrument.explanation = valid.explanation.clone();
                ledger::recompute_ending(instrument)?;
                Ok(None)
            })
            .await?;
        info!("{} #{} updated", kind, id);
        Ok(saved)
    }

    pub async fn delete(&self, kind: InstrumentKind, id: i64) -> Result<()> {
        self.load(kind, id).await?;
        self.storage.delete_instrument(id).await
    }

    // ============ Balance entries ============

    pub async fn add_collection(
        &self,
        kind: InstrumentKind,
        id: i64,
        amount: Decimal,
        date: &str,
    ) -> Result<Instrument> {
        let date = parse_input_date(date)?;
        self.modify(kind, id, |instrument| {
            ledger::add_collection(instrument, amount, date)?;
            Ok(None)
        })
        .await
    }

    pub async fn update_collection(
        &self,
        kind: InstrumentKind,
        id: i64,
        amount: Decimal,
        date: Option<&str>,
    ) -> Result<Instrument> {
        let date = date
            .filter(|d| !d.trim().is_empty())
            .map(parse_input_date)
            .transpose()?;
        self.modify(kind, id, |instrument| {
            ledger::set_collection(instrument, amount, date)?;
            Ok(None)
        })
        .await
    }

    pub async fn add_disbursement(
        &self,
        kind: InstrumentKind,
        id: i64,
        amount: Decimal,
        date: &str,
    ) -> Result<Instrument> {
        let date = parse_input_date(date)?;
        self.modify(kind, id, |instrument| {
            ledger::add_disbursement(instrument, amount, date)?;
            Ok(None)
        })
        .await
    }

    pub async fn update_disbursement(
        &self,
        kind: InstrumentKind,
        id: i64,
        amount: Decimal,
        date: Option<&str>,
    ) -> Result<Instrument> {
        let date = date
            .filter(|d| !d.trim().is_empty())
            .map(parse_input_date)
            .transpose()?;
        self.modify(kind, id, |instrument| {
            ledger::set_disbursement(instrument, amount, date)?;
            Ok(None)
        })
        .await
    }

    // ============ History-producing operations ============

    pub async fn renew(
        &self,
        kind: InstrumentKind,
        id: i64,
        new_maturity_date: &str,
        explanation: &str,
    ) -> Result<Instrument> {
        let new_date = parse_input_date(new_maturity_date)?;
        let today = Self::today();
        let saved = self
            .modify(kind, id, |instrument| {
                ledger::renew(instrument, new_date, explanation, today).map(Some)
            })
            .await?;
        info!("{} #{} renewed until {}", kind, id, new_date);
        Ok(saved)
    }

    pub async fn withdraw(
        &self,
        kind: InstrumentKind,
        id: i64,
        amount: Decimal,
        explanation: &str,
    ) -> Result<Instrument> {
        let saved = self
            .modify(kind, id, |instrument| {
                ledger::withdraw(instrument, amount, explanation).map(Some)
            })
            .await?;
        info!(
            "{} #{} withdrawal recorded, remaining {}",
            kind, id, saved.beginning_balance
        );
        Ok(saved)
    }

    pub async fn add_balance(
        &self,
        kind: InstrumentKind,
        id: i64,
        amount: Decimal,
        explanation: &str,
    ) -> Result<Instrument> {
        self.modify(kind, id, |instrument| {
            ledger::add_balance(instrument, amount, explanation).map(Some)
        })
        .await
    }
}
