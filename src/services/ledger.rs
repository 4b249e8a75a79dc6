//! Balance arithmetic on a single instrument
//!
//! Every function here mutates the instrument in memory only; callers
//! persist the result. A rejected operation leaves the instrument as it was. `ending_balance` is recomputed after every change
//! so it always equals `beginning + collection - disbursement`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::{LedgerError, Result};
use crate::storage::{HistoryRecord, Instrument};
use crate::utils::{bounded_money, checked_money, round_money};

const MAX_EXPLANATION_LEN: usize = 1000;

fn min_entry() -> Decimal {
    Decimal::new(1, 2)
}

/// `beginning + collection - disbursement`, rejected when it leaves the column range
fn ending_for(beginning: Decimal, collection: Decimal, disbursement: Decimal) -> Result<Decimal> {
    checked_money(
        beginning
            .checked_add(collection)
            .and_then(|total| total.checked_sub(disbursement)),
        "Ending balance",
    )
}

pub fn recompute_ending(instrument: &mut Instrument) -> Result<()> {
    instrument.ending_balance = ending_for(
        instrument.beginning_balance,
        instrument.collection,
        instrument.disbursement,
    )?;
    Ok(())
}

/// Trimmed explanation, rejecting blank or oversized input
pub fn require_explanation(explanation: &str) -> Result<String> {
    let trimmed = explanation.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("Explanation is required"));
    }
    if trimmed.chars().count() > MAX_EXPLANATION_LEN {
        return Err(LedgerError::validation(format!(
            "Explanation must not exceed {} characters",
            MAX_EXPLANATION_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn require_at_least_cent(amount: Decimal, field: &str) -> Result<Decimal> {
    let amount = bounded_money(amount, field)?;
    if amount < min_entry() {
        return Err(LedgerError::validation(format!(
            "{} must be at least 0.01",
            field
        )));
    }
    Ok(amount)
}

pub fn require_non_negative(amount: Decimal, field: &str) -> Result<Decimal> {
    let amount = bounded_money(amount, field)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::validation(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(amount)
}

fn require_positive(amount: Decimal, field: &str) -> Result<Decimal> {
    let amount = bounded_money(amount, field)?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "{} must be greater than 0",
            field
        )));
    }
    Ok(amount)
}

pub fn add_collection(instrument: &mut Instrument, amount: Decimal, date: NaiveDate) -> Result<()> {
    let amount = require_at_least_cent(amount, "Collection amount")?;
    let collection = checked_money(instrument.collection.checked_add(amount), "Collection total")?;
    let ending = ending_for(instrument.beginning_balance, collection, instrument.disbursement)?;

    instrument.collection = collection;
    instrument.collection_date = Some(date);
    instrument.ending_balance = ending;
    Ok(())
}

/// Overwrite the collection total; the date is replaced only when given
pub fn set_collection(
    instrument: &mut Instrument,
    amount: Decimal,
    date: Option<NaiveDate>,
) -> Result<()> {
    let collection = require_non_negative(amount, "Collection amount")?;
    let ending = ending_for(instrument.beginning_balance, collection, instrument.disbursement)?;

    instrument.collection = collection;
    if let Some(date) = date {
        instrument.collection_date = Some(date);
    }
    instrument.ending_balance = ending;
    Ok(())
}

pub fn add_disbursement(
    instrument: &mut Instrument,
    amount: Decimal,
    date: NaiveDate,
) -> Result<()> {
    let amount = require_at_least_cent(amount, "Disbursement amount")?;
    let disbursement =
        checked_money(instrument.disbursement.checked_add(amount), "Disbursement total")?;
    let ending = ending_for(instrument.beginning_balance, instrument.collection, disbursement)?;

    instrument.disbursement = disbursement;
    instrument.disbursement_date = Some(date);
    instrument.ending_balance = ending;
    Ok(())
}

pub fn set_disbursement(
    instrument: &mut Instrument,
    amount: Decimal,
    date: Option<NaiveDate>,
) -> Result<()> {
    let disbursement = require_non_negative(amount, "Disbursement amount")?;
    let ending = ending_for(instrument.beginning_balance, instrument.collection, disbursement)?;

    instrument.disbursement = disbursement;
    if let Some(date) = date {
        instrument.disbursement_date = Some(date);
    }
    instrument.ending_balance = ending;
    Ok(())
}

/// Move the maturity date forward
///
/// The new date must be after `today` and after the current maturity
/// date when one is set.
pub fn renew(
    instrument: &mut Instrument,
    new_maturity_date: NaiveDate,
    explanation: &str,
    today: NaiveDate,
) -> Result<HistoryRecord> {
    let explanation = require_explanation(explanation)?;

    if new_maturity_date <= today {
        return Err(LedgerError::validation(
            "New maturity date must be after today",
        ));
    }
    if let Some(current) = instrument.maturity_date
        && new_maturity_date <= current
    {
        return Err(LedgerError::validation(format!(
            "New maturity date must be after the current maturity date ({})",
            current.format("%Y-%m-%d")
        )));
    }

    let previous = instrument.maturity_date;
    instrument.maturity_date = Some(new_maturity_date);

    Ok(HistoryRecord::Renewal {
        previous_maturity_date: previous,
        new_maturity_date,
        explanation,
    })
}

/// Reduce principal; withdrawing everything clears the maturity date
pub fn withdraw(
    instrument: &mut Instrument,
    amount: Decimal,
    explanation: &str,
) -> Result<HistoryRecord> {
    let explanation = require_explanation(explanation)?;
    let amount = require_positive(amount, "Withdrawal amount")?;

    if amount > instrument.beginning_balance {
        return Err(LedgerError::validation(format!(
            "Withdrawal amount {} exceeds the beginning balance {}",
            amount, instrument.beginning_balance
        )));
    }

    let beginning = round_money(instrument.beginning_balance - amount);
    let ending = ending_for(beginning, instrument.collection, instrument.disbursement)?;

    instrument.beginning_balance = beginning;
    instrument.ending_balance = ending;
    if beginning < min_entry() {
        instrument.maturity_date = None;
    }

    Ok(HistoryRecord::Withdrawal {
        amount,
        explanation,
    })
}

pub fn add_balance(
    instrument: &mut Instrument,
    amount: Decimal,
    explanation: &str,
) -> Result<HistoryRecord> {
    let explanation = require_explanation(explanation)?;
    let amount = require_positive(amount, "Amount")?;

    let beginning = checked_money(
        instrument.beginning_balance.checked_add(amount),
        "Beginning balance",
    )?;
    let ending = ending_for(beginning, instrument.collection, instrument.disbursement)?;

    instrument.beginning_balance = beginning;
    instrument.ending_balance = ending;

    Ok(HistoryRecord::BalanceAddition {
        amount,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InstrumentKind;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(beginning: &str) -> Instrument {
        let now = Utc::now();
        Instrument {
            id: 1,
            kind: InstrumentKind::TimeDeposit,
            name: "BDO Time Deposit".into(),
            account_number: "TD-001".into(),
            beginning_balance: dec(beginning),
            collection: Decimal::ZERO,
            collection_date: None,
            disbursement: Decimal::ZERO,
            disbursement_date: None,
            ending_balance: dec(beginning),
            maturity_date: Some(date(2027, 6, 30)),
            acquisition_date: None,
            explanation: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_add_collection_accumulates() {
        let mut i = sample("1000.00");
        add_collection(&mut i, dec("250.50"), date(2026, 10, 1)).unwrap();
        add_collection(&mut i, dec("49.50"), date(2026, 10, 2)).unwrap();

        assert_eq!(i.collection, dec("300.00"));
        assert_eq!(i.collection_date, Some(date(2026, 10, 2)));
        assert_eq!(i.ending_balance, dec("1300.00"));
    }

    #[test]
    fn test_add_collection_rejects_below_a_cent() {
        let mut i = sample("1000.00");
        let err = add_collection(&mut i, dec("0.001"), date(2026, 10, 1)).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(i.collection, Decimal::ZERO);
    }

    #[test]
    fn test_set_collection_keeps_date_when_absent() {
        let mut i = sample("1000.00");
        add_collection(&mut i, dec("100"), date(2026, 10, 1)).unwrap();
        set_collection(&mut i, Decimal::ZERO, None).unwrap();

        assert_eq!(i.collection, Decimal::ZERO);
        assert_eq!(i.collection_date, Some(date(2026, 10, 1)));
        assert_eq!(i.ending_balance, dec("1000.00"));
    }

    #[test]
    fn test_set_disbursement_rejects_negative() {
        let mut i = sample("1000.00");
        assert!(set_disbursement(&mut i, dec("-1"), None).is_err());
    }

    #[test]
    fn test_disbursement_reduces_ending() {
        let mut i = sample("1000.00");
        add_collection(&mut i, dec("200"), date(2026, 10, 1)).unwrap();
        add_disbursement(&mut i, dec("450.25"), date(2026, 10, 3)).unwrap();

        assert_eq!(i.ending_balance, dec("749.75"));
        assert_eq!(i.disbursement_date, Some(date(2026, 10, 3)));
    }

    #[test]
    fn test_renew_records_previous_date() {
        let mut i = sample("1000.00");
        let record = renew(&mut i, date(2028, 1, 15), "Rolled over", date(2026, 10, 16)).unwrap();

        assert_eq!(i.maturity_date, Some(date(2028, 1, 15)));
        assert_eq!(
            record,
            HistoryRecord::Renewal {
                previous_maturity_date: Some(date(2027, 6, 30)),
                new_maturity_date: date(2028, 1, 15),
                explanation: "Rolled over".into(),
            }
        );
    }

    #[test]
    fn test_renew_rejects_past_and_earlier_dates() {
        let mut i = sample("1000.00");
        let today = date(2026, 10, 16);

        assert!(renew(&mut i, today, "x", today).is_err());
        assert!(renew(&mut i, date(2027, 1, 1), "x", today).is_err());
        assert!(renew(&mut i, date(2028, 1, 1), "   ", today).is_err());
        assert_eq!(i.maturity_date, Some(date(2027, 6, 30)));
    }

    #[test]
    fn test_renew_without_current_maturity() {
        let mut i = sample("1000.00");
        i.maturity_date = None;
        let record = renew(&mut i, date(2027, 1, 1), "Reinstated", date(2026, 10, 16)).unwrap();
        assert!(matches!(
            record,
            HistoryRecord::Renewal {
                previous_maturity_date: None,
                ..
            }
        ));
    }

    #[test]
    fn test_partial_withdrawal_keeps_maturity() {
        let mut i = sample("1000.00");
        withdraw(&mut i, dec("400"), "Partial").unwrap();

        assert_eq!(i.beginning_balance, dec("600.00"));
        assert_eq!(i.ending_balance, dec("600.00"));
        assert!(i.maturity_date.is_some());
    }

    #[test]
    fn test_full_withdrawal_clears_maturity() {
        let mut i = sample("1000.00");
        withdraw(&mut i, dec("1000.00"), "Closed").unwrap();

        assert_eq!(i.beginning_balance, Decimal::ZERO);
        assert_eq!(i.maturity_date, None);
    }

    #[test]
    fn test_withdrawal_over_balance_is_rejected() {
        let mut i = sample("1000.00");
        assert!(withdraw(&mut i, dec("1000.01"), "Too much").is_err());
        assert!(withdraw(&mut i, Decimal::ZERO, "Nothing").is_err());
        assert_eq!(i.beginning_balance, dec("1000.00"));
    }

    #[test]
    fn test_add_balance_recomputes_ending() {
        let mut i = sample("1000.00");
        add_disbursement(&mut i, dec("100"), date(2026, 10, 1)).unwrap();
        add_balance(&mut i, dec("500"), "Top up").unwrap();

        assert_eq!(i.beginning_balance, dec("1500.00"));
        assert_eq!(i.ending_balance, dec("1400.00"));
    }

    #[test]
    fn test_amounts_past_column_range_are_rejected() {
        let huge = dec("50000000000000000000000000000");
        let mut i = sample("1000.00");

        assert!(add_collection(&mut i, huge, date(2026, 10, 1)).is_err());
        assert!(set_disbursement(&mut i, huge, None).is_err());
        assert!(add_balance(&mut i, huge, "Top up").is_err());
        assert!(withdraw(&mut i, huge, "Out").is_err());
        assert_eq!(i.beginning_balance, dec("1000.00"));
        assert_eq!(i.ending_balance, dec("1000.00"));
    }

    #[test]
    fn test_totals_past_column_range_are_rejected() {
        let mut i = sample("9999999999999.00");
        recompute_ending(&mut i).unwrap();

        let err = add_balance(&mut i, dec("1.00"), "Top up").unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        let err = add_collection(&mut i, dec("5.00"), date(2026, 10, 1)).unwrap_err();
        assert!(err.message().starts_with("Ending balance"));
        assert_eq!(i.collection, Decimal::ZERO);
        assert_eq!(i.collection_date, None);

        // still fits exactly
        add_balance(&mut i, dec("0.99"), "Top up").unwrap();
        assert_eq!(i.ending_balance, dec("9999999999999.99"));
    }

    #[test]
    fn test_require_explanation_limits() {
        assert_eq!(require_explanation("  ok  ").unwrap(), "ok");
        assert!(require_explanation(&"x".repeat(1001)).is_err());
    }
}
