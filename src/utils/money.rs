use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{LedgerError, Result};

/// Largest magnitude a `decimal(15,2)` ledger column stores
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999_999, 2)
}

/// Round to the two decimal places the ledger columns hold
///
/// The result always carries scale 2, so it serializes as `"1000.00"`.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Round `amount` and reject values the ledger columns cannot hold
pub fn bounded_money(amount: Decimal, field: &str) -> Result<Decimal> {
    let rounded = round_money(amount);
    if rounded.abs() > max_amount() {
        return Err(LedgerError::validation(format!(
            "{} must not exceed {}",
            field,
            format_amount(max_amount())
        )));
    }
    Ok(rounded)
}

/// Result of a `checked_*` operation, bounded like a stored amount
pub fn checked_money(result: Option<Decimal>, field: &str) -> Result<Decimal> {
    let value = result.ok_or_else(|| LedgerError::validation(format!("{} is out of range", field)))?;
    bounded_money(value, field)
}

/// `1234.5` -> `"1234.50"`
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}
