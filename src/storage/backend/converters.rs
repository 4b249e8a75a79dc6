//! Entity <-> domain conversions
//!
//! Decimal columns come back from SQLite through a floating-point path,
//! so every amount is re-rounded to two places on the way in.

use sea_orm::ActiveValue::{NotSet, Set};

use crate::errors::{LedgerError, Result};
use crate::storage::models::{
    BalanceAddition, Collection, Disbursement, EntryStatus, Instrument, InstrumentKind, Renewal,
    Role, User, Withdrawal,
};
use crate::utils::round_money;
use migration::entities::{
    collection, disbursement, instrument, instrument_balance, instrument_renewal,
    instrument_withdrawal, user,
};

fn parse_status(raw: &str) -> Result<EntryStatus> {
    raw.parse::<EntryStatus>()
        .map_err(|_| LedgerError::serialization(format!("Unknown entry status '{}'", raw)))
}

pub fn model_to_instrument(model: instrument::Model) -> Result<Instrument> {
    let kind = model.kind.parse::<InstrumentKind>().map_err(|_| {
        LedgerError::serialization(format!("Unknown instrument kind '{}'", model.kind))
    })?;

    Ok(Instrument {
        id: model.id,
        kind,
        name: model.name,
        account_number: model.account_number,
        beginning_balance: round_money(model.beginning_balance),
        collection: round_money(model.collection),
        collection_date: model.collection_date,
        disbursement: round_money(model.disbursement),
        disbursement_date: model.disbursement_date,
        ending_balance: round_money(model.ending_balance),
        maturity_date: model.maturity_date,
        acquisition_date: model.acquisition_date,
        explanation: model.explanation,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// `is_new` leaves the id unset so the database assigns it
pub fn instrument_to_active_model(item: &Instrument, is_new: bool) -> instrument::ActiveModel {
    instrument::ActiveModel {
        id: if is_new { NotSet } else { Set(item.id) },
        kind: Set(item.kind.slug().to_string()),
        name: Set(item.name.clone()),
        account_number: Set(item.account_number.clone()),
        beginning_balance: Set(item.beginning_balance),
        collection: Set(item.collection),
        collection_date: Set(item.collection_date),
        disbursement: Set(item.disbursement),
        disbursement_date: Set(item.disbursement_date),
        ending_balance: Set(item.ending_balance),
        maturity_date: Set(item.maturity_date),
        acquisition_date: Set(item.acquisition_date),
        explanation: Set(item.explanation.clone()),
        created_at: if is_new { Set(item.created_at) } else { NotSet },
        updated_at: Set(item.updated_at),
    }
}

pub fn model_to_renewal(model: instrument_renewal::Model) -> Renewal {
    Renewal {
        id: model.id,
        instrument_id: model.instrument_id,
        previous_maturity_date: model.previous_maturity_date,
        new_maturity_date: model.new_maturity_date,
        explanation: model.explanation,
        created_at: model.created_at,
    }
}

pub fn model_to_withdrawal(model: instrument_withdrawal::Model) -> Withdrawal {
    Withdrawal {
        id: model.id,
        instrument_id: model.instrument_id,
        amount: round_money(model.amount),
        explanation: model.explanation,
        created_at: model.created_at,
    }
}

pub fn model_to_balance(model: instrument_balance::Model) -> BalanceAddition {
    BalanceAddition {
        id: model.id,
        instrument_id: model.instrument_id,
        amount: round_money(model.amount),
        explanation: model.explanation,
        created_at: model.created_at,
    }
}

pub fn model_to_collection(model: collection::Model) -> Result<Collection> {
    Ok(Collection {
        id: model.id,
        instrument_id: model.instrument_id,
        amount: round_money(model.amount),
        deposit_slip: model.deposit_slip,
        check_reference: model.check_reference,
        status: parse_status(&model.status)?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn model_to_disbursement(model: disbursement::Model) -> Result<Disbursement> {
    Ok(Disbursement {
        id: model.id,
        instrument_id: model.instrument_id,
        check_number: model.check_number,
        date: model.disbursement_date,
        amount: round_money(model.amount),
        status: parse_status(&model.status)?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn disbursement_to_active_model(
    item: &Disbursement,
    is_new: bool,
) -> disbursement::ActiveModel {
    disbursement::ActiveModel {
        id: if is_new { NotSet } else { Set(item.id) },
        instrument_id: Set(item.instrument_id),
        check_number: Set(item.check_number.clone()),
        disbursement_date: Set(item.date),
        amount: Set(item.amount),
        status: Set(item.status.as_str().to_string()),
        created_at: if is_new { Set(item.created_at) } else { NotSet },
        updated_at: Set(item.updated_at),
    }
}

pub fn model_to_user(model: user::Model) -> Result<User> {
    let role = model
        .role
        .parse::<Role>()
        .map_err(|_| LedgerError::serialization(format!("Unknown role '{}'", model.role)))?;

    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn user_to_active_model(item: &User, is_new: bool) -> user::ActiveModel {
    user::ActiveModel {
        id: if is_new { NotSet } else { Set(item.id) },
        name: Set(item.name.clone()),
        email: Set(item.email.clone()),
        password_hash: Set(item.password_hash.clone()),
        role: Set(item.role.as_str().to_string()),
        created_at: if is_new { Set(item.created_at) } else { NotSet },
        updated_at: Set(item.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use sea_orm::ActiveValue;
    use std::str::FromStr;

    fn instrument_model(kind: &str) -> instrument::Model {
        let now = Utc::now();
        instrument::Model {
            id: 9,
            kind: kind.to_string(),
            name: "Landbank OA".to_string(),
            account_number: "OA-77".to_string(),
            beginning_balance: Decimal::from_str("1500.4999999").unwrap(),
            collection: Decimal::ZERO,
            collection_date: None,
            disbursement: Decimal::ZERO,
            disbursement_date: None,
            ending_balance: Decimal::from_str("1500.50").unwrap(),
            maturity_date: NaiveDate::from_ymd_opt(2027, 1, 31),
            acquisition_date: None,
            explanation: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_instrument_rounds_amounts() {
        let item = model_to_instrument(instrument_model("operating-accounts")).unwrap();
        assert_eq!(item.kind, InstrumentKind::OperatingAccounts);
        assert_eq!(item.beginning_balance.to_string(), "1500.50");
    }

    #[test]
    fn test_model_to_instrument_rejects_unknown_kind() {
        let err = model_to_instrument(instrument_model("savings")).unwrap_err();
        assert!(matches!(err, LedgerError::Serialization(_)));
    }

    #[test]
    fn test_instrument_active_model_for_update_keeps_created_at() {
        let item = model_to_instrument(instrument_model("dollar")).unwrap();
        let active = instrument_to_active_model(&item, false);
        assert!(matches!(active.id, ActiveValue::Set(9)));
        assert!(matches!(active.created_at, ActiveValue::NotSet));
        if let ActiveValue::Set(kind) = &active.kind {
            assert_eq!(kind, "dollar");
        } else {
            panic!("kind should be set");
        }

        let fresh = instrument_to_active_model(&item, true);
        assert!(matches!(fresh.id, ActiveValue::NotSet));
    }

    #[test]
    fn test_model_to_collection_parses_status() {
        let now = Utc::now();
        let model = collection::Model {
            id: 1,
            instrument_id: 9,
            amount: Decimal::from(20),
            deposit_slip: Some("slips/2026-10-16.pdf".into()),
            check_reference: None,
            status: "processed".into(),
            created_at: now,
            updated_at: now,
        };
        let c = model_to_collection(model).unwrap();
        assert_eq!(c.status, EntryStatus::Processed);
        assert_eq!(c.amount.to_string(), "20.00");
    }
}
