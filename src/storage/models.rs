use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::errors::{LedgerError, Result};

/// Instrument families tracked by the ledger
///
/// Declaration order is the fixed order of the daily report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InstrumentKind {
    Collateral,
    TimeDeposit,
    GovernmentSecurities,
    OtherInvestment,
    OperatingAccounts,
    Dollar,
    CorporateBonds,
    CashInfusion,
    Investment,
}

impl InstrumentKind {
    /// URL slug, also the value stored in `instruments.kind`
    pub fn slug(self) -> &'static str {
        self.into()
    }

    pub fn from_slug(slug: &str) -> Result<Self> {
        slug.parse::<Self>().map_err(|_| {
            LedgerError::unknown_kind(format!("Unknown instrument kind '{}'", slug))
        })
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Collateral => "Collateral",
            Self::TimeDeposit => "Time Deposit",
            Self::GovernmentSecurities => "Government Securities",
            Self::OtherInvestment => "Other Investment",
            Self::OperatingAccounts => "Operating Accounts",
            Self::Dollar => "Dollar",
            Self::CorporateBonds => "Corporate Bonds",
            Self::CashInfusion => "Cash Infusion",
            Self::Investment => "Investment",
        }
    }

    /// Column heading for `account_number`
    pub fn identifier_label(self) -> &'static str {
        match self {
            Self::GovernmentSecurities | Self::Investment => "Reference number",
            _ => "Account number",
        }
    }

    /// Error for a second instrument of this kind with `account_number`
    pub fn account_taken(self, account_number: &str) -> LedgerError {
        LedgerError::already_taken(format!(
            "The {} '{}' has already been taken",
            self.identifier_label().to_lowercase(),
            account_number
        ))
    }

    pub fn requires_acquisition_details(self) -> bool {
        matches!(
            self,
            Self::Collateral | Self::OtherInvestment | Self::CashInfusion
        )
    }

    pub fn accepts_collections(self) -> bool {
        matches!(self, Self::OperatingAccounts)
    }

    pub fn accepts_disbursement_entries(self) -> bool {
        matches!(self, Self::Collateral | Self::OperatingAccounts)
    }

    pub fn report_order() -> impl Iterator<Item = InstrumentKind> {
        Self::iter()
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: i64,
    pub kind: InstrumentKind,
    pub name: String,
    pub account_number: String,
    pub beginning_balance: Decimal,
    pub collection: Decimal,
    pub collection_date: Option<NaiveDate>,
    pub disbursement: Decimal,
    pub disbursement_date: Option<NaiveDate>,
    pub ending_balance: Decimal,
    pub maturity_date: Option<NaiveDate>,
    pub acquisition_date: Option<NaiveDate>,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renewal {
    pub id: i64,
    pub instrument_id: i64,
    pub previous_maturity_date: Option<NaiveDate>,
    pub new_maturity_date: NaiveDate,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: i64,
    pub instrument_id: i64,
    pub amount: Decimal,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAddition {
    pub id: i64,
    pub instrument_id: i64,
    pub amount: Decimal,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

/// History row to append alongside an instrument update
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRecord {
    Renewal {
        previous_maturity_date: Option<NaiveDate>,
        new_maturity_date: NaiveDate,
        explanation: String,
    },
    Withdrawal {
        amount: Decimal,
        explanation: String,
    },
    BalanceAddition {
        amount: Decimal,
        explanation: String,
    },
}

/// An instrument with its history, newest entries first
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentDetail {
    #[serde(flatten)]
    pub instrument: Instrument,
    pub renewals: Vec<Renewal>,
    pub withdrawals: Vec<Withdrawal>,
    pub balances: Vec<BalanceAddition>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Pending,
    Processed,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub instrument_id: i64,
    pub amount: Decimal,
    pub deposit_slip: Option<String>,
    #[serde(rename = "check")]
    pub check_reference: Option<String>,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disbursement {
    pub id: i64,
    pub instrument_id: i64,
    pub check_number: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Treasury,
    Treasury2,
    Treasury3,
    Accounting,
    Accounting2,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
