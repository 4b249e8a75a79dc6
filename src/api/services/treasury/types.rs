//! Request and response bodies

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::{
    CollectionItem, CreateUserRequest, DisbursementItem, InstrumentInput,
    UpdateDisbursementRequest, UpdateUserRequest,
};
use crate::storage::EntryStatus;

/// Envelope of every JSON response
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

// ============ Instruments ============

#[derive(Deserialize, Clone, Debug)]
pub struct InstrumentPayload {
    pub name: String,
    #[serde(alias = "reference_number")]
    pub account_number: String,
    pub beginning_balance: Decimal,
    pub maturity_date: String,
    pub acquisition_date: Option<String>,
    pub explanation: Option<String>,
}

impl From<InstrumentPayload> for InstrumentInput {
    fn from(p: InstrumentPayload) -> Self {
        Self {
            name: p.name,
            account_number: p.account_number,
            beginning_balance: p.beginning_balance,
            maturity_date: p.maturity_date,
            acquisition_date: p.acquisition_date,
            explanation: p.explanation,
        }
    }
}

/// Add-to-total body for collection/disbursement
#[derive(Deserialize, Clone, Debug)]
pub struct AmountDatePayload {
    pub amount: Decimal,
    pub date: String,
}

/// Overwrite body for collection/disbursement; the date is kept when absent
#[derive(Deserialize, Clone, Debug)]
pub struct SetAmountPayload {
    pub amount: Decimal,
    pub date: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RenewPayload {
    pub new_maturity_date: String,
    pub explanation: String,
}

/// Body for withdraw and add-balance
#[derive(Deserialize, Clone, Debug)]
pub struct AmountExplanationPayload {
    pub amount: Decimal,
    pub explanation: String,
}

// ============ Entries ============

#[derive(Deserialize, Clone, Debug)]
pub struct CollectionLine {
    pub amount: Decimal,
    pub deposit_slip: Option<String>,
    #[serde(rename = "check")]
    pub check_reference: Option<String>,
}

impl From<CollectionLine> for CollectionItem {
    fn from(line: CollectionLine) -> Self {
        Self {
            amount: line.amount,
            deposit_slip: line.deposit_slip,
            check_reference: line.check_reference,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct StoreCollectionsPayload {
    pub instrument_id: i64,
    #[serde(default)]
    pub collections: Vec<CollectionLine>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DisbursementLine {
    pub check_number: String,
    pub date: String,
    pub amount: Decimal,
}

impl From<DisbursementLine> for DisbursementItem {
    fn from(line: DisbursementLine) -> Self {
        Self {
            check_number: line.check_number,
            date: line.date,
            amount: line.amount,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct StoreDisbursementsPayload {
    pub instrument_id: i64,
    #[serde(default)]
    pub disbursements: Vec<DisbursementLine>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ValidateDisbursementsPayload {
    #[serde(default)]
    pub disbursements: Vec<DisbursementLine>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct UpdateDisbursementPayload {
    pub check_number: String,
    pub date: String,
    pub amount: Decimal,
    pub status: Option<EntryStatus>,
}

impl From<UpdateDisbursementPayload> for UpdateDisbursementRequest {
    fn from(p: UpdateDisbursementPayload) -> Self {
        Self {
            check_number: p.check_number,
            date: p.date,
            amount: p.amount,
            status: p.status,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ProcessIdsPayload {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Serialize, Clone, Debug)]
pub struct ProcessedResponse {
    pub processed: u64,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct EntriesQuery {
    pub instrument_id: Option<i64>,
}

// ============ Reports ============

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ReportQuery {
    /// `YYYY-MM-DD`, today when absent
    pub date: Option<String>,
}

// ============ Users ============

#[derive(Deserialize, Clone, Debug)]
pub struct CreateUserPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: String,
}

impl From<CreateUserPayload> for CreateUserRequest {
    fn from(p: CreateUserPayload) -> Self {
        Self {
            name: p.name,
            email: p.email,
            password: p.password,
            password_confirmation: p.password_confirmation,
            role: p.role,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct UpdateUserPayload {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub role: String,
}

impl From<UpdateUserPayload> for UpdateUserRequest {
    fn from(p: UpdateUserPayload) -> Self {
        Self {
            name: p.name,
            email: p.email,
            password: p.password,
            password_confirmation: p.password_confirmation,
            role: p.role,
        }
    }
}

// ============ Health ============

#[derive(Serialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}
