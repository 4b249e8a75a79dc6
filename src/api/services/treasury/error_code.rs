//! API error codes

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::LedgerError;

/// Numeric error codes carried in the `code` field of every response
///
/// Grouped by thousands:
/// - 0: success
/// - 1000-1099: generic
/// - 3000-3099: instruments
/// - 4000-4099: collections and disbursements
/// - 5000-5099: reports
/// - 6000-6099: users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // generic 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    InvalidDateFormat = 1012,
    ValidationFailed = 1022,
    ServiceUnavailable = 1030,

    // instruments 3000-3099
    InstrumentNotFound = 3000,
    InstrumentInvalid = 3001,
    AccountNumberTaken = 3002,
    InstrumentOperationUnsupported = 3003,
    InstrumentDatabaseError = 3005,
    UnknownInstrumentKind = 3006,

    // entries 4000-4099
    EntryNotFound = 4000,
    EntryInvalid = 4001,
    CheckNumberTaken = 4002,
    EntryNotAccepted = 4003,
    EntryDatabaseError = 4005,

    // reports 5000-5099
    ReportGenerationFailed = 5000,
    ReportInvalidDate = 5001,

    // users 6000-6099
    UserNotFound = 6000,
    UserInvalid = 6001,
    EmailTaken = 6002,
    UserPasswordHashError = 6003,
    UserDatabaseError = 6005,
}

/// Which group of codes a handler reports errors in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    Generic,
    Instruments,
    Entries,
    Reports,
    Users,
}

impl ErrorCode {
    pub fn for_error(err: &LedgerError, scope: ErrorScope) -> Self {
        match scope {
            ErrorScope::Generic => Self::from(err),
            ErrorScope::Instruments => match err {
                LedgerError::UnknownKind(_) => Self::UnknownInstrumentKind,
                LedgerError::NotFound(_) => Self::InstrumentNotFound,
                LedgerError::AlreadyTaken(_) | LedgerError::Conflict(_) => Self::AccountNumberTaken,
                LedgerError::Validation(_) | LedgerError::DateParse(_) => Self::InstrumentInvalid,
                LedgerError::Unsupported(_) => Self::InstrumentOperationUnsupported,
                _ => Self::InstrumentDatabaseError,
            },
            ErrorScope::Entries => match err {
                LedgerError::NotFound(_) | LedgerError::UnknownKind(_) => Self::EntryNotFound,
                LedgerError::Conflict(_) => Self::CheckNumberTaken,
                LedgerError::Validation(_) | LedgerError::DateParse(_) => Self::EntryInvalid,
                LedgerError::Unsupported(_) => Self::EntryNotAccepted,
                _ => Self::EntryDatabaseError,
            },
            ErrorScope::Reports => match err {
                LedgerError::DateParse(_) | LedgerError::Validation(_) => Self::ReportInvalidDate,
                _ => Self::ReportGenerationFailed,
            },
            ErrorScope::Users => match err {
                LedgerError::NotFound(_) => Self::UserNotFound,
                LedgerError::AlreadyTaken(_) | LedgerError::Conflict(_) => Self::EmailTaken,
                LedgerError::Validation(_) => Self::UserInvalid,
                LedgerError::PasswordHash(_) => Self::UserPasswordHashError,
                _ => Self::UserDatabaseError,
            },
        }
    }
}

impl From<&LedgerError> for ErrorCode {
    fn from(err: &LedgerError) -> Self {
        match err {
            LedgerError::Validation(_) => Self::ValidationFailed,
            LedgerError::DateParse(_) => Self::InvalidDateFormat,
            LedgerError::NotFound(_) | LedgerError::UnknownKind(_) => Self::NotFound,
            LedgerError::AlreadyTaken(_) | LedgerError::Conflict(_) => Self::Conflict,
            LedgerError::Unsupported(_) => Self::BadRequest,
            LedgerError::DatabaseConnection(_) => Self::ServiceUnavailable,
            _ => Self::InternalServerError,
        }
    }
}
