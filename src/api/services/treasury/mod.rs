//! Treasury ledger API
//!
//! Endpoints for:
//! - instruments of every kind, with their balance operations
//! - collection and disbursement entries
//! - the daily deposit report
//! - user accounts

mod entries;
pub mod error_code;
mod helpers;
mod instruments;
mod reports;
pub mod routes;
mod types;
mod users;

pub use types::*;

pub use helpers::{
    api_result, error_from_ledger, error_response, json_config, path_config, query_config,
    success_response,
};

pub use error_code::{ErrorCode, ErrorScope};
