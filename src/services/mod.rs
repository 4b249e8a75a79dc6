//! Service layer for business logic
//!
//! Shared by the HTTP API, the CLI and the background scheduler.

mod entry_service;
mod instrument_service;
pub mod ledger;
mod report_service;
pub mod scheduler;
mod user_service;

pub use entry_service::*;
pub use instrument_service::*;
pub use report_service::*;
pub use scheduler::AutoProcessTask;
pub use user_service::*;
