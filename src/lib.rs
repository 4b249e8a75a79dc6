//! Treasury ledger - back-office bookkeeping for a treasury department
//!
//! Tracks financial instruments (collateral, time deposits, government
//! securities, operating accounts and more), their collections,
//! disbursements, renewals and withdrawals, and produces the daily deposit
//! report.
//!
//! # Architecture
//! - `storage`: SeaORM backends and domain models
//! - `services`: business rules shared by the API, CLI and scheduler
//! - `api`: HTTP services and middleware
//! - `interfaces`: command-line interface
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
