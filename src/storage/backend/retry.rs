//! Retrying database work that lost a lock race
//!
//! Only work that is safe to run twice is retried:
//! - `Work::Read` and `Work::Idempotent` also survive a dropped connection
//! - `Work::Transaction` is retried on lock contention only, since the
//!   server rolled it back; after a dropped connection the commit may
//!   already have landed
//!
//! Plain inserts are never wrapped here.

use std::future::Future;
use std::time::Duration;

use rand::RngExt;
use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tracing::{debug, warn};

/// What the retried closure does to the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Work {
    Read,
    /// A write whose second run leaves the same rows (status flips)
    Idempotent,
    /// Several statements inside one transaction
    Transaction,
}

/// Why a statement failed, as far as retrying is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Deadlock, lock wait timeout, serialization failure, SQLite BUSY
    Contention,
    /// The pool or the connection went away
    Connection,
    Permanent,
}

// MySQL 1205/1213, PostgreSQL 40001/40P01, SQLite BUSY(5)/LOCKED(6)
// and their extended codes (517 = BUSY_SNAPSHOT, 261 = BUSY_RECOVERY)
const CONTENTION_CODES: &[&str] = &["1205", "1213", "40001", "40P01", "5", "6", "261", "517"];

const CONTENTION_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "database table is locked",
    "could not serialize access",
];

fn contention_in_message(message: &str) -> bool {
    let message = message.to_lowercase();
    CONTENTION_MESSAGES.iter().any(|m| message.contains(m))
}

fn classify_runtime(err: &RuntimeErr) -> Failure {
    let contended = match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            let by_code = sqlx_err
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .is_some_and(|code| CONTENTION_CODES.contains(&code.as_ref()));
            by_code || contention_in_message(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(message) => contention_in_message(message),
        #[allow(unreachable_patterns)]
        _ => false,
    };
    if contended {
        Failure::Contention
    } else {
        Failure::Permanent
    }
}

pub fn classify(err: &DbErr) -> Failure {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => Failure::Connection,
        DbErr::Exec(runtime) | DbErr::Query(runtime) => classify_runtime(runtime),
        _ => Failure::Permanent,
    }
}

impl Work {
    fn survives(self, failure: Failure) -> bool {
        match (self, failure) {
            (_, Failure::Permanent) => false,
            (_, Failure::Contention) => true,
            (Work::Transaction, Failure::Connection) => false,
            (Work::Read | Work::Idempotent, Failure::Connection) => true,
        }
    }
}

/// Attempt count and backoff window, from `[database]` in the config
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Exponential delay for the `attempt`-th retry (1-based) plus up to 25% jitter
    fn delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let capped = self
            .base_delay_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_delay_ms);
        let jitter = rand::rng().random_range(0..=capped / 4);
        Duration::from_millis(capped + jitter)
    }

    pub async fn run<T, F, Fut>(&self, label: &str, work: Work, mut attempt_fn: F) -> Result<T, DbErr>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DbErr>>,
    {
        let mut retries = 0;
        loop {
            let err = match attempt_fn().await {
                Ok(value) => {
                    if retries > 0 {
                        debug!("{} went through after {} retries", label, retries);
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            let failure = classify(&err);
            if retries >= self.max_retries || !work.survives(failure) {
                debug!("{} gave up ({:?}, {:?}): {}", label, work, failure, err);
                return Err(err);
            }

            retries += 1;
            let delay = self.delay(retries);
            warn!(
                "{} hit {:?} ({}); retry {}/{} in {:?}",
                label, failure, err, retries, self.max_retries, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}
