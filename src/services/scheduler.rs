//! Daily auto-process job
//!
//! Flips every pending collection and disbursement to `processed` once a
//! day at a local wall-clock time.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use tracing::{error, info};

use crate::errors::{LedgerError, Result};
use crate::services::EntryService;

/// Parse `HH:MM` (24h)
pub fn parse_run_at(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
        LedgerError::validation(format!(
            "Invalid scheduler time '{}'. Use HH:MM",
            raw.trim()
        ))
    })
}

/// Time from `now` until the next occurrence of `run_at`
///
/// Exactly at `run_at` counts as already passed, so the wait is one day.
pub fn duration_until_next_run(now: NaiveDateTime, run_at: NaiveTime) -> StdDuration {
    let today_run = now.date().and_time(run_at);
    let next = if today_run > now {
        today_run
    } else {
        today_run + Duration::days(1)
    };
    (next - now).to_std().unwrap_or(StdDuration::ZERO)
}

pub struct AutoProcessTask {
    entries: Arc<EntryService>,
    run_at: NaiveTime,
}

impl AutoProcessTask {
    pub fn new(entries: Arc<EntryService>, run_at: NaiveTime) -> Self {
        Self { entries, run_at }
    }

    pub async fn run_once(&self) -> Result<()> {
        let counts = self.entries.auto_process_pending().await?;
        info!(
            "Scheduled auto-process done: {} collections, {} disbursements",
            counts.collections, counts.disbursements
        );
        Ok(())
    }

    /// Start the daily loop; a failed run is logged and the loop goes on
    pub fn spawn_background_task(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        info!("Auto-process task scheduled daily at {}", self.run_at.format("%H:%M"));

        tokio::spawn(async move {
            loop {
                let wait = duration_until_next_run(Local::now().naive_local(), self.run_at);
                tokio::time::sleep(wait).await;

                if let Err(e) = self.run_once().await {
                    error!("Auto-process task failed: {}", e);
                }
            }
        })
    }
}
