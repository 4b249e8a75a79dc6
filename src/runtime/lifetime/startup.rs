use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::get_config;
use crate::services::scheduler::parse_run_at;
use crate::services::{AutoProcessTask, EntryService, InstrumentService, ReportService, UserService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub instrument_service: Arc<InstrumentService>,
    pub entry_service: Arc<EntryService>,
    pub report_service: Arc<ReportService>,
    pub user_service: Arc<UserService>,
}

impl StartupContext {
    /// Wire every service onto one storage handle
    pub fn from_storage(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            instrument_service: Arc::new(InstrumentService::new(storage.clone())),
            entry_service: Arc::new(EntryService::new(storage.clone())),
            report_service: Arc::new(ReportService::new(storage.clone())),
            user_service: Arc::new(UserService::new(storage.clone())),
            storage,
        }
    }
}

/// Prepare everything the server needs: storage, services and the
/// auto-process scheduler
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let context = StartupContext::from_storage(storage);

    let config = get_config();
    if config.scheduler.enabled {
        let run_at = parse_run_at(&config.scheduler.run_at)
            .context("Invalid [scheduler] run_at setting")?;
        let task = Arc::new(AutoProcessTask::new(context.entry_service.clone(), run_at));
        task.spawn_background_task();
    } else {
        warn!("Auto-process scheduler is disabled in configuration");
    }

    info!(
        "Pre-startup processing completed in {:?}",
        start_time.elapsed()
    );
    Ok(context)
}
