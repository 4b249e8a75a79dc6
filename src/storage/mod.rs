use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{
    BalanceAddition, Collection, Disbursement, EntryStatus, HistoryRecord, Instrument,
    InstrumentDetail, InstrumentKind, Renewal, Role, StorageConfig, User, Withdrawal,
};

pub struct StorageFactory;

impl StorageFactory {
    /// Open the configured database and run pending migrations
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = backend::SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
