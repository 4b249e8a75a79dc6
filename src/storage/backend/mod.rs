//! SeaORM storage backend
//!
//! Supports SQLite, MySQL/MariaDB and PostgreSQL. Queries are split by
//! aggregate: instruments and their history, ledger entries, users.

mod connection;
mod converters;
mod entries;
mod instruments;
mod retry;
mod users;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{LedgerError, Result};
use crate::storage::models::StorageConfig;

pub use entries::AutoProcessCounts;

/// Infer the database backend from its URL
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LedgerError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry: retry::RetryPolicy,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LedgerError::database_config("database_url is not set"));
        }

        let config = crate::config::get_config();
        let db = connection::open(database_url, backend_name, &config.database).await?;

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry: retry::RetryPolicy::from(&config.database),
        };

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn get_backend_config(&self) -> StorageConfig {
        StorageConfig {
            storage_type: self.backend_name.clone(),
        }
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Round-trip query used by the readiness probe
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| LedgerError::database_connection(e.to_string()))
    }
}
