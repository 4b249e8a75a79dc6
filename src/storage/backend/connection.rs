//! Opening the ledger database and bringing its schema up to date

use std::str::FromStr;
use std::time::Duration;

use sea_orm::sqlx::SqlitePool;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use tracing::info;

use super::retry::RetryPolicy;
use crate::config::DatabaseConfig;
use crate::errors::{LedgerError, Result};
use migration::{Migrator, MigratorTrait};

/// SQLite has no row locks; balance writers queue on the file lock for up
/// to `timeout`.
fn sqlite_options(database_url: &str, timeout: Duration) -> Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| LedgerError::database_config(format!("Invalid SQLite URL: {}", e)))?;

    Ok(options
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Full)
        .busy_timeout(timeout))
}

async fn connect_sqlite(database_url: &str, timeout: Duration) -> Result<DatabaseConnection> {
    let pool = SqlitePool::connect_with(sqlite_options(database_url, timeout)?)
        .await
        .map_err(|e| {
            LedgerError::database_connection(format!("Cannot open SQLite ledger: {}", e))
        })?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

async fn connect_pooled(
    database_url: &str,
    backend_name: &str,
    config: &DatabaseConfig,
) -> Result<DatabaseConnection> {
    let timeout = Duration::from_secs(config.timeout);
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(config.pool_size)
        .min_connections(1)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    Database::connect(opt).await.map_err(|e| {
        LedgerError::database_connection(format!(
            "Cannot connect to {} ledger: {}",
            backend_name.to_uppercase(),
            e
        ))
    })
}

/// Connect to `database_url` and apply pending migrations
pub async fn open(
    database_url: &str,
    backend_name: &str,
    config: &DatabaseConfig,
) -> Result<DatabaseConnection> {
    let db = match backend_name {
        "sqlite" => connect_sqlite(database_url, Duration::from_secs(config.timeout)).await?,
        _ => connect_pooled(database_url, backend_name, config).await?,
    };

    Migrator::up(&db, None)
        .await
        .map_err(|e| LedgerError::database_operation(format!("Migration failed: {}", e)))?;
    info!("Ledger schema is up to date");

    Ok(db)
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}
