pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260211_000001_instruments;
mod m20260212_000001_instrument_history;
mod m20260218_000001_ledger_entries;
mod m20260220_000001_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260211_000001_instruments::Migration),
            Box::new(m20260212_000001_instrument_history::Migration),
            Box::new(m20260218_000001_ledger_entries::Migration),
            Box::new(m20260220_000001_users::Migration),
        ]
    }
}
