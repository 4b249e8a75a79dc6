//! Collections and disbursements

use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr,
    TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use tracing::info;

use super::converters::{disbursement_to_active_model, model_to_collection, model_to_disbursement};
use super::SeaOrmStorage;
use super::retry::Work;
use crate::errors::{LedgerError, Result};
use crate::storage::models::{Collection, Disbursement, EntryStatus};
use migration::entities::{collection, disbursement};

/// Rows flipped by one auto-process run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AutoProcessCounts {
    pub collections: u64,
    pub disbursements: u64,
}

/// Unique-index violations surface as conflicts, everything else as-is
fn map_write_err(err: DbErr) -> LedgerError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => LedgerError::conflict(format!(
            "Check numbers must be unique ({})",
            detail
        )),
        _ => LedgerError::from(err),
    }
}

impl SeaOrmStorage {
    /// Insert every collection in one transaction
    pub async fn insert_collections(&self, items: &[Collection]) -> Result<Vec<Collection>> {
        let txn = self.db.begin().await?;
        let mut saved = Vec::with_capacity(items.len());

        for item in items {
            let model = collection::ActiveModel {
                id: NotSet,
                instrument_id: Set(item.instrument_id),
                amount: Set(item.amount),
                deposit_slip: Set(item.deposit_slip.clone()),
                check_reference: Set(item.check_reference.clone()),
                status: Set(item.status.as_str().to_string()),
                created_at: Set(item.created_at),
                updated_at: Set(item.updated_at),
            }
            .insert(&txn)
            .await?;
            saved.push(model_to_collection(model)?);
        }

        txn.commit().await?;
        info!("Stored {} collections", saved.len());
        Ok(saved)
    }

    pub async fn list_collections(&self, instrument_id: Option<i64>) -> Result<Vec<Collection>> {
        let mut query = collection::Entity::find();
        if let Some(id) = instrument_id {
            query = query.filter(collection::Column::InstrumentId.eq(id));
        }
        let models = query
            .order_by_desc(collection::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(model_to_collection).collect()
    }

    /// Subset of `ids` that exist as collections
    pub async fn existing_collection_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        let models = collection::Entity::find()
            .filter(collection::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.id).collect())
    }

    pub async fn mark_collections_processed(&self, ids: &[i64]) -> Result<u64> {
        let db = &self.db;
        let result = self.retry.run("mark_collections_processed", Work::Idempotent, || {
            collection::Entity::update_many()
                .col_expr(
                    collection::Column::Status,
                    Expr::val(EntryStatus::Processed.as_str()).into(),
                )
                .col_expr(collection::Column::UpdatedAt, Expr::val(Utc::now()).into())
                .filter(collection::Column::Id.is_in(ids.iter().copied()))
                .exec(db)
        })
        .await?;

        Ok(result.rows_affected)
    }

    /// Check numbers from `numbers` already used by some disbursement
    pub async fn taken_check_numbers(
        &self,
        numbers: &[String],
        exclude_id: Option<i64>,
    ) -> Result<Vec<String>> {
        if numbers.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = disbursement::Entity::find()
            .filter(disbursement::Column::CheckNumber.is_in(numbers.iter().cloned()));
        if let Some(id) = exclude_id {
            query = query.filter(disbursement::Column::Id.ne(id));
        }

        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(|m| m.check_number).collect())
    }

    /// Insert every disbursement in one transaction
    pub async fn insert_disbursements(&self, items: &[Disbursement]) -> Result<Vec<Disbursement>> {
        let txn = self.db.begin().await?;
        let mut saved = Vec::with_capacity(items.len());

        for item in items {
            let model = disbursement_to_active_model(item, true)
                .insert(&txn)
                .await
                .map_err(map_write_err)?;
            saved.push(model_to_disbursement(model)?);
        }

        txn.commit().await?;
        info!("Stored {} disbursements", saved.len());
        Ok(saved)
    }

    pub async fn get_disbursement(&self, id: i64) -> Result<Option<Disbursement>> {
        let model = disbursement::Entity::find_by_id(id).one(&self.db).await?;
        model.map(model_to_disbursement).transpose()
    }

    pub async fn list_disbursements(
        &self,
        instrument_id: Option<i64>,
    ) -> Result<Vec<Disbursement>> {
        let mut query = disbursement::Entity::find();
        if let Some(id) = instrument_id {
            query = query.filter(disbursement::Column::InstrumentId.eq(id));
        }
        let models = query
            .order_by_desc(disbursement::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(model_to_disbursement).collect()
    }

    pub async fn update_disbursement(&self, item: &Disbursement) -> Result<Disbursement> {
        let model = disbursement_to_active_model(item, false)
            .update(&self.db)
            .await
            .map_err(map_write_err)?;
        model_to_disbursement(model)
    }

    pub async fn delete_disbursement(&self, id: i64) -> Result<()> {
        let result = disbursement::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found(format!(
                "Disbursement {} not found",
                id
            )));
        }
        info!("Disbursement #{} deleted", id);
        Ok(())
    }

    /// Flip only the pending rows among `ids`
    pub async fn mark_disbursements_processed(&self, ids: &[i64]) -> Result<u64> {
        let db = &self.db;
        let result = self.retry.run("mark_disbursements_processed", Work::Idempotent, || {
            disbursement::Entity::update_many()
                .col_expr(
                    disbursement::Column::Status,
                    Expr::val(EntryStatus::Processed.as_str()).into(),
                )
                .col_expr(disbursement::Column::UpdatedAt, Expr::val(Utc::now()).into())
                .filter(disbursement::Column::Id.is_in(ids.iter().copied()))
                .filter(disbursement::Column::Status.eq(EntryStatus::Pending.as_str()))
                .exec(db)
        })
        .await?;

        Ok(result.rows_affected)
    }

    /// Flip every pending collection and disbursement in one transaction
    pub async fn process_all_pending(&self) -> Result<AutoProcessCounts> {
        let counts = self.retry.run("process_all_pending", Work::Transaction, || async {
            let txn = self.db.begin().await?;
            let now = Utc::now();

            let collections = collection::Entity::update_many()
                .col_expr(
                    collection::Column::Status,
                    Expr::val(EntryStatus::Processed.as_str()).into(),
                )
                .col_expr(collection::Column::UpdatedAt, Expr::val(now).into())
                .filter(collection::Column::Status.eq(EntryStatus::Pending.as_str()))
                .exec(&txn)
                .await?
                .rows_affected;

            let disbursements = disbursement::Entity::update_many()
                .col_expr(
                    disbursement::Column::Status,
                    Expr::val(EntryStatus::Processed.as_str()).into(),
                )
                .col_expr(disbursement::Column::UpdatedAt, Expr::val(now).into())
                .filter(disbursement::Column::Status.eq(EntryStatus::Pending.as_str()))
                .exec(&txn)
                .await?
                .rows_affected;

            txn.commit().await?;
            Ok::<_, DbErr>(AutoProcessCounts {
                collections,
                disbursements,
            })
        })
        .await?;

        Ok(counts)
    }
}
