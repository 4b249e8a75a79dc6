//! Instrument rows and their renewal/withdrawal/balance history

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::Expr,
};
use tracing::{debug, info};

use super::converters::{
    instrument_to_active_model, model_to_balance, model_to_instrument, model_to_renewal,
    model_to_withdrawal,
};
use super::SeaOrmStorage;
use super::retry::Work;
use crate::errors::{LedgerError, Result};
use crate::storage::models::{HistoryRecord, Instrument, InstrumentDetail, InstrumentKind};
use migration::entities::{
    collection, disbursement, instrument, instrument_balance, instrument_renewal,
    instrument_withdrawal,
};

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Outcome of one locked read-modify-write attempt
enum Modified {
    Saved(instrument::Model),
    Missing,
    Rejected(LedgerError),
}

async fn reject(txn: DatabaseTransaction, err: LedgerError) -> std::result::Result<Modified, DbErr> {
    txn.rollback().await?;
    Ok(Modified::Rejected(err))
}

async fn insert_history<C: ConnectionTrait>(
    conn: &C,
    instrument_id: i64,
    record: &HistoryRecord,
) -> std::result::Result<(), DbErr> {
    let now = Utc::now();
    match record {
        HistoryRecord::Renewal {
            previous_maturity_date,
            new_maturity_date,
            explanation,
        } => {
            instrument_renewal::ActiveModel {
                id: NotSet,
                instrument_id: Set(instrument_id),
                previous_maturity_date: Set(*previous_maturity_date),
                new_maturity_date: Set(*new_maturity_date),
                explanation: Set(explanation.clone()),
                created_at: Set(now),
            }
            .insert(conn)
            .await?;
        }
        HistoryRecord::Withdrawal {
            amount,
            explanation,
        } => {
            instrument_withdrawal::ActiveModel {
                id: NotSet,
                instrument_id: Set(instrument_id),
                amount: Set(*amount),
                explanation: Set(explanation.clone()),
                created_at: Set(now),
            }
            .insert(conn)
            .await?;
        }
        HistoryRecord::BalanceAddition {
            amount,
            explanation,
        } => {
            instrument_balance::ActiveModel {
                id: NotSet,
                instrument_id: Set(instrument_id),
                amount: Set(*amount),
                explanation: Set(explanation.clone()),
                created_at: Set(now),
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}

impl SeaOrmStorage {
    pub async fn get_instrument(&self, id: i64) -> Result<Option<Instrument>> {
        let db = &self.db;
        let model = self
            .retry
            .run(&format!("get_instrument({})", id), Work::Read, || {
                instrument::Entity::find_by_id(id).one(db)
            })
            .await?;

        model.map(model_to_instrument).transpose()
    }

    pub async fn list_instruments(&self, kind: InstrumentKind) -> Result<Vec<Instrument>> {
        let db = &self.db;
        let models = self
            .retry
            .run(&format!("list_instruments({})", kind.slug()), Work::Read, || {
                instrument::Entity::find()
                    .filter(instrument::Column::Kind.eq(kind.slug()))
                    .order_by_asc(instrument::Column::Id)
                    .all(db)
            })
            .await?;

        models.into_iter().map(model_to_instrument).collect()
    }

    /// Instruments of `kind` that carry a maturity date, for the daily report
    pub async fn list_reportable(&self, kind: InstrumentKind) -> Result<Vec<Instrument>> {
        let models = instrument::Entity::find()
            .filter(instrument::Column::Kind.eq(kind.slug()))
            .filter(instrument::Column::MaturityDate.is_not_null())
            .order_by_asc(instrument::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(model_to_instrument).collect()
    }

    /// Attach history rows (newest first) to each instrument
    pub async fn load_details(&self, instruments: Vec<Instrument>) -> Result<Vec<InstrumentDetail>> {
        if instruments.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = instruments.iter().map(|i| i.id).collect();

        let mut renewals: HashMap<i64, Vec<_>> = HashMap::new();
        for model in instrument_renewal::Entity::find()
            .filter(instrument_renewal::Column::InstrumentId.is_in(ids.clone()))
            .order_by_desc(instrument_renewal::Column::CreatedAt)
            .order_by_desc(instrument_renewal::Column::Id)
            .all(&self.db)
            .await?
        {
            renewals
                .entry(model.instrument_id)
                .or_default()
                .push(model_to_renewal(model));
        }

        let mut withdrawals: HashMap<i64, Vec<_>> = HashMap::new();
        for model in instrument_withdrawal::Entity::find()
            .filter(instrument_withdrawal::Column::InstrumentId.is_in(ids.clone()))
            .order_by_desc(instrument_withdrawal::Column::CreatedAt)
            .order_by_desc(instrument_withdrawal::Column::Id)
            .all(&self.db)
            .await?
        {
            withdrawals
                .entry(model.instrument_id)
                .or_default()
                .push(model_to_withdrawal(model));
        }

        let mut balances: HashMap<i64, Vec<_>> = HashMap::new();
        for model in instrument_balance::Entity::find()
            .filter(instrument_balance::Column::InstrumentId.is_in(ids))
            .order_by_desc(instrument_balance::Column::CreatedAt)
            .order_by_desc(instrument_balance::Column::Id)
            .all(&self.db)
            .await?
        {
            balances
                .entry(model.instrument_id)
                .or_default()
                .push(model_to_balance(model));
        }

        Ok(instruments
            .into_iter()
            .map(|instrument| {
                let id = instrument.id;
                InstrumentDetail {
                    instrument,
                    renewals: renewals.remove(&id).unwrap_or_default(),
                    withdrawals: withdrawals.remove(&id).unwrap_or_default(),
                    balances: balances.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    /// Whether another instrument of `kind` already uses `account_number`
    pub async fn account_number_exists(
        &self,
        kind: InstrumentKind,
        account_number: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let mut query = instrument::Entity::find()
            .filter(instrument::Column::Kind.eq(kind.slug()))
            .filter(instrument::Column::AccountNumber.eq(account_number));
        if let Some(id) = exclude_id {
            query = query.filter(instrument::Column::Id.ne(id));
        }

        Ok(query.count(&self.db).await? > 0)
    }

    /// Insert a new instrument
    ///
    /// Not retried: a lost connection after the commit would turn the
    /// retry into a duplicate.
    pub async fn insert_instrument(&self, item: &Instrument) -> Result<Instrument> {
        let model = instrument_to_active_model(item, true)
            .insert(&self.db)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    item.kind.account_taken(&item.account_number)
                } else {
                    LedgerError::from(err)
                }
            })?;

        info!(
            "Instrument created: {} #{} ({})",
            item.kind.slug(),
            model.id,
            model.account_number
        );
        model_to_instrument(model)
    }

    async fn modify_once<F>(&self, id: i64, change: &F) -> std::result::Result<Modified, DbErr>
    where
        F: Fn(&mut Instrument) -> Result<Option<HistoryRecord>>,
    {
        let txn = self.db.begin().await?;

        let mut query = instrument::Entity::find_by_id(id);
        if self.backend_name == "sqlite" {
            // no row locks: take the database write lock before reading
            instrument::Entity::update_many()
                .col_expr(
                    instrument::Column::UpdatedAt,
                    Expr::col(instrument::Column::UpdatedAt).into(),
                )
                .filter(instrument::Column::Id.eq(id))
                .exec(&txn)
                .await?;
        } else {
            query = query.lock_exclusive();
        }

        let Some(model) = query.one(&txn).await? else {
            txn.rollback().await?;
            return Ok(Modified::Missing);
        };
        let mut current = match model_to_instrument(model) {
            Ok(current) => current,
            Err(err) => return reject(txn, err).await,
        };
        let history = match change(&mut current) {
            Ok(history) => history,
            Err(err) => return reject(txn, err).await,
        };

        let saved = match instrument_to_active_model(&current, false).update(&txn).await {
            Ok(saved) => saved,
            Err(err) if is_unique_violation(&err) => {
                let taken = current.kind.account_taken(&current.account_number);
                return reject(txn, taken).await;
            }
            Err(err) => return Err(err),
        };
        if let Some(record) = &history {
            insert_history(&txn, id, record).await?;
        }

        txn.commit().await?;
        Ok(Modified::Saved(saved))
    }

    /// Read-modify-write one instrument under a row lock
    ///
    /// `change` sees the committed row and may return a history record to
    /// store with it. Both land in one transaction; an error from `change`
    /// rolls everything back. `Ok(None)` means the row does not exist.
    pub async fn modify_instrument<F>(&self, id: i64, change: F) -> Result<Option<Instrument>>
    where
        F: Fn(&mut Instrument) -> Result<Option<HistoryRecord>>,
    {
        let change = &change;
        let outcome = self
            .retry
            .run(&format!("modify_instrument({})", id), Work::Transaction, move || {
                self.modify_once(id, change)
            })
            .await?;

        match outcome {
            Modified::Saved(model) => {
                debug!("Instrument #{} saved", id);
                model_to_instrument(model).map(Some)
            }
            Modified::Missing => Ok(None),
            Modified::Rejected(err) => Err(err),
        }
    }

    /// Delete an instrument together with its history and ledger entries
    pub async fn delete_instrument(&self, id: i64) -> Result<()> {
        let txn = self.db.begin().await?;

        instrument_renewal::Entity::delete_many()
            .filter(instrument_renewal::Column::InstrumentId.eq(id))
            .exec(&txn)
            .await?;
        instrument_withdrawal::Entity::delete_many()
            .filter(instrument_withdrawal::Column::InstrumentId.eq(id))
            .exec(&txn)
            .await?;
        instrument_balance::Entity::delete_many()
            .filter(instrument_balance::Column::InstrumentId.eq(id))
            .exec(&txn)
            .await?;
        collection::Entity::delete_many()
            .filter(collection::Column::InstrumentId.eq(id))
            .exec(&txn)
            .await?;
        disbursement::Entity::delete_many()
            .filter(disbursement::Column::InstrumentId.eq(id))
            .exec(&txn)
            .await?;

        let result = instrument::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(LedgerError::not_found(format!(
                "Instrument {} not found",
                id
            )));
        }

        txn.commit().await?;
        info!("Instrument #{} deleted", id);
        Ok(())
    }
}
