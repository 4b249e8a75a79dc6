use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    SqlErr,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{model_to_user, user_to_active_model};
use crate::errors::{LedgerError, Result};
use crate::storage::models::User;
use migration::entities::user;

fn map_user_write_err(err: DbErr) -> LedgerError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            LedgerError::already_taken("The email has already been taken")
        }
        _ => LedgerError::from(err),
    }
}

impl SeaOrmStorage {
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await?;
        models.into_iter().map(model_to_user).collect()
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        model.map(model_to_user).transpose()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        model.map(model_to_user).transpose()
    }

    pub async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = exclude_id {
            query = query.filter(user::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    pub async fn insert_user(&self, item: &User) -> Result<User> {
        let model = user_to_active_model(item, true)
            .insert(&self.db)
            .await
            .map_err(map_user_write_err)?;
        info!("User created: {} ({})", model.email, model.role);
        model_to_user(model)
    }

    pub async fn update_user(&self, item: &User) -> Result<User> {
        let model = user_to_active_model(item, false)
            .update(&self.db)
            .await
            .map_err(map_user_write_err)?;
        model_to_user(model)
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found(format!("User {} not found", id)));
        }
        info!("User #{} deleted", id);
        Ok(())
    }
}
