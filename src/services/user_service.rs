//! User account management

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::errors::{LedgerError, Result};
use crate::storage::{Role, SeaOrmStorage, User};
use crate::utils::password::{hash_password, process_update_password};

const MAX_NAME_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    /// None or empty = keep the current password
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub role: String,
}

/// Loose shape check: one `@`, non-empty local part, dotted domain
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|part| !part.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(LedgerError::validation(format!(
            "Name must not exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(LedgerError::validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(email)
}

fn validate_password(password: &str, confirmation: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LedgerError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if password != confirmation {
        return Err(LedgerError::validation(
            "Password confirmation does not match",
        ));
    }
    Ok(())
}

fn parse_role(raw: &str) -> Result<Role> {
    raw.trim()
        .to_lowercase()
        .parse::<Role>()
        .map_err(|_| LedgerError::validation(format!("Unknown role '{}'", raw.trim())))
}

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.storage.list_users().await
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<User> {
        let name = validate_name(&req.name)?;
        let email = validate_email(&req.email)?;
        validate_password(&req.password, &req.password_confirmation)?;
        let role = parse_role(&req.role)?;

        if self.storage.email_taken(&email, None).await? {
            return Err(LedgerError::already_taken("The email has already been taken"));
        }

        let now = Utc::now();
        let user = User {
            id: 0,
            name,
            email,
            password_hash: hash_password(&req.password)?,
            role,
            created_at: now,
            updated_at: now,
        };
        self.storage.insert_user(&user).await
    }

    pub async fn update(&self, id: i64, req: UpdateUserRequest) -> Result<User> {
        let mut user = self
            .storage
            .get_user(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("User {} not found", id)))?;

        let name = validate_name(&req.name)?;
        let email = validate_email(&req.email)?;
        let role = parse_role(&req.role)?;

        let new_password = req.password.as_deref().filter(|p| !p.is_empty());
        if let Some(password) = new_password {
            validate_password(password, req.password_confirmation.as_deref().unwrap_or(""))?;
        }

        if self.storage.email_taken(&email, Some(id)).await? {
            return Err(LedgerError::already_taken("The email has already been taken"));
        }

        user.password_hash = process_update_password(new_password, user.password_hash)?;
        user.name = name;
        user.email = email;
        user.role = role;
        user.updated_at = Utc::now();

        let saved = self.storage.update_user(&user).await?;
        info!("User #{} updated", id);
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.storage.delete_user(id).await
    }
}
