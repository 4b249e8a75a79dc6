//! User account commands

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::{CreateUserRequest, UserService};
use crate::storage::SeaOrmStorage;

pub async fn add_user(
    storage: Arc<SeaOrmStorage>,
    name: String,
    email: String,
    password: String,
    role: String,
) -> Result<(), CliError> {
    let service = UserService::new(storage);
    let user = service
        .create(CreateUserRequest {
            name,
            email,
            password_confirmation: password.clone(),
            password,
            role,
        })
        .await?;

    println!(
        "{} Created user #{} {} ({})",
        "✓".bold().green(),
        user.id,
        user.email.cyan(),
        user.role.as_str()
    );
    Ok(())
}

pub async fn list_users(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let users = UserService::new(storage).list().await?;

    if users.is_empty() {
        println!("{} No users found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Users:".bold().green());
    for user in &users {
        println!(
            "  #{} {} <{}> {}",
            user.id,
            user.name,
            user.email.cyan(),
            user.role.as_str().dimmed()
        );
    }
    println!();
    println!(
        "{} Total {} users",
        "ℹ".bold().blue(),
        users.len().to_string().green()
    );
    Ok(())
}

pub async fn remove_user(storage: Arc<SeaOrmStorage>, id: i64) -> Result<(), CliError> {
    UserService::new(storage).delete(id).await?;
    println!("{} Removed user #{}", "✓".bold().green(), id);
    Ok(())
}
