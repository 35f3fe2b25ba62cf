//! User Service Library
//!
//! This crate provides the user management service layer: CRUD operations,
//! email lookup, and password changes over an injected repository and
//! password hasher. The consuming API layer validates requests with the
//! schemas in [`requests`] before calling into [`service::UserService`].

pub mod config;
pub mod infra;
pub mod repository;
pub mod requests;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{UserManager, UserService};
use domain::Argon2Hasher;

/// Build the user service backed by the configured database and Argon2 hashing.
pub async fn init_service(
    config: &UserServiceConfig,
) -> Result<Arc<dyn UserService>, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;

    let user_repo = Arc::new(UserStore::new(db.get_connection()));
    let hasher = Arc::new(Argon2Hasher::new());

    Ok(Arc::new(UserManager::new(user_repo, hasher)))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
