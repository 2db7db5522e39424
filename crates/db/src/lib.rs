//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the journal, accounts, and stock tables
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The database handle is constructed explicitly at process start and passed
//! in; there are no module-level connection singletons.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{AccountRepository, JournalRepository, ProductRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
