//! Repository Module
//!
//! CRUD operations over the SurrealDB tables.
//!
//! Record ids are returned to callers as strings (`<string>id`), so the
//! shared models never depend on SurrealDB types.

pub mod card_view;
pub mod scheduler_config;

pub use card_view::CardViewRepository;
pub use scheduler_config::SchedulerConfigRepository;

use shared::ApiError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // Unique index violation: "Database index `x` already contains ..."
        if message.contains("already contains") {
            RepoError::Duplicate(message)
        } else {
            RepoError::Database(message)
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => ApiError::not_found(what),
            RepoError::Duplicate(what) => ApiError::conflict(what),
            RepoError::Database(msg) => ApiError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
