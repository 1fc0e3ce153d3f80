//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). Schema definitions are idempotent and
//! applied on every start.

pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::db::repository::RepoError;

pub const NAMESPACE: &str = "school";
pub const DATABASE: &str = "main";

/// Table and index definitions
///
/// `scheduler_user_unique` is what keeps one scheduler config per user;
/// concurrent creates for the same user are serialized by the index, not by
/// a read-then-write check.
pub const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS appointment_scheduler_config SCHEMALESS;
DEFINE FIELD IF NOT EXISTS userId ON appointment_scheduler_config TYPE string;
DEFINE FIELD IF NOT EXISTS activeDays ON appointment_scheduler_config TYPE array<string>;
DEFINE FIELD IF NOT EXISTS timeRanges ON appointment_scheduler_config TYPE object;
DEFINE FIELD IF NOT EXISTS slotDuration ON appointment_scheduler_config TYPE int DEFAULT 30;
DEFINE FIELD IF NOT EXISTS createdAt ON appointment_scheduler_config TYPE int;
DEFINE FIELD IF NOT EXISTS updatedAt ON appointment_scheduler_config TYPE int;
DEFINE INDEX IF NOT EXISTS scheduler_user_unique ON appointment_scheduler_config FIELDS userId UNIQUE;

DEFINE TABLE IF NOT EXISTS card_view SCHEMALESS;
DEFINE FIELD IF NOT EXISTS cardId ON card_view TYPE string;
DEFINE FIELD IF NOT EXISTS viewerId ON card_view TYPE string;
DEFINE FIELD IF NOT EXISTS timestamp ON card_view TYPE int;
DEFINE FIELD IF NOT EXISTS deviceType ON card_view TYPE string DEFAULT 'unknown'
    ASSERT $value IN ['desktop', 'tablet', 'mobile', 'unknown'];
DEFINE FIELD IF NOT EXISTS interactionType ON card_view TYPE string DEFAULT 'view'
    ASSERT $value IN ['view', 'share', 'download', 'contact_click', 'social_click'];
DEFINE INDEX IF NOT EXISTS card_view_card ON card_view FIELDS cardId;
DEFINE INDEX IF NOT EXISTS card_view_card_time ON card_view FIELDS cardId, timestamp;
DEFINE INDEX IF NOT EXISTS card_view_card_type ON card_view FIELDS cardId, interactionType;
"#;

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `path` and apply the schema
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)
            .map_err(|e| RepoError::Database(format!("Failed to create {}: {e}", path.display())))?;

        let db: Surreal<Db> = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;
        tracing::info!(path = %path.display(), "Database connection established (SurrealDB RocksDB)");

        db.query(SCHEMA).await?.check()?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}
