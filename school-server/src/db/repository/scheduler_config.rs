//! Appointment Scheduler Config Repository

use super::{BaseRepository, RepoError, RepoResult};
use serde::Serialize;
use shared::models::{AppointmentSchedulerConfig, SchedulerConfigCreate};
use shared::util::now_millis;
use std::collections::BTreeMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const SELECT_FIELDS: &str =
    "<string>id AS id, userId, activeDays, timeRanges, slotDuration, createdAt, updatedAt";

/// Stored document (id assigned by the database)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SchedulerConfigDocument {
    user_id: String,
    active_days: Vec<String>,
    time_ranges: BTreeMap<String, Vec<String>>,
    slot_duration: u32,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SchedulerConfigChanges {
    active_days: Vec<String>,
    time_ranges: BTreeMap<String, Vec<String>>,
    slot_duration: u32,
    updated_at: i64,
}

#[derive(Clone)]
pub struct SchedulerConfigRepository {
    base: BaseRepository,
}

impl SchedulerConfigRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the config owned by `user_id`
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Option<AppointmentSchedulerConfig>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT {SELECT_FIELDS} FROM appointment_scheduler_config WHERE userId = $user_id"
            ))
            .bind(("user_id", user_id.to_string()))
            .await?;
        let configs: Vec<AppointmentSchedulerConfig> = result.take(0)?;
        Ok(configs.into_iter().next())
    }

    /// Create the config for `user_id`
    ///
    /// A second config for the same user is rejected by the unique index and
    /// surfaces as [`RepoError::Duplicate`].
    pub async fn create(
        &self,
        user_id: &str,
        data: SchedulerConfigCreate,
    ) -> RepoResult<AppointmentSchedulerConfig> {
        let now = now_millis();
        let doc = SchedulerConfigDocument {
            user_id: user_id.to_string(),
            active_days: data.active_days,
            time_ranges: data.time_ranges,
            slot_duration: data.slot_duration,
            created_at: now,
            updated_at: now,
        };

        self.base
            .db()
            .query("CREATE appointment_scheduler_config CONTENT $data")
            .bind(("data", doc))
            .await?
            .check()
            .map_err(|e| match RepoError::from(e) {
                RepoError::Duplicate(_) => {
                    RepoError::Duplicate(format!("Scheduler config for user {user_id}"))
                }
                other => other,
            })?;

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create scheduler config".to_string()))
    }

    /// Replace the editable fields of the config owned by `user_id`
    pub async fn update(
        &self,
        user_id: &str,
        data: SchedulerConfigCreate,
    ) -> RepoResult<AppointmentSchedulerConfig> {
        if self.find_by_user(user_id).await?.is_none() {
            return Err(RepoError::NotFound(format!(
                "Scheduler config for user {user_id}"
            )));
        }

        let changes = SchedulerConfigChanges {
            active_days: data.active_days,
            time_ranges: data.time_ranges,
            slot_duration: data.slot_duration,
            updated_at: now_millis(),
        };

        // CONTENT would drop fields; MERGE keeps userId and createdAt.
        // timeRanges is replaced first so removed days do not linger.
        self.base
            .db()
            .query(
                "UPDATE appointment_scheduler_config SET timeRanges = $data.timeRanges WHERE userId = $user_id;
                 UPDATE appointment_scheduler_config MERGE $data WHERE userId = $user_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("data", changes))
            .await?
            .check()?;

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Scheduler config for user {user_id}")))
    }

    /// Delete the config owned by `user_id`
    pub async fn delete(&self, user_id: &str) -> RepoResult<bool> {
        if self.find_by_user(user_id).await?.is_none() {
            return Ok(false);
        }

        self.base
            .db()
            .query("DELETE appointment_scheduler_config WHERE userId = $user_id")
            .bind(("user_id", user_id.to_string()))
            .await?
            .check()?;
        Ok(true)
    }
}
