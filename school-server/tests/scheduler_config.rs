//! Scheduler config repository against an on-disk RocksDB database
//!
//! Run: cargo test -p school-server --test scheduler_config

use std::collections::BTreeMap;

use school_server::db::DbService;
use school_server::db::repository::{RepoError, SchedulerConfigRepository};
use shared::ApiError;
use shared::models::SchedulerConfigCreate;

async fn repo() -> (tempfile::TempDir, SchedulerConfigRepository) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::open(tmp.path().join("school.db")).await.unwrap();
    (tmp, SchedulerConfigRepository::new(service.db))
}

fn payload(days: &[&str], ranges: &[(&str, &[&str])], slot_duration: u32) -> SchedulerConfigCreate {
    SchedulerConfigCreate {
        active_days: days.iter().map(|d| d.to_string()).collect(),
        time_ranges: ranges
            .iter()
            .map(|(day, values)| {
                (
                    day.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect::<BTreeMap<_, _>>(),
        slot_duration,
    }
}

#[tokio::test]
async fn create_then_find_by_user() {
    let (_tmp, repo) = repo().await;

    let created = repo
        .create(
            "teacher-1",
            payload(&["monday"], &[("monday", &["09:00-10:00"])], 30),
        )
        .await
        .unwrap();

    assert_eq!(created.user_id, "teacher-1");
    assert!(created.id.starts_with("appointment_scheduler_config:"));
    assert_eq!(created.slot_duration, 30);
    assert!(created.created_at > 0);

    let found = repo.find_by_user("teacher-1").await.unwrap().unwrap();
    assert_eq!(found, created);
    assert!(repo.find_by_user("nobody").await.unwrap().is_none());

    let slots = found.slots_for("monday");
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start, "09:00");
    assert_eq!(slots[1].end, "10:00");
}

#[tokio::test]
async fn second_config_for_same_user_is_duplicate() {
    let (_tmp, repo) = repo().await;
    let data = payload(&["tuesday"], &[], 45);

    repo.create("teacher-1", data.clone()).await.unwrap();
    let err = repo.create("teacher-1", data.clone()).await.unwrap_err();

    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");
    let api: ApiError = err.into();
    assert_eq!(api.status_code(), http::StatusCode::CONFLICT);

    // other users are unaffected
    repo.create("teacher-2", data).await.unwrap();
}

#[tokio::test]
async fn concurrent_creates_leave_one_config() {
    let (_tmp, repo) = repo().await;
    let data = payload(&["friday"], &[], 30);

    let (a, b) = tokio::join!(
        repo.create("teacher-1", data.clone()),
        repo.create("teacher-1", data.clone())
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert!(repo.find_by_user("teacher-1").await.unwrap().is_some());
}

#[tokio::test]
async fn update_replaces_ranges_and_keeps_identity() {
    let (_tmp, repo) = repo().await;
    let created = repo
        .create(
            "teacher-1",
            payload(
                &["monday", "wednesday"],
                &[("monday", &["09:00-10:00"]), ("wednesday", &["13:00-14:00"])],
                30,
            ),
        )
        .await
        .unwrap();

    let updated = repo
        .update(
            "teacher-1",
            payload(&["monday"], &[("monday", &["08:00-12:00"])], 60),
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_id, "teacher-1");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.slot_duration, 60);
    assert_eq!(updated.active_days, vec!["monday".to_string()]);
    assert!(!updated.time_ranges.contains_key("wednesday"));
    assert_eq!(updated.slots_for("monday").len(), 4);
}

#[tokio::test]
async fn update_missing_config_is_not_found() {
    let (_tmp, repo) = repo().await;
    let err = repo
        .update("ghost", payload(&["monday"], &[], 30))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_config() {
    let (_tmp, repo) = repo().await;
    repo.create("teacher-1", payload(&["monday"], &[], 30))
        .await
        .unwrap();

    assert!(repo.delete("teacher-1").await.unwrap());
    assert!(repo.find_by_user("teacher-1").await.unwrap().is_none());
    assert!(!repo.delete("teacher-1").await.unwrap());

    // the unique slot is free again
    repo.create("teacher-1", payload(&["monday"], &[], 30))
        .await
        .unwrap();
}
