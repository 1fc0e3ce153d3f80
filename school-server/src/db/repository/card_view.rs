//! Card View Repository
//!
//! Append-only: events are recorded and queried, never updated or deleted.

use super::{BaseRepository, RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use shared::models::{CardView, CardViewSummary, DeviceType, InteractionType};
use shared::util::now_millis;
use std::collections::{BTreeMap, HashSet};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "card_view";

const SELECT_FIELDS: &str = "<string>id AS id, cardId, viewerId, timestamp, userAgent, deviceType, \
     country, city, referrer, interactionType, interactionDetail, createdAt, updatedAt";

/// Default cap on listed events
pub const DEFAULT_LIST_LIMIT: usize = 500;

/// New event, fully resolved (defaults applied by the caller)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCardView {
    pub card_id: String,
    pub viewer_id: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub device_type: DeviceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub interaction_type: InteractionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_detail: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CardViewDocument {
    card_id: String,
    viewer_id: String,
    timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
    device_type: DeviceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referrer: Option<String>,
    interaction_type: InteractionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    interaction_detail: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl CardViewDocument {
    fn new(event: NewCardView, now: i64) -> Self {
        Self {
            card_id: event.card_id,
            viewer_id: event.viewer_id,
            timestamp: event.timestamp,
            user_agent: event.user_agent,
            device_type: event.device_type,
            country: event.country,
            city: event.city,
            referrer: event.referrer,
            interaction_type: event.interaction_type,
            interaction_detail: event.interaction_detail,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InteractionCount {
    interaction_type: InteractionType,
    total: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewerRow {
    viewer_id: String,
}

/// Inclusive time window in epoch millis; open ends default to the full range
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindow {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl TimeWindow {
    pub fn new(from: Option<i64>, to: Option<i64>) -> Self {
        Self { from, to }
    }

    fn bounds(&self) -> (i64, i64) {
        (self.from.unwrap_or(i64::MIN), self.to.unwrap_or(i64::MAX))
    }

    /// `from` after `to` selects nothing
    pub fn is_empty(&self) -> bool {
        let (from, to) = self.bounds();
        from > to
    }
}

#[derive(Clone)]
pub struct CardViewRepository {
    base: BaseRepository,
}

impl CardViewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one event
    pub async fn record(&self, event: NewCardView) -> RepoResult<CardView> {
        let key = uuid::Uuid::new_v4().simple().to_string();
        let doc = CardViewDocument::new(event, now_millis());

        self.base
            .db()
            .query("CREATE type::thing($table, $key) CONTENT $data")
            .bind(("table", TABLE))
            .bind(("key", key.clone()))
            .bind(("data", doc))
            .await?
            .check()?;

        let mut result = self
            .base
            .db()
            .query(format!("SELECT {SELECT_FIELDS} FROM type::thing($table, $key)"))
            .bind(("table", TABLE))
            .bind(("key", key))
            .await?;
        let created: Vec<CardView> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to record card view".to_string()))
    }

    /// Events of a card inside `window`, newest first
    pub async fn find_by_card_in_range(
        &self,
        card_id: &str,
        window: TimeWindow,
        limit: usize,
    ) -> RepoResult<Vec<CardView>> {
        let (from, to) = window.bounds();
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT {SELECT_FIELDS} FROM card_view \
                 WHERE cardId = $card_id AND timestamp >= $from AND timestamp <= $to \
                 ORDER BY timestamp DESC"
            ))
            .bind(("card_id", card_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await?;
        let mut views: Vec<CardView> = result.take(0)?;
        // Limit applied here: the embedded engine can drop rows on indexed WHERE + ORDER + LIMIT
        views.truncate(limit);
        Ok(views)
    }

    /// Events of a card with the given interaction type inside `window`, newest first
    pub async fn find_by_card_and_type(
        &self,
        card_id: &str,
        interaction_type: InteractionType,
        window: TimeWindow,
        limit: usize,
    ) -> RepoResult<Vec<CardView>> {
        let (from, to) = window.bounds();
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT {SELECT_FIELDS} FROM card_view \
                 WHERE cardId = $card_id AND interactionType = $interaction_type \
                 AND timestamp >= $from AND timestamp <= $to \
                 ORDER BY timestamp DESC"
            ))
            .bind(("card_id", card_id.to_string()))
            .bind(("interaction_type", interaction_type.as_str()))
            .bind(("from", from))
            .bind(("to", to))
            .await?;
        let mut views: Vec<CardView> = result.take(0)?;
        views.truncate(limit);
        Ok(views)
    }

    /// Totals per interaction type and unique viewers inside `window`
    pub async fn summary(&self, card_id: &str, window: TimeWindow) -> RepoResult<CardViewSummary> {
        let (from, to) = window.bounds();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT interactionType, count() AS total FROM card_view \
                 WHERE cardId = $card_id AND timestamp >= $from AND timestamp <= $to \
                 GROUP BY interactionType;
                 SELECT viewerId FROM card_view \
                 WHERE cardId = $card_id AND timestamp >= $from AND timestamp <= $to \
                 GROUP BY viewerId;",
            )
            .bind(("card_id", card_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await?;

        let counts: Vec<InteractionCount> = result.take(0)?;
        let viewers: Vec<ViewerRow> = result.take(1)?;

        let mut by_interaction: BTreeMap<InteractionType, u64> =
            InteractionType::ALL.into_iter().map(|t| (t, 0)).collect();
        for row in counts {
            *by_interaction.entry(row.interaction_type).or_default() += row.total;
        }

        Ok(CardViewSummary {
            card_id: card_id.to_string(),
            total: by_interaction.values().sum(),
            unique_viewers: viewers
                .iter()
                .map(|v| v.viewer_id.as_str())
                .collect::<HashSet<_>>()
                .len() as u64,
            by_interaction,
        })
    }
}
