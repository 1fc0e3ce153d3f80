//! Card View Model
//!
//! Append-only interaction events for a card (view, share, download, ...).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Viewer device class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Tablet,
    Mobile,
    #[default]
    Unknown,
}

impl DeviceType {
    pub const ALL: [DeviceType; 4] = [
        DeviceType::Desktop,
        DeviceType::Tablet,
        DeviceType::Mobile,
        DeviceType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Tablet => "tablet",
            DeviceType::Mobile => "mobile",
            DeviceType::Unknown => "unknown",
        }
    }

    /// Classify a User-Agent header
    ///
    /// Tablets are checked first: iPad and Android UAs without "Mobile" are tablets.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if ua.trim().is_empty() {
            return DeviceType::Unknown;
        }
        if ua.contains("ipad")
            || ua.contains("tablet")
            || (ua.contains("android") && !ua.contains("mobile"))
        {
            DeviceType::Tablet
        } else if ua.contains("mobi") || ua.contains("iphone") || ua.contains("ipod") {
            DeviceType::Mobile
        } else {
            DeviceType::Desktop
        }
    }
}

/// Kind of interaction with a card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    #[default]
    View,
    Share,
    Download,
    ContactClick,
    SocialClick,
}

impl InteractionType {
    pub const ALL: [InteractionType; 5] = [
        InteractionType::View,
        InteractionType::Share,
        InteractionType::Download,
        InteractionType::ContactClick,
        InteractionType::SocialClick,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Share => "share",
            InteractionType::Download => "download",
            InteractionType::ContactClick => "contact_click",
            InteractionType::SocialClick => "social_click",
        }
    }
}

/// Persisted card view event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: String,
    pub card_id: String,
    pub viewer_id: String,
    /// Event time (epoch millis)
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub device_type: DeviceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default)]
    pub interaction_type: InteractionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_detail: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Record card view payload
///
/// Missing `userAgent` / `referrer` are filled from request headers by the handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CardViewCreate {
    #[validate(length(min = 1, max = 128))]
    pub viewer_id: Option<String>,
    #[validate(range(min = 0))]
    pub timestamp: Option<i64>,
    #[validate(length(max = 512))]
    pub user_agent: Option<String>,
    pub device_type: Option<DeviceType>,
    #[validate(length(max = 64))]
    pub country: Option<String>,
    #[validate(length(max = 128))]
    pub city: Option<String>,
    #[validate(length(max = 2048))]
    pub referrer: Option<String>,
    pub interaction_type: Option<InteractionType>,
    #[validate(length(max = 512))]
    pub interaction_detail: Option<String>,
}

/// Aggregated counts for one card over a time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardViewSummary {
    pub card_id: String,
    pub total: u64,
    pub unique_viewers: u64,
    /// Count per interaction type; every type is present, zero included
    pub by_interaction: BTreeMap<InteractionType, u64>,
}
