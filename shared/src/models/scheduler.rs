//! Appointment Scheduler Config Model
//!
//! One document per user: active weekdays, time ranges per weekday
//! (`"HH:MM-HH:MM"`) and the slot length in minutes.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

pub const DEFAULT_SLOT_DURATION: u32 = 30;

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

fn default_slot_duration() -> u32 {
    DEFAULT_SLOT_DURATION
}

/// Persisted scheduler config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSchedulerConfig {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub active_days: Vec<String>,
    #[serde(default)]
    pub time_ranges: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_slot_duration")]
    pub slot_duration: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A bookable slot inside a time range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl AppointmentSchedulerConfig {
    pub fn is_active_on(&self, day: &str) -> bool {
        let day = day.to_lowercase();
        self.active_days.iter().any(|d| *d == day)
    }

    /// Split every range of `day` into consecutive slots of `slot_duration` minutes
    ///
    /// A trailing remainder shorter than one slot is dropped. Inactive days
    /// and malformed ranges yield no slots.
    pub fn slots_for(&self, day: &str) -> Vec<TimeSlot> {
        if !self.is_active_on(day) || self.slot_duration == 0 {
            return Vec::new();
        }
        let step = chrono::Duration::minutes(i64::from(self.slot_duration));

        let Some(ranges) = self.time_ranges.get(&day.to_lowercase()) else {
            return Vec::new();
        };

        let mut slots = Vec::new();
        for range in ranges {
            let Some((start, end)) = parse_time_range(range) else {
                continue;
            };
            let mut cursor = start;
            // NaiveTime wraps at midnight, so compare against the remaining span
            while end.signed_duration_since(cursor) >= step {
                let next = cursor + step;
                slots.push(TimeSlot {
                    start: cursor.format("%H:%M").to_string(),
                    end: next.format("%H:%M").to_string(),
                });
                cursor = next;
            }
        }
        slots
    }
}

/// Parse `"HH:MM-HH:MM"`; start must be strictly before end
pub fn parse_time_range(range: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = range.split_once('-')?;
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
    (start < end).then_some((start, end))
}

pub fn is_weekday(day: &str) -> bool {
    WEEKDAYS.contains(&day.to_lowercase().as_str())
}

#[allow(clippy::ptr_arg)]
fn validate_active_days(days: &Vec<String>) -> Result<(), ValidationError> {
    if days.iter().all(|d| is_weekday(d)) {
        Ok(())
    } else {
        Err(ValidationError::new("weekday"))
    }
}

fn validate_time_ranges(ranges: &BTreeMap<String, Vec<String>>) -> Result<(), ValidationError> {
    for (day, values) in ranges {
        if !is_weekday(day) {
            return Err(ValidationError::new("weekday"));
        }
        if values.iter().any(|r| parse_time_range(r).is_none()) {
            return Err(ValidationError::new("time_range"));
        }
    }
    Ok(())
}

fn validate_ranges_on_active_days(input: &SchedulerConfigCreate) -> Result<(), ValidationError> {
    let active: Vec<String> = input.active_days.iter().map(|d| d.to_lowercase()).collect();
    if input
        .time_ranges
        .keys()
        .all(|day| active.contains(&day.to_lowercase()))
    {
        Ok(())
    } else {
        Err(ValidationError::new("inactive_day"))
    }
}

/// Create scheduler config payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_ranges_on_active_days"))]
pub struct SchedulerConfigCreate {
    #[serde(default)]
    #[validate(custom(function = "validate_active_days"))]
    pub active_days: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_time_ranges"))]
    pub time_ranges: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_slot_duration")]
    #[validate(range(min = 1, max = 1440))]
    pub slot_duration: u32,
}

impl SchedulerConfigCreate {
    /// Lowercase day names, drop duplicate days
    pub fn normalized(mut self) -> Self {
        let mut days: Vec<String> = Vec::with_capacity(self.active_days.len());
        for day in self.active_days.drain(..) {
            let day = day.to_lowercase();
            if !days.contains(&day) {
                days.push(day);
            }
        }
        self.active_days = days;
        self.time_ranges = self
            .time_ranges
            .into_iter()
            .map(|(day, ranges)| (day.to_lowercase(), ranges))
            .collect();
        self
    }
}

/// Update scheduler config payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_days: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_ranges: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_duration: Option<u32>,
}

impl SchedulerConfigUpdate {
    /// Merge onto the stored config; the result is validated as a whole
    pub fn apply_to(self, current: &AppointmentSchedulerConfig) -> SchedulerConfigCreate {
        SchedulerConfigCreate {
            active_days: self
                .active_days
                .unwrap_or_else(|| current.active_days.clone()),
            time_ranges: self
                .time_ranges
                .unwrap_or_else(|| current.time_ranges.clone()),
            slot_duration: self.slot_duration.unwrap_or(current.slot_duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ranges: &[(&str, &[&str])], slot_duration: u32) -> AppointmentSchedulerConfig {
        AppointmentSchedulerConfig {
            id: "appointment_scheduler_config:1".into(),
            user_id: "teacher-1".into(),
            active_days: ranges.iter().map(|(d, _)| d.to_string()).collect(),
            time_ranges: ranges
                .iter()
                .map(|(d, r)| (d.to_string(), r.iter().map(|s| s.to_string()).collect()))
                .collect(),
            slot_duration,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_parse_time_range() {
        assert!(parse_time_range("09:00-12:00").is_some());
        assert!(parse_time_range("09:00 - 12:00").is_some());
        assert!(parse_time_range("12:00-09:00").is_none());
        assert!(parse_time_range("09:00-09:00").is_none());
        assert!(parse_time_range("9am-noon").is_none());
        assert!(parse_time_range("09:00").is_none());
    }

    #[test]
    fn test_slots_split_by_duration() {
        let cfg = config(&[("monday", &["09:00-10:00", "14:00-14:45"])], 20);
        let slots = cfg.slots_for("Monday");

        let starts: Vec<&str> = slots.iter().map(|s| s.start.as_str()).collect();
        assert_eq!(starts, vec!["09:00", "09:20", "09:40", "14:00", "14:20"]);
        assert_eq!(slots.last().unwrap().end, "14:40");
    }

    #[test]
    fn test_slots_empty_for_inactive_day() {
        let cfg = config(&[("monday", &["09:00-10:00"])], 30);
        assert!(cfg.slots_for("tuesday").is_empty());
    }

    #[test]
    fn test_slots_reach_end_of_day() {
        let cfg = config(&[("friday", &["23:00-23:59"])], 30);
        assert_eq!(cfg.slots_for("friday").len(), 1);
    }

    #[test]
    fn test_create_payload_defaults_slot_duration() {
        let input: SchedulerConfigCreate =
            serde_json::from_str(r#"{"activeDays":["monday"],"timeRanges":{"monday":["09:00-10:00"]}}"#)
                .unwrap();
        assert_eq!(input.slot_duration, DEFAULT_SLOT_DURATION);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let bad_day = SchedulerConfigCreate {
            active_days: vec!["funday".into()],
            time_ranges: BTreeMap::new(),
            slot_duration: 30,
        };
        assert!(bad_day.validate().is_err());

        let bad_range = SchedulerConfigCreate {
            active_days: vec!["monday".into()],
            time_ranges: BTreeMap::from([("monday".into(), vec!["10:00-09:00".into()])]),
            slot_duration: 30,
        };
        assert!(bad_range.validate().is_err());

        let inactive_day = SchedulerConfigCreate {
            active_days: vec!["monday".into()],
            time_ranges: BTreeMap::from([("tuesday".into(), vec!["09:00-10:00".into()])]),
            slot_duration: 30,
        };
        assert!(inactive_day.validate().is_err());

        let zero_slot = SchedulerConfigCreate {
            active_days: vec![],
            time_ranges: BTreeMap::new(),
            slot_duration: 0,
        };
        assert!(zero_slot.validate().is_err());
    }

    #[test]
    fn test_normalized_lowercases_and_dedups() {
        let input = SchedulerConfigCreate {
            active_days: vec!["Monday".into(), "monday".into(), "FRIDAY".into()],
            time_ranges: BTreeMap::from([("Monday".into(), vec!["09:00-10:00".into()])]),
            slot_duration: 30,
        }
        .normalized();

        assert_eq!(input.active_days, vec!["monday", "friday"]);
        assert!(input.time_ranges.contains_key("monday"));
    }

    #[test]
    fn test_update_merges_onto_current() {
        let current = config(&[("monday", &["09:00-10:00"])], 30);
        let merged = SchedulerConfigUpdate {
            slot_duration: Some(15),
            ..Default::default()
        }
        .apply_to(&current);

        assert_eq!(merged.slot_duration, 15);
        assert_eq!(merged.active_days, vec!["monday"]);
        assert_eq!(merged.time_ranges, current.time_ranges);
    }
}
