//! # Checkpoint timeline
//!
//! Turns the raw checkpoint list of a shipment into the display sequence shown
//! on a tracking card: newest first, one icon per classification tag, and a
//! single human-readable location line.
//!
//! Ordering is a stable descending sort on a string key. A checkpoint whose time
//! parses is keyed by its normalized UTC timestamp (fixed-width, so string order
//! equals time order); one whose time does not parse is keyed by its raw string.
//! Nothing is ever dropped.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::models::Checkpoint;

pub const LOCATION_FALLBACK: &str = "Location not available";

const SORT_KEY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";
const TIME_LABEL_FORMAT: &str = "%b %-d, %Y - %H:%M";

/// Icon category of a checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckpointIcon {
    Delivered,
    InTransit,
    PickedUp,
    Exception,
    Pin,
}

impl CheckpointIcon {
    /// Classify a checkpoint tag. Case and separators are ignored, so `InTransit`,
    /// `in_transit` and `in-transit` are the same. A missing tag counts as in transit.
    pub fn from_tag(tag: &str) -> Self {
        let normalized: String = tag
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "" | "intransit" => CheckpointIcon::InTransit,
            "delivered" => CheckpointIcon::Delivered,
            "pickedup" => CheckpointIcon::PickedUp,
            "exception" => CheckpointIcon::Exception,
            _ => CheckpointIcon::Pin,
        }
    }
}

/// One row of the rendered timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEntry {
    pub message: String,
    pub time_label: String,
    pub location_label: String,
    pub icon: CheckpointIcon,
    /// True for the first (most recent) row only.
    pub latest: bool,
}

/// Build the display sequence for `checkpoints`.
pub fn timeline(checkpoints: &[Checkpoint]) -> Vec<TimelineEntry> {
    let mut keyed: Vec<(String, &Checkpoint)> = checkpoints
        .iter()
        .map(|checkpoint| (sort_key(&checkpoint.checkpoint_time), checkpoint))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));

    keyed
        .into_iter()
        .enumerate()
        .map(|(index, (_, checkpoint))| TimelineEntry {
            message: checkpoint.message.clone(),
            time_label: time_label(&checkpoint.checkpoint_time),
            location_label: location_label(checkpoint),
            icon: CheckpointIcon::from_tag(&checkpoint.tag),
            latest: index == 0,
        })
        .collect()
}

/// Parse a carrier timestamp. Accepts RFC 3339, ISO date-times with or without an
/// offset (naive ones are taken as UTC) and plain dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed);
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(Utc.from_utc_datetime(&naive).into())
}

/// `"May 2, 2024 - 10:00"` in the checkpoint's own offset, or the raw string.
pub fn time_label(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(parsed) => parsed.format(TIME_LABEL_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// `location`, else `city`, else a placeholder, plus the country name when known.
pub fn location_label(checkpoint: &Checkpoint) -> String {
    let place = non_empty(&checkpoint.location)
        .or_else(|| non_empty(&checkpoint.city))
        .unwrap_or(LOCATION_FALLBACK);

    match non_empty(&checkpoint.country_region_name) {
        Some(country) => format!("{place}, {country}"),
        None => place.to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn sort_key(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(parsed) => parsed.with_timezone(&Utc).format(SORT_KEY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
