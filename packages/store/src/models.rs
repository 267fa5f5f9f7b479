//! # Records written by the application
//!
//! Two collections are persisted, both append-mostly:
//!
//! | Struct | Collection | Notes |
//! |--------|------------|-------|
//! | [`UsageSession`] | `usage_sessions` | One authenticated-usage interval. `end_time` and `duration_seconds` stay `null` until the session is closed, and are set at most once. |
//! | [`FeedbackEntry`] | `feedback` | Write-once promoter/detractor rating with an optional comment. |
//!
//! The serde representation follows the collection schema (`startTime`, `endTime`,
//! `"promoter"`/`"detractor"`), so records can be exported or sent to the client as is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two possible answers of the feedback widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Promoter,
    Detractor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Promoter => "promoter",
            Rating::Detractor => "detractor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "promoter" => Some(Rating::Promoter),
            "detractor" => Some(Rating::Detractor),
            _ => None,
        }
    }
}

/// One submitted feedback form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub email: String,
    pub rating: Rating,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackEntry {
    pub fn new(email: &str, rating: Rating, comment: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            email: email.to_string(),
            rating,
            comment,
            timestamp,
        }
    }
}

/// One authenticated-usage interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSession {
    pub id: String,
    pub email: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Whole seconds between start and end, written together with `end_time`.
    pub duration_seconds: Option<i64>,
}

impl UsageSession {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Set the end of an open session. Returns `false` if it was already closed.
    pub fn close(&mut self, end: DateTime<Utc>) -> bool {
        if self.end_time.is_some() {
            return false;
        }
        self.end_time = Some(end);
        self.duration_seconds = Some((end - self.start_time).num_seconds().max(0));
        true
    }
}
