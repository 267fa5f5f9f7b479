//! # Record store abstraction
//!
//! [`RecordStore`] is the async interface the application writes usage sessions and
//! feedback through. The server implements it on PostgreSQL; [`crate::MemoryStore`]
//! implements it in memory for tests.
//!
//! Closing a session is idempotent: only a session whose `end_time` is still unset
//! is updated, and the call reports whether it was the one that closed it. A close
//! that never arrived (for example from a torn-down browser tab) can therefore be
//! replayed later without overwriting the original end time.

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::FeedbackEntry;

/// Failures of a record write.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("no session with id {0}")]
    UnknownSession(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Async trait for persisting usage sessions and feedback.
pub trait RecordStore {
    /// Create an open usage session and return its id.
    fn open_session(
        &self,
        email: &str,
        start: DateTime<Utc>,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Set the end time of session `id` if it is still open.
    ///
    /// Returns `true` when this call closed the session, `false` when it was
    /// already closed.
    fn close_session(
        &self,
        id: &str,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Append a feedback entry and return its id.
    fn insert_feedback(
        &self,
        entry: &FeedbackEntry,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;
}
