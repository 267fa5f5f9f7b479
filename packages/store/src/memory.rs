use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::models::{FeedbackEntry, UsageSession};
use crate::records::{RecordStore, StoreError};

/// In-memory RecordStore for testing and local development.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    sessions: Arc<Mutex<Vec<UsageSession>>>,
    feedback: Arc<Mutex<Vec<(String, FeedbackEntry)>>>,
    next_id: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of all usage sessions, oldest first.
    pub fn sessions(&self) -> Vec<UsageSession> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn open_sessions(&self) -> Vec<UsageSession> {
        self.sessions().into_iter().filter(UsageSession::is_open).collect()
    }

    /// Snapshot of all feedback entries, oldest first.
    pub fn feedback(&self) -> Vec<FeedbackEntry> {
        self.feedback
            .lock()
            .unwrap()
            .iter()
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }

    fn allocate_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}-{n}")
    }
}

impl RecordStore for MemoryStore {
    async fn open_session(&self, email: &str, start: DateTime<Utc>) -> Result<String, StoreError> {
        self.check_available()?;
        let id = self.allocate_id("session");
        self.sessions.lock().unwrap().push(UsageSession {
            id: id.clone(),
            email: email.to_string(),
            start_time: start,
            end_time: None,
            duration_seconds: None,
        });
        Ok(id)
    }

    async fn close_session(&self, id: &str, end: DateTime<Utc>) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::UnknownSession(id.to_string()))?;
        Ok(session.close(end))
    }

    async fn insert_feedback(&self, entry: &FeedbackEntry) -> Result<String, StoreError> {
        self.check_available()?;
        let id = self.allocate_id("feedback");
        self.feedback.lock().unwrap().push((id.clone(), entry.clone()));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_open_and_close_session() {
        let store = MemoryStore::new();

        let id = store.open_session("ana@dynaproco.com", at(100)).await.unwrap();
        assert_eq!(store.open_sessions().len(), 1);

        assert!(store.close_session(&id, at(200)).await.unwrap());

        let sessions = store.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, at(100));
        assert_eq!(sessions[0].end_time, Some(at(200)));
        assert_eq!(sessions[0].duration_seconds, Some(100));
        assert!(store.open_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.open_session("ana@dynaproco.com", at(100)).await.unwrap();

        assert!(store.close_session(&id, at(200)).await.unwrap());
        assert!(!store.close_session(&id, at(300)).await.unwrap());
        assert_eq!(store.sessions()[0].end_time, Some(at(200)));
    }

    #[tokio::test]
    async fn test_close_unknown_session() {
        let store = MemoryStore::new();
        let err = store.close_session("missing", at(1)).await.unwrap_err();
        assert_eq!(err, StoreError::UnknownSession("missing".to_string()));
    }

    #[tokio::test]
    async fn test_feedback_is_appended() {
        let store = MemoryStore::new();
        let entry = FeedbackEntry::new("ana@dynaproco.com", Rating::Promoter, "Fast".into(), at(5));

        let first = store.insert_feedback(&entry).await.unwrap();
        let second = store.insert_feedback(&entry).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.feedback().len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_store_rejects_writes() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.open_session("ana@dynaproco.com", at(1)).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.sessions().is_empty());

        store.set_unavailable(false);
        assert!(store.open_session("ana@dynaproco.com", at(1)).await.is_ok());
    }
}
