//! PostgreSQL implementation of [`RecordStore`].

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use store::{FeedbackEntry, RecordStore, StoreError};
use uuid::Uuid;

use super::get_pool;

/// Record store backed by the shared pool.
#[derive(Clone, Copy, Debug)]
pub struct PgStore {
    pool: &'static PgPool,
}

impl PgStore {
    pub fn new(pool: &'static PgPool) -> Self {
        Self { pool }
    }

    /// Store on the process-wide pool.
    pub async fn connect() -> Result<Self, StoreError> {
        let pool = get_pool()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self::new(pool))
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Database(other.to_string()),
    }
}

impl RecordStore for PgStore {
    async fn open_session(&self, email: &str, start: DateTime<Utc>) -> Result<String, StoreError> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO usage_sessions (email, start_time)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(start)
        .fetch_one(self.pool)
        .await
        .map_err(db_error)?;

        Ok(id.to_string())
    }

    async fn close_session(&self, id: &str, end: DateTime<Utc>) -> Result<bool, StoreError> {
        let uuid = Uuid::parse_str(id).map_err(|_| StoreError::UnknownSession(id.to_string()))?;

        let closed = sqlx::query(
            r#"
            UPDATE usage_sessions
            SET end_time = $2,
                duration_seconds = GREATEST(0, FLOOR(EXTRACT(EPOCH FROM ($2 - start_time))))::BIGINT
            WHERE id = $1 AND end_time IS NULL
            "#,
        )
        .bind(uuid)
        .bind(end)
        .execute(self.pool)
        .await
        .map_err(db_error)?
        .rows_affected();

        if closed > 0 {
            return Ok(true);
        }

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM usage_sessions WHERE id = $1")
            .bind(uuid)
            .fetch_optional(self.pool)
            .await
            .map_err(db_error)?;

        match exists {
            Some(_) => Ok(false),
            None => Err(StoreError::UnknownSession(id.to_string())),
        }
    }

    async fn insert_feedback(&self, entry: &FeedbackEntry) -> Result<String, StoreError> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO feedback (email, rating, comment, timestamp)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&entry.email)
        .bind(entry.rating.as_str())
        .bind(&entry.comment)
        .bind(entry.timestamp)
        .fetch_one(self.pool)
        .await
        .map_err(db_error)?;

        Ok(id.to_string())
    }
}
