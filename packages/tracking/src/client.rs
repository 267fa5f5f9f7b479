//! # Concurrent lookup of every tracking number in a query
//!
//! [`TrackingClient`] fans a [`TrackingQuery`] out to a [`Resolver`], one request
//! per number, all in flight at once. There is no limit on fan-out and no
//! cancellation: a search waits for every lookup to settle.
//!
//! Individual failures (transport errors, non-2xx answers, bodies that do not
//! normalize) are logged and the number is dropped from the result. Only when no
//! number resolved does the search itself fail, with [`TrackingError::NotFound`].
//! Results come back in the order the numbers appear in the query.

use std::future::Future;

use futures::future::join_all;
use tracing::{info, warn};

use crate::error::TrackingError;
use crate::models::TrackingData;
use crate::query::TrackingQuery;
use crate::response::ResolveResponse;

/// Something that can look up a single tracking number.
pub trait Resolver {
    fn resolve(
        &self,
        tracking_number: &str,
    ) -> impl Future<Output = Result<ResolveResponse, TrackingError>> + Send;
}

/// Aggregates per-number lookups into one search result.
#[derive(Clone, Debug)]
pub struct TrackingClient<R> {
    resolver: R,
}

impl<R: Resolver + Sync> TrackingClient<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolve every number in `query` concurrently and keep the successes.
    pub async fn track(&self, query: &TrackingQuery) -> Result<Vec<TrackingData>, TrackingError> {
        if query.is_empty() {
            return Err(TrackingError::EmptyQuery);
        }

        let lookups = query.numbers().iter().map(|number| self.lookup(number));
        let found: Vec<TrackingData> = join_all(lookups).await.into_iter().flatten().collect();

        if found.is_empty() {
            warn!(requested = query.len(), "tracking_not_found");
            return Err(TrackingError::NotFound);
        }

        info!(requested = query.len(), found = found.len(), "tracking_resolved");
        Ok(found)
    }

    async fn lookup(&self, tracking_number: &str) -> Option<TrackingData> {
        let outcome = self
            .resolver
            .resolve(tracking_number)
            .await
            .and_then(ResolveResponse::normalize);

        match outcome {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(tracking_number, error = %e, "tracking_lookup_failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::*;

    /// Canned answers keyed by tracking number, with an optional per-number delay.
    #[derive(Default)]
    struct FakeResolver {
        answers: HashMap<String, Result<Value, TrackingError>>,
        delays: HashMap<String, u64>,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeResolver {
        fn answer(mut self, number: &str, answer: Result<Value, TrackingError>) -> Self {
            self.answers.insert(number.to_string(), answer);
            self
        }

        fn delay(mut self, number: &str, millis: u64) -> Self {
            self.delays.insert(number.to_string(), millis);
            self
        }
    }

    impl Resolver for FakeResolver {
        fn resolve(
            &self,
            tracking_number: &str,
        ) -> impl Future<Output = Result<ResolveResponse, TrackingError>> + Send {
            let answer = self
                .answers
                .get(tracking_number)
                .cloned()
                .unwrap_or(Err(TrackingError::Status(404)));
            let delay = self.delays.get(tracking_number).copied().unwrap_or(0);
            let in_flight = self.in_flight.clone();
            let peak = self.peak.clone();
            self.calls.fetch_add(1, Ordering::SeqCst);

            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                answer.map(|value| serde_json::from_value(value).unwrap())
            }
        }
    }

    fn found(number: &str) -> Result<Value, TrackingError> {
        Ok(json!([{ "tracking_number": number, "status": "InTransit" }]))
    }

    #[tokio::test]
    async fn test_empty_query_is_an_error() {
        let client = TrackingClient::new(FakeResolver::default());
        let result = client.track(&TrackingQuery::parse(" , ")).await;
        assert_eq!(result, Err(TrackingError::EmptyQuery));
        assert_eq!(client.resolver().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failures_yield_not_found() {
        let resolver = FakeResolver::default()
            .answer("A", Err(TrackingError::Transport("connection reset".into())))
            .answer("B", Err(TrackingError::Status(500)))
            .answer("C", Ok(json!({ "message": "Workflow was started" })));
        let client = TrackingClient::new(resolver);

        let result = client.track(&TrackingQuery::parse("A,B,C")).await;
        assert_eq!(result, Err(TrackingError::NotFound));
    }

    #[tokio::test]
    async fn test_partial_success_keeps_only_successes() {
        let resolver = FakeResolver::default()
            .answer("A", found("A"))
            .answer("B", Err(TrackingError::Status(502)))
            .answer("C", Ok(json!({ "tracking_number": "C" })))
            .answer("D", Ok(json!([])));
        let client = TrackingClient::new(resolver);

        let results = client.track(&TrackingQuery::parse("A, B, C, D")).await.unwrap();
        let numbers: Vec<&str> = results.iter().map(|d| d.tracking_number.as_str()).collect();
        assert_eq!(numbers, ["A", "C"]);
        assert_eq!(client.resolver().calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_lookups_run_concurrently_and_keep_input_order() {
        let resolver = FakeResolver::default()
            .answer("SLOW", found("SLOW"))
            .answer("FAST", found("FAST"))
            .delay("SLOW", 50)
            .delay("FAST", 1);
        let client = TrackingClient::new(resolver);

        let results = client.track(&TrackingQuery::parse("SLOW,FAST")).await.unwrap();
        assert_eq!(results[0].tracking_number, "SLOW");
        assert_eq!(results[1].tracking_number, "FAST");
        assert_eq!(client.resolver().peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_duplicate_numbers_are_requested_once() {
        let resolver = FakeResolver::default().answer("A", found("A"));
        let client = TrackingClient::new(resolver);

        let results = client.track(&TrackingQuery::parse("A, A ,A")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(client.resolver().calls.load(Ordering::SeqCst), 1);
    }
}
