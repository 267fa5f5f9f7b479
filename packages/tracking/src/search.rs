//! Search lifecycle with a generation guard.
//!
//! Lookups cannot be cancelled, so a slow search can settle after a newer one has
//! started. Each search gets a [`SearchTicket`]; only the outcome carrying the
//! current ticket is applied, older ones are discarded.

use crate::models::TrackingData;

/// Proof that an outcome belongs to a particular search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Where the latest search stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Found(Vec<TrackingData>),
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    generation: u64,
    phase: SearchPhase,
}

impl SearchState {
    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading)
    }

    pub fn results(&self) -> Option<&[TrackingData]> {
        match &self.phase {
            SearchPhase::Found(results) => Some(results),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SearchPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Start a new search. Previous results and errors are cleared.
    pub fn begin(&mut self) -> SearchTicket {
        self.generation += 1;
        self.phase = SearchPhase::Loading;
        SearchTicket(self.generation)
    }

    /// Apply the outcome of the search identified by `ticket`.
    ///
    /// Returns `false` and leaves the state untouched when a newer search has begun
    /// or the state was cleared since.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<TrackingData>, String>,
    ) -> bool {
        if ticket.0 != self.generation || !self.is_loading() {
            return false;
        }
        self.phase = match outcome {
            Ok(results) => SearchPhase::Found(results),
            Err(message) => SearchPhase::Failed(message),
        };
        true
    }

    /// Back to the input form. Any search still in flight becomes stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.phase = SearchPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(number: &str) -> TrackingData {
        TrackingData {
            tracking_number: number.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_begin_clears_previous_outcome() {
        let mut state = SearchState::default();
        let ticket = state.begin();
        assert!(state.complete(ticket, Err("not found".into())));
        assert_eq!(state.error(), Some("not found"));

        state.begin();
        assert!(state.is_loading());
        assert!(state.error().is_none());
        assert!(state.results().is_none());
    }

    #[test]
    fn test_current_ticket_applies() {
        let mut state = SearchState::default();
        let ticket = state.begin();
        assert!(state.complete(ticket, Ok(vec![data("A"), data("B")])));
        assert_eq!(state.results().map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut state = SearchState::default();
        let first = state.begin();
        let second = state.begin();
        assert!(first.generation() < second.generation());

        assert!(state.complete(second, Ok(vec![data("NEW")])));
        assert!(!state.complete(first, Ok(vec![data("OLD")])));
        assert_eq!(state.results().unwrap()[0].tracking_number, "NEW");
    }

    #[test]
    fn test_stale_ticket_does_not_end_newer_loading() {
        let mut state = SearchState::default();
        let first = state.begin();
        let _second = state.begin();
        assert!(!state.complete(first, Err("late failure".into())));
        assert!(state.is_loading());
    }

    #[test]
    fn test_clear_invalidates_in_flight_search() {
        let mut state = SearchState::default();
        let ticket = state.begin();
        state.clear();
        assert!(!state.complete(ticket, Ok(vec![data("A")])));
        assert_eq!(state.phase(), &SearchPhase::Idle);
    }

    #[test]
    fn test_ticket_applies_once() {
        let mut state = SearchState::default();
        let ticket = state.begin();
        assert!(state.complete(ticket, Ok(vec![data("A")])));
        assert!(!state.complete(ticket, Err("again".into())));
    }
}
