use thiserror::Error;

/// Failures of a tracking lookup.
///
/// `Transport`, `Status`, `Decode` and `UnexpectedShape` concern a single tracking
/// number and are swallowed by [`crate::TrackingClient`]; `EmptyQuery` and `NotFound`
/// are what a caller of a whole search can see.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackingError {
    #[error("No tracking numbers provided.")]
    EmptyQuery,

    #[error("Tracking details not found for any of the provided numbers.")]
    NotFound,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("endpoint answered with status {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("response did not contain tracking data")]
    UnexpectedShape,
}
