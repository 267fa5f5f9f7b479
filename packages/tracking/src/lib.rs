//! Shipment lookup and the view logic around it.
//!
//! Nothing in this crate touches the DOM or the database, so the same code runs in
//! the WASM client and on the server.

pub mod carousel;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod query;
pub mod response;
pub mod search;
pub mod timeline;

#[cfg(feature = "client")]
mod webhook;
#[cfg(feature = "client")]
pub use webhook::WebhookResolver;

pub use carousel::{CardPlacement, Carousel};
pub use client::{Resolver, TrackingClient};
pub use config::{AuthConfig, DatabaseConfig, TrackerConfig, WebhookConfig};
pub use display::{eta_label, StatusTone};
pub use error::TrackingError;
pub use models::{Checkpoint, CheckpointEvent, Coordinate, TrackingData};
pub use query::TrackingQuery;
pub use response::ResolveResponse;
pub use search::{SearchPhase, SearchState, SearchTicket};
pub use timeline::{timeline, CheckpointIcon, TimelineEntry};
