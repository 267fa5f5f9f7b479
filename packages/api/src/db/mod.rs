//! # Database module: PostgreSQL pool and record store
//!
//! Server only, so client (WASM) builds never pull in SQLx.
//!
//! - [`get_pool`] returns the lazy, process-wide `&'static PgPool`. The first call
//!   reads `DATABASE_URL` (via `dotenvy`) and opens up to 5 connections.
//! - [`PgStore`] implements [`store::RecordStore`] on the `usage_sessions` and
//!   `feedback` tables.

#[cfg(feature = "server")]
mod pool;
#[cfg(feature = "server")]
mod records;

#[cfg(feature = "server")]
pub use pool::get_pool;
#[cfg(feature = "server")]
pub use records::PgStore;
