//! # API crate: fullstack server functions for the shipment tracker
//!
//! Every server function the web frontend calls lives here, together with the
//! modules behind them.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | partly `server` | Google OAuth, the domain gate and the usage-session lifecycle |
//! | [`db`] | `server` | PostgreSQL pool (lazy `OnceCell` singleton) and the [`store::RecordStore`] implementation |
//! | [`models`] | — | `User`, its client projection `UserInfo`, and `AuthSnapshot` |
//! | [`settings`] | `server` | `tracker.toml` plus `TRACKER_*` environment overrides |
//!
//! ## Server functions exposed here
//!
//! Each one is compiled twice: with full server logic (behind `#[cfg(feature = "server")]`)
//! and as a thin client stub that forwards the call over HTTP.
//!
//! - **Authentication**: `get_auth_state`, `get_login_url`, `logout`
//! - **Tracking**: `track_shipments`
//! - **Feedback**: `submit_feedback`
//!
//! The OAuth callback and the page-unload beacon are plain axum routes in the `web`
//! crate; [`complete_google_login`] and [`record_unload`] do their work.

use dioxus::prelude::*;

pub mod auth;
pub mod db;
pub mod models;
#[cfg(feature = "server")]
pub mod settings;

pub use models::{AuthSnapshot, UserInfo};
pub use store::Rating;
pub use tracking::TrackingData;

/// Path of the beacon a closing page sends to end its usage session.
pub const USAGE_END_PATH: &str = "/api/usage/end";

#[cfg(feature = "server")]
fn server_error(e: impl std::fmt::Display) -> ServerFnError {
    ServerFnError::new(e.to_string())
}

/// Email of the admitted user of this browser session.
#[cfg(feature = "server")]
async fn require_email(session: &tower_sessions::Session) -> Result<String, ServerFnError> {
    let gate = auth::lock_gate(session).await.map_err(server_error)?;
    gate.status()
        .email()
        .map(str::to_string)
        .ok_or_else(|| ServerFnError::new("Not authenticated"))
}

/// Current auth state, re-checked against the domain gate.
///
/// Polled by the UI. Each call feeds the signed-in user (or nobody) to the gate, so a
/// user whose session disappeared gets their usage session closed, and a returning
/// admitted user gets a new one.
#[cfg(feature = "server")]
#[get("/api/auth/state", session: tower_sessions::Session)]
pub async fn get_auth_state() -> Result<AuthSnapshot, ServerFnError> {
    use crate::db::{get_pool, PgStore};
    use crate::models::User;

    let mut gate = auth::lock_gate(&session).await.map_err(server_error)?;
    let user_id: Option<String> = session
        .get(auth::SESSION_USER_ID_KEY)
        .await
        .map_err(server_error)?;

    let user: Option<User> = match user_id {
        Some(user_id) => {
            let pool = get_pool().await.map_err(server_error)?;
            let user_uuid = uuid::Uuid::parse_str(&user_id).map_err(server_error)?;
            sqlx::query_as("SELECT * FROM users WHERE id = $1")
                .bind(user_uuid)
                .fetch_optional(pool)
                .await
                .map_err(server_error)?
        }
        None => None,
    };

    let store = PgStore::connect().await.map_err(server_error)?;
    let principal = user.as_ref().map(|u| auth::Principal::new(u.email.clone()));
    gate.observe(principal.as_ref(), &store, &auth::SessionSignOut(&session))
        .await;

    let user = user.filter(|_| gate.status().is_authenticated());
    let snapshot = AuthSnapshot {
        user: user.map(|u| u.to_info()),
        error: gate.status().rejection().map(str::to_string),
        allowed_domain: gate.policy().allowed_domain().to_string(),
    };
    auth::save_gate(&session, gate).await.map_err(server_error)?;
    Ok(snapshot)
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/state")]
pub async fn get_auth_state() -> Result<AuthSnapshot, ServerFnError> {
    Ok(AuthSnapshot::default())
}

/// Get the OAuth login URL for a provider. Only `google` is configured.
#[cfg(feature = "server")]
#[get("/api/auth/login/:provider")]
pub async fn get_login_url(provider: String) -> Result<String, ServerFnError> {
    match provider.as_str() {
        "google" => {
            let oauth = auth::GoogleOAuth::new().map_err(ServerFnError::new)?;
            oauth.generate_auth_url().await.map_err(ServerFnError::new)
        }
        _ => Err(ServerFnError::new(format!("Unknown provider: {}", provider))),
    }
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/login/:provider")]
pub async fn get_login_url(provider: String) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Close the usage session, sign out and drop the browser session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    use crate::db::PgStore;

    let store = PgStore::connect().await.map_err(server_error)?;
    let mut gate = auth::lock_gate(&session).await.map_err(server_error)?;
    gate.logout(&store, &auth::SessionSignOut(&session))
        .await
        .map_err(ServerFnError::new)?;

    gate.release();
    session.flush().await.map_err(server_error)?;
    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// Resolve a comma-separated list of tracking numbers.
///
/// Numbers that fail are skipped; the call only fails when none resolved.
#[cfg(feature = "server")]
#[post("/api/track", session: tower_sessions::Session)]
pub async fn track_shipments(input: String) -> Result<Vec<TrackingData>, ServerFnError> {
    use tracking::{TrackingClient, TrackingQuery, WebhookResolver};

    let email = require_email(&session).await?;
    let query = TrackingQuery::parse(&input);
    tracing::info!(email = %email, count = query.len(), "track_requested");

    let resolver = WebhookResolver::new(&settings::settings().webhook).map_err(server_error)?;
    TrackingClient::new(resolver)
        .track(&query)
        .await
        .map_err(server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/track")]
pub async fn track_shipments(input: String) -> Result<Vec<TrackingData>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Append a feedback entry for the signed-in user.
#[cfg(feature = "server")]
#[post("/api/feedback", session: tower_sessions::Session)]
pub async fn submit_feedback(rating: Rating, comment: String) -> Result<(), ServerFnError> {
    use crate::db::PgStore;
    use store::{FeedbackEntry, RecordStore};

    let email = require_email(&session).await?;
    let entry = FeedbackEntry::new(&email, rating, comment, chrono::Utc::now());

    let store = PgStore::connect().await.map_err(server_error)?;
    let id = store.insert_feedback(&entry).await.map_err(server_error)?;
    tracing::info!(feedback_id = %id, rating = rating.as_str(), "feedback_recorded");
    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/feedback")]
pub async fn submit_feedback(rating: Rating, comment: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Finish a Google login: exchange the code, run the domain gate and, for an admitted
/// user, bind the user to the browser session.
///
/// The gate is saved on every path past the exchange, so a usage session opened here
/// is always either known to the browser session or closed again.
#[cfg(feature = "server")]
pub async fn complete_google_login(
    code: &str,
    state: &str,
    session: &tower_sessions::Session,
) -> Result<auth::AuthStatus, String> {
    use crate::db::PgStore;

    let oauth = auth::GoogleOAuth::new()?;
    let profile = oauth.exchange_code(code, state).await?;

    let store = PgStore::connect().await.map_err(|e| e.to_string())?;
    let mut gate = auth::lock_gate(session).await?;
    let bind = async {
        let user = oauth.upsert_user(&profile).await?;
        session
            .insert(auth::SESSION_USER_ID_KEY, user.id.to_string())
            .await
            .map_err(|e| e.to_string())
    };
    let result = gate
        .sign_in_and_bind(
            &auth::Principal::new(profile.email.clone()),
            &store,
            &auth::SessionSignOut(session),
            bind,
        )
        .await;

    auth::save_gate(session, gate).await?;
    result
}

/// Best-effort close of the usage session of a page that is going away.
#[cfg(feature = "server")]
pub async fn record_unload(session: &tower_sessions::Session) -> Result<(), String> {
    use crate::db::PgStore;

    let store = PgStore::connect().await.map_err(|e| e.to_string())?;
    let mut gate = auth::lock_gate(session).await?;
    gate.on_unload(&store).await;
    auth::save_gate(session, gate).await
}
