use dioxus::prelude::*;

use ui::AuthProvider;
use views::{Login, Track};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/login?:error")]
    Login { error: String },
    #[route("/track")]
    Track {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use axum::routing::{get, post};
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use std::time::Duration;
    use tower_sessions::cookie::SameSite;
    use tower_sessions::{Expiry, SessionManagerLayer};
    use tower_sessions_sqlx_store::PostgresStore;
    use tracing_subscriber::EnvFilter;

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load settings early so a bad config file is reported at startup
    let settings = api::settings::settings();
    tracing::info!(
        allowed_domain = %settings.auth.allowed_domain,
        timeout_secs = settings.webhook.timeout_secs,
        "tracker_starting"
    );

    let pool = api::db::get_pool()
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("../api/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");

    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .expect("Failed to create session table");

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(
            Duration::from_secs(60 * 60 * 24 * 7).try_into().unwrap(),
        )); // 7 days

    let router = axum::Router::new()
        .route("/auth/google/callback", get(google_callback))
        .route(api::USAGE_END_PATH, post(usage_end))
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(session_layer);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .unwrap();
}

#[cfg(feature = "server")]
async fn google_callback(
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
    session: tower_sessions::Session,
) -> axum::response::Redirect {
    use axum::response::Redirect;

    if let Some(error) = params.get("error") {
        tracing::warn!("Google sign-in cancelled: {}", error);
        return Redirect::to("/login?error=cancelled");
    }
    let Some(code) = params.get("code") else {
        tracing::error!("Google callback missing code");
        return Redirect::to("/login?error=missing_code");
    };
    let Some(state) = params.get("state") else {
        tracing::error!("Google callback missing state");
        return Redirect::to("/login?error=missing_state");
    };

    match api::complete_google_login(code, state, &session).await {
        Ok(status) if status.is_authenticated() => {
            if let Err(e) = session.save().await {
                tracing::error!("Failed to save session: {}", e);
                return Redirect::to("/login?error=session_save_error");
            }
            Redirect::to("/track")
        }
        Ok(_) => {
            if let Err(e) = session.save().await {
                tracing::error!("Failed to save session: {}", e);
            }
            Redirect::to("/login?error=domain")
        }
        Err(e) => {
            tracing::error!("Google OAuth error: {}", e);
            Redirect::to("/login?error=oauth_error")
        }
    }
}

/// Beacon target of a closing page.
#[cfg(feature = "server")]
async fn usage_end(session: tower_sessions::Session) -> axum::http::StatusCode {
    if let Err(e) = api::record_unload(&session).await {
        tracing::warn!("Failed to close usage session on unload: {}", e);
    }
    axum::http::StatusCode::NO_CONTENT
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// Redirect `/` to `/track`
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Track {});
    rsx! {}
}
