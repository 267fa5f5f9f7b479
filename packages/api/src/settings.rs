//! Server settings: `tracker.toml` layered under `TRACKER_*` environment variables.
//!
//! ```text
//! TRACKER_CONFIG=/etc/tracker.toml        # file location, default ./tracker.toml
//! TRACKER_WEBHOOK__URL=https://...        # overrides [webhook] url
//! TRACKER_WEBHOOK__TIMEOUT_SECS=10
//! TRACKER_AUTH__ALLOWED_DOMAIN=example.com
//! TRACKER_AUTH__REDIRECT_URL=https://track.example.com/auth/google/callback
//! TRACKER_DATABASE__MAX_CONNECTIONS=10
//! ```

use std::sync::OnceLock;

use config::{Config, ConfigError, Environment, File, FileFormat};
use tracking::TrackerConfig;

use crate::auth::DomainPolicy;

static SETTINGS: OnceLock<TrackerConfig> = OnceLock::new();

/// Build the configuration from `path` (optional) and the environment.
pub fn load(path: &str) -> Result<TrackerConfig, ConfigError> {
    Config::builder()
        .add_source(File::with_name(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("TRACKER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// Process-wide settings, loaded on first use.
pub fn settings() -> &'static TrackerConfig {
    SETTINGS.get_or_init(|| {
        dotenvy::dotenv().ok();
        let path = std::env::var("TRACKER_CONFIG")
            .unwrap_or_else(|_| TrackerConfig::filename().to_string());
        match load(&path) {
            Ok(config) => {
                tracing::info!(path = %path, webhook = %config.webhook.url, "settings_loaded");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "settings_invalid_using_defaults");
                TrackerConfig::default()
            }
        }
    })
}

pub fn domain_policy() -> DomainPolicy {
    DomainPolicy::new(&settings().auth.allowed_domain)
}
