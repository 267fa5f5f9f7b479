//! # Application configuration: `tracker.toml`
//!
//! ```toml
//! [webhook]
//! url = "https://example.app.n8n.cloud/webhook/..."
//! timeout_secs = 30
//!
//! [auth]
//! allowed_domain = "dynaproco.com"
//! redirect_url = "http://localhost:8080/auth/google/callback"
//!
//! [database]
//! max_connections = 5
//! acquire_timeout_secs = 5
//! ```
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`TrackerConfig`] | Top-level config with TOML (de)serialisation. The server layers environment variables on top. |
//! | [`WebhookConfig`] | Where tracking numbers are resolved and how long a single lookup may take. |
//! | [`AuthConfig`] | The single email domain allowed to sign in and the OAuth callback URL. |
//! | [`DatabaseConfig`] | Pool sizing. The connection string stays in `DATABASE_URL`. |
//!
//! Every section has defaults, so a missing or empty file is a working configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WEBHOOK_URL: &str =
    "https://jssilvam1.app.n8n.cloud/webhook/b1ddc9f9-0229-4fd5-a261-3c8721149abb";
pub const DEFAULT_ALLOWED_DOMAIN: &str = "dynaproco.com";
pub const DEFAULT_REDIRECT_URL: &str = "http://localhost:8080/auth/google/callback";

/// Top-level configuration stored in `tracker.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Tracking webhook configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_webhook_url")]
    pub url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Sign-in restrictions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Domain part of the only accepted email addresses, without the `@`.
    #[serde(default = "default_allowed_domain")]
    pub allowed_domain: String,
    /// Where the OAuth provider sends the browser back to.
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
}

/// Connection pool settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_webhook_url() -> String {
    DEFAULT_WEBHOOK_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_allowed_domain() -> String {
    DEFAULT_ALLOWED_DOMAIN.to_string()
}

fn default_redirect_url() -> String {
    DEFAULT_REDIRECT_URL.to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: default_webhook_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allowed_domain: default_allowed_domain(),
            redirect_url: default_redirect_url(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl TrackerConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "tracker.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = TrackerConfig::from_toml("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.webhook.timeout_secs, 30);
        assert_eq!(config.auth.allowed_domain, "dynaproco.com");
        assert_eq!(config.auth.redirect_url, DEFAULT_REDIRECT_URL);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_partial_sections() {
        let config = TrackerConfig::from_toml(
            r#"
            [webhook]
            url = "http://localhost:5678/webhook/track"

            [auth]
            allowed_domain = "example.com"

            [database]
            max_connections = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.webhook.url, "http://localhost:5678/webhook/track");
        assert_eq!(config.webhook.timeout_secs, 30);
        assert_eq!(config.auth.allowed_domain, "example.com");
        assert_eq!(config.auth.redirect_url, DEFAULT_REDIRECT_URL);
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.database.acquire_timeout_secs, 5);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = TrackerConfig::default();
        config.webhook.timeout_secs = 5;
        let text = config.to_toml().unwrap();
        assert_eq!(TrackerConfig::from_toml(&text).unwrap(), config);
    }
}
