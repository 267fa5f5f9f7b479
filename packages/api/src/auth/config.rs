//! Google OAuth client settings.
//!
//! Client credentials are secrets and come from `GOOGLE_CLIENT_ID` and
//! `GOOGLE_CLIENT_SECRET`; the callback URL is ordinary configuration
//! (`[auth] redirect_url`, or `TRACKER_AUTH__REDIRECT_URL`).

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use tracking::AuthConfig;

use crate::settings;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Endpoints and credentials of the Google OAuth client.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub redirect_url: RedirectUrl,
}

fn secret(name: &str) -> Result<String, String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("{name} not set"))
}

impl OAuthConfig {
    /// Google client for the process-wide settings.
    pub fn google() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::google_with(
            &settings::settings().auth,
            secret("GOOGLE_CLIENT_ID")?,
            secret("GOOGLE_CLIENT_SECRET")?,
        )
    }

    pub fn google_with(
        auth: &AuthConfig,
        client_id: String,
        client_secret: String,
    ) -> Result<Self, String> {
        let redirect_url = RedirectUrl::new(auth.redirect_url.clone())
            .map_err(|e| format!("invalid auth.redirect_url {:?}: {e}", auth.redirect_url))?;

        Ok(Self {
            client_id: ClientId::new(client_id),
            client_secret: ClientSecret::new(client_secret),
            auth_url: AuthUrl::new(GOOGLE_AUTH_URL.to_string()).map_err(|e| e.to_string())?,
            token_url: TokenUrl::new(GOOGLE_TOKEN_URL.to_string()).map_err(|e| e.to_string())?,
            redirect_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_comes_from_settings() {
        let auth = AuthConfig {
            redirect_url: "https://track.dynaproco.com/auth/google/callback".to_string(),
            ..AuthConfig::default()
        };
        let config = OAuthConfig::google_with(&auth, "id".into(), "secret".into()).unwrap();
        assert_eq!(
            config.redirect_url.as_str(),
            "https://track.dynaproco.com/auth/google/callback"
        );
        assert_eq!(config.auth_url.as_str(), GOOGLE_AUTH_URL);
    }

    #[test]
    fn test_invalid_redirect_is_reported() {
        let auth = AuthConfig {
            redirect_url: "not a url".to_string(),
            ..AuthConfig::default()
        };
        let err = OAuthConfig::google_with(&auth, "id".into(), "secret".into()).unwrap_err();
        assert!(err.contains("auth.redirect_url"));
    }
}
