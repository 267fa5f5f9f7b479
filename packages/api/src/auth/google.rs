//! # Google OAuth 2.0 with PKCE
//!
//! 1. [`GoogleOAuth::generate_auth_url`] builds the consent URL (`openid email profile`),
//!    stores the CSRF state and PKCE verifier in `oauth_states` for ten minutes, and
//!    asks Google to show the account chooser every time.
//! 2. [`GoogleOAuth::exchange_code`] consumes that row, trades the code for a token
//!    and returns the caller's [`GoogleProfile`]. It does not create a user: the
//!    profile first has to pass the domain gate.
//! 3. [`GoogleOAuth::upsert_user`] persists an admitted profile in `users`.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge,
    PkceCodeVerifier, Scope, TokenResponse,
};
use reqwest::Client;
use serde::Deserialize;

use super::config::OAuthConfig;
use crate::db::get_pool;
use crate::models::User;

/// Profile returned by the Google userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub struct GoogleOAuth {
    config: OAuthConfig,
}

impl GoogleOAuth {
    pub fn new() -> Result<Self, String> {
        let config = OAuthConfig::google()?;
        Ok(Self { config })
    }

    fn create_client(&self) -> ConfiguredClient {
        BasicClient::new(self.config.client_id.clone())
            .set_client_secret(self.config.client_secret.clone())
            .set_auth_uri(self.config.auth_url.clone())
            .set_token_uri(self.config.token_url.clone())
            .set_redirect_uri(self.config.redirect_url.clone())
    }

    /// Authorization URL for a fresh login attempt.
    pub async fn generate_auth_url(&self) -> Result<String, String> {
        let client = self.create_client();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .add_extra_param("prompt", "select_account")
            .set_pkce_challenge(pkce_challenge)
            .url();

        let pool = get_pool().await.map_err(|e| e.to_string())?;
        sqlx::query(
            r#"
            INSERT INTO oauth_states (state, provider, pkce_verifier, expires_at)
            VALUES ($1, 'google', $2, NOW() + INTERVAL '10 minutes')
            "#,
        )
        .bind(csrf_state.secret())
        .bind(pkce_verifier.secret())
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;

        Ok(auth_url.to_string())
    }

    /// Validate `state`, exchange `code` and fetch the signed-in profile.
    pub async fn exchange_code(&self, code: &str, state: &str) -> Result<GoogleProfile, String> {
        let pool = get_pool().await.map_err(|e| e.to_string())?;

        // Consuming the row makes a replayed callback fail.
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            DELETE FROM oauth_states
            WHERE state = $1 AND provider = 'google' AND expires_at > NOW()
            RETURNING pkce_verifier
            "#,
        )
        .bind(state)
        .fetch_optional(pool)
        .await
        .map_err(|e| e.to_string())?;

        let pkce_verifier = row.ok_or("Invalid or expired OAuth state")?.0;

        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| e.to_string())?;

        let token = self
            .create_client()
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(&http_client)
            .await
            .map_err(|e| format!("Token exchange failed: {}", e))?;

        Client::new()
            .get("https://www.googleapis.com/oauth2/v2/userinfo")
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?
            .json()
            .await
            .map_err(|e| e.to_string())
    }

    /// Create or refresh the `users` row of an admitted profile.
    pub async fn upsert_user(&self, profile: &GoogleProfile) -> Result<User, String> {
        let pool = get_pool().await.map_err(|e| e.to_string())?;
        sqlx::query_as(
            r#"
            INSERT INTO users (email, name, avatar_url, provider, provider_id)
            VALUES ($1, $2, $3, 'google', $4)
            ON CONFLICT (provider, provider_id)
            DO UPDATE SET
                email = EXCLUDED.email,
                name = EXCLUDED.name,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.picture)
        .bind(&profile.id)
        .fetch_one(pool)
        .await
        .map_err(|e| e.to_string())
    }
}
