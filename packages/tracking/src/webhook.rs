//! HTTP resolver that posts each tracking number to the configured webhook.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::client::Resolver;
use crate::config::WebhookConfig;
use crate::error::TrackingError;
use crate::response::ResolveResponse;

#[derive(Serialize)]
struct ResolveRequest<'a> {
    tracking_number: &'a str,
}

/// Body of one lookup. The webhook expects a batch, even for a single number.
fn request_body(tracking_number: &str) -> [ResolveRequest<'_>; 1] {
    [ResolveRequest { tracking_number }]
}

/// [`Resolver`] backed by the tracking webhook.
#[derive(Clone, Debug)]
pub struct WebhookResolver {
    http: Client,
    url: String,
}

impl WebhookResolver {
    pub fn new(config: &WebhookConfig) -> Result<Self, TrackingError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TrackingError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Resolver for WebhookResolver {
    fn resolve(
        &self,
        tracking_number: &str,
    ) -> impl Future<Output = Result<ResolveResponse, TrackingError>> + Send {
        let request = self
            .http
            .post(&self.url)
            .json(&request_body(tracking_number));

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| TrackingError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TrackingError::Status(status.as_u16()));
            }

            response
                .json::<ResolveResponse>()
                .await
                .map_err(|e| TrackingError::Decode(e.to_string()))
        }
    }
}
