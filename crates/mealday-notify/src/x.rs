//! Posting through the X (Twitter) v2 API.

use std::time::Duration;

use mealday_shared::constants::{APP_NAME, X_POST_ENDPOINT};
use mealday_shared::{Notifier, NotifyError, PostedStatus};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::credentials::Credentials;
use crate::oauth;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct CreatePost<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    data: PostedStatus,
}

/// Blocking notifier that creates one post per call.
pub struct XNotifier {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl XNotifier {
    /// Build a notifier for the public endpoint.  Fails if a key needed
    /// for OAuth 1.0a signing is missing.
    pub fn new(credentials: Credentials) -> Result<Self, NotifyError> {
        credentials.require_oauth()?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("{APP_NAME}/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: X_POST_ENDPOINT.to_string(),
            credentials,
        })
    }

    /// Send to a different URL (a proxy or a test server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Notifier for XNotifier {
    fn post(&self, message: &str) -> Result<PostedStatus, NotifyError> {
        let header = oauth::authorization_header(
            "POST",
            &self.endpoint,
            &self.credentials,
            &oauth::generate_nonce(),
            oauth::timestamp(),
        )?;

        debug!(endpoint = %self.endpoint, chars = message.chars().count(), "posting");
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, header)
            .json(&CreatePost { text: message })
            .send()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "post rejected");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let posted = parse_response(&body)?;
        info!(id = %posted.id, "post created");
        Ok(posted)
    }
}

fn parse_response(body: &str) -> Result<PostedStatus, NotifyError> {
    serde_json::from_str::<CreatePostResponse>(body)
        .map(|r| r.data)
        .map_err(|e| NotifyError::InvalidResponse(e.to_string()))
}
