// src/transport/http.rs
// =============================================================================
// The real Transport: a reqwest client with a timeout.
//
// Key functionality:
// - One pooled Client reused for every page (connection reuse)
// - A fresh User-Agent per request from the configured UserAgentSource
// - Non-2xx statuses and network errors become FetchError values
// - Non-HTML responses come back as an empty body, so they yield no links
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use super::user_agent::UserAgentSource;
use super::{FetchError, Transport};
use crate::links::CanonicalUrl;

pub struct HttpTransport {
    client: Client,
    user_agents: Arc<dyn UserAgentSource>,
}

impl HttpTransport {
    pub fn new(
        timeout: Duration,
        user_agents: Arc<dyn UserAgentSource>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client, user_agents })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &CanonicalUrl) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .header(header::USER_AGENT, self.user_agents.pick())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        // No Content-Type at all: give the parser a chance anyway
        if !content_type.is_empty() && !is_html_content_type(&content_type) {
            debug!(%url, content_type = %content_type, "not HTML, skipping body");
            return Ok(Vec::new());
        }

        let body = response.bytes().await.map_err(categorize_error)?;
        Ok(body.to_vec())
    }
}

fn is_html_content_type(content_type: &str) -> bool {
    content_type.starts_with("text/html") || content_type.starts_with("application/xhtml+xml")
}

// Sorts reqwest errors into the buckets we log
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}
