//! HTTP client for the VK method API.
//!
//! Wraps `reqwest` with token handling, API-version pinning and envelope
//! decoding. Every method checks for an `{"error": ...}` envelope and surfaces
//! it as [`VkError::Api`] before deserializing the `response` payload.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::VkError;

/// Body of a VK `{"error": {...}}` envelope.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

/// Client for the VK method API.
///
/// One client is one authenticated session. The base URL and API version
/// come from the tap config, so tests can point it at a mock server.
pub struct VkClient {
    client: Client,
    token: String,
    api_version: String,
    base_url: Url,
}

impl VkClient {
    /// Creates a client with a custom base URL and API version.
    ///
    /// # Errors
    ///
    /// Returns [`VkError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`VkError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        api_version: &str,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, VkError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vktap/0.1 (analytics-extract)")
            .build()?;

        // Exactly one trailing slash, so joining "wall.get" appends a segment
        // instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| VkError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            api_version: api_version.to_owned(),
            base_url,
        })
    }

    /// Calls `method` and deserializes its `response` payload into `T`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, VkError> {
        let url = self.build_url(method, params)?;
        tracing::debug!(method, "calling VK method");

        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let body: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| VkError::Deserialize {
                context: method.to_string(),
                source: e,
            })?;

        let payload = Self::unwrap_envelope(method, body)?;
        serde_json::from_value(payload).map_err(|e| VkError::Deserialize {
            context: method.to_string(),
            source: e,
        })
    }

    /// Builds the method URL with the token, API version and parameters as
    /// percent-encoded query pairs.
    fn build_url(&self, method: &str, extra: &[(&str, String)]) -> Result<Url, VkError> {
        let mut url = self
            .base_url
            .join(method)
            .map_err(|e| VkError::InvalidBaseUrl {
                url: format!("{}{method}", self.base_url),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", &self.token);
            pairs.append_pair("v", &self.api_version);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Splits a VK envelope into its payload or an [`VkError::Api`].
    fn unwrap_envelope(
        method: &str,
        mut body: serde_json::Value,
    ) -> Result<serde_json::Value, VkError> {
        if let Some(error) = body.get_mut("error").map(serde_json::Value::take) {
            let error: ApiErrorBody =
                serde_json::from_value(error).map_err(|e| VkError::Deserialize {
                    context: format!("{method} error envelope"),
                    source: e,
                })?;
            return Err(VkError::Api {
                method: method.to_string(),
                code: error.error_code,
                message: error.error_msg,
            });
        }

        body.get_mut("response")
            .map(serde_json::Value::take)
            .ok_or_else(|| VkError::MissingResponse {
                method: method.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
