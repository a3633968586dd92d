use thiserror::Error;

/// VK error code for "User authorization failed". Never isolated per item.
pub const AUTH_FAILED_CODE: i64 = 5;

/// Errors returned by the VK API client.
#[derive(Debug, Error)]
pub enum VkError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an `{"error": {...}}` envelope.
    #[error("VK API error {code} in {method}: {message}")]
    Api {
        method: String,
        code: i64,
        message: String,
    },

    /// The envelope carried neither `response` nor `error`.
    #[error("VK API returned no response body for {method}")]
    MissingResponse { method: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl VkError {
    /// Whether this failure may be confined to the single item that caused
    /// it. Only service-level errors qualify, and authorization failures
    /// never do: they would fail every subsequent call as well.
    #[must_use]
    pub fn is_isolatable(&self) -> bool {
        matches!(self, VkError::Api { code, .. } if *code != AUTH_FAILED_CODE)
    }
}
