use thiserror::Error;
use vktap_api::VkError;
use vktap_core::ConfigError;

/// Errors that abort a stream run.
///
/// Per-item gateway failures that can be isolated never surface here; see
/// [`crate::isolation`].
#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Gateway(#[from] VkError),

    /// The API answered, but not in the shape the stream relies on.
    #[error("unexpected response shape in {context}: {reason}")]
    Structural { context: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown stream: {0}")]
    UnknownStream(String),

    #[error("failed to serialize {stream} rows: {source}")]
    Serialize {
        stream: String,
        #[source]
        source: serde_json::Error,
    },
}
