use vktap_api::VkClient;
use vktap_core::TapConfig;

use crate::definition::{Record, StreamKind};
use crate::error::StreamError;

/// Build a fresh authenticated client for one stream run.
///
/// # Errors
///
/// Fails if the stream's token is not configured or the client cannot be
/// constructed.
pub fn open_session(kind: StreamKind, config: &TapConfig) -> Result<VkClient, StreamError> {
    let token = kind.token(config)?;
    let client = VkClient::with_base_url(
        token,
        &config.api_version,
        config.request_timeout(),
        &config.api_base_url,
    )?;
    Ok(client)
}

/// Open a session and produce the stream's records.
///
/// # Errors
///
/// Any [`StreamError`] from [`open_session`] or
/// [`StreamKind::produce_records`].
pub async fn run_stream(kind: StreamKind, config: &TapConfig) -> Result<Vec<Record>, StreamError> {
    tracing::info!(stream = kind.name(), "starting stream");
    let client = open_session(kind, config)?;
    let records = kind.produce_records(&client, config).await?;
    tracing::info!(stream = kind.name(), records = records.len(), "stream finished");
    Ok(records)
}
