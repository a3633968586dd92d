//! Communities administered by the legacy `params.user_id`.

use serde::Serialize;
use vktap_api::VkGateway;
use vktap_core::{ConfigError, TapConfig};

use crate::error::StreamError;
use crate::schema::{Property, Schema};

pub const NAME: &str = "admin_groups";
pub const PRIMARY_KEYS: &[&str] = &["id"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminGroupRow {
    pub id: i64,
    pub user_id: i64,
}

#[must_use]
pub fn schema() -> Schema {
    Schema::new(vec![
        Property::integer("id").describe("The group's system ID"),
        Property::integer("user_id").describe("The administering user's ID"),
    ])
}

/// List the communities the legacy user administers.
///
/// The gateway must be authenticated with `params.token`; see
/// [`crate::StreamKind::token`].
///
/// # Errors
///
/// [`ConfigError::MissingField`] when `params` is absent, otherwise any
/// gateway failure.
pub async fn extract<G: VkGateway>(
    gateway: &G,
    config: &TapConfig,
) -> Result<Vec<AdminGroupRow>, StreamError> {
    let params = config
        .params
        .as_ref()
        .ok_or_else(|| ConfigError::MissingField("params".to_string()))?;

    let page = gateway.groups_get_admin(params.user_id).await?;
    let rows: Vec<AdminGroupRow> = page
        .items
        .into_iter()
        .map(|id| AdminGroupRow {
            id,
            user_id: params.user_id,
        })
        .collect();

    tracing::info!(
        stream = NAME,
        user_id = params.user_id,
        total = page.count,
        rows = rows.len(),
        "extraction complete"
    );
    Ok(rows)
}
