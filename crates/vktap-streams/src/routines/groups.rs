//! Snapshot of the configured community.

use vktap_api::{Community, VkGateway};
use vktap_core::TapConfig;

use crate::error::StreamError;
use crate::schema::{Property, Schema};

pub const NAME: &str = "group";
pub const PRIMARY_KEYS: &[&str] = &["id"];

/// Extra fields requested from `groups.getById`.
const FIELDS: &str = "members_count,site";

#[must_use]
pub fn schema() -> Schema {
    Schema::new(vec![
        Property::integer("id").describe("The group's system ID"),
        Property::string("name"),
        Property::string("screen_name"),
        Property::string("site"),
        Property::string("photo_50"),
        Property::string("photo_100"),
        Property::string("photo_200"),
        Property::integer("is_closed"),
        Property::integer("is_admin"),
        Property::integer("admin_level"),
        Property::integer("is_member"),
        Property::integer("is_advertiser"),
        Property::integer("members_count"),
    ])
}

/// Snapshot of the configured community.
///
/// # Errors
///
/// Any gateway failure is fatal.
pub async fn extract<G: VkGateway>(
    gateway: &G,
    config: &TapConfig,
) -> Result<Vec<Community>, StreamError> {
    let communities = gateway.groups_get_by_id(config.group_id, FIELDS).await?;
    tracing::info!(
        stream = NAME,
        group_id = config.group_id,
        rows = communities.len(),
        "extraction complete"
    );
    Ok(communities)
}
