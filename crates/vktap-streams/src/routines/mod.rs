//! One extraction routine per stream kind.
//!
//! A routine takes the validated [`TapConfig`](vktap_core::TapConfig) and a
//! [`VkGateway`](vktap_api::VkGateway), awaits its calls one at a time, and
//! returns typed rows. Each module also owns its stream's [`Schema`].
//!
//! [`Schema`]: crate::schema::Schema

pub mod admin_groups;
pub mod comments;
pub mod group_stat;
pub mod groups;
pub mod posts;
pub mod story;

use vktap_api::{VkError, VkGateway, WallPost};
use vktap_core::TapConfig;

/// The newest `page_size` posts on the configured community's wall.
///
/// Shared by the posts and comments routines. Failures are fatal.
pub(crate) async fn list_posts<G: VkGateway>(
    gateway: &G,
    config: &TapConfig,
) -> Result<Vec<WallPost>, VkError> {
    let page = gateway.wall_get(config.owner_id(), config.page_size).await?;
    tracing::debug!(
        owner_id = config.owner_id(),
        total = page.count,
        fetched = page.items.len(),
        "listed wall posts"
    );
    Ok(page.items)
}
