//! The entity-fetch surface the extraction routines are written against.

use crate::error::VkError;
use crate::types::{
    CommentPage, Community, GroupIdPage, PostReach, StoriesPage, StoryStats, WallPage,
};

/// Parameters for `stats.get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsQuery {
    pub group_id: i64,
    pub app_id: Option<i64>,
    /// Unix seconds of the first period to return.
    pub timestamp_from: i64,
    /// `day`, `week`, `month`, `year` or `all`.
    pub interval: &'static str,
    pub extended: bool,
}

/// Entity-fetch operations of the VK API.
///
/// Every call is independent: one failing does not poison the session.
/// Calls are awaited one at a time by the routines, so implementations need
/// not be `Send`.
#[allow(async_fn_in_trait)]
pub trait VkGateway {
    /// `groups.getById` with the given extra `fields`.
    async fn groups_get_by_id(&self, group_id: i64, fields: &str)
        -> Result<Vec<Community>, VkError>;

    /// `groups.get` with `filter=admin`: communities `user_id` administers.
    async fn groups_get_admin(&self, user_id: i64) -> Result<GroupIdPage, VkError>;

    /// `wall.get`: the newest `count` posts on the owner's wall.
    async fn wall_get(&self, owner_id: i64, count: u32) -> Result<WallPage, VkError>;

    /// `wall.getComments` with likes, newest first.
    async fn wall_get_comments(
        &self,
        owner_id: i64,
        post_id: i64,
        count: u32,
    ) -> Result<CommentPage, VkError>;

    /// `stats.getPostReach` for a single post.
    async fn stats_get_post_reach(
        &self,
        owner_id: i64,
        post_id: i64,
    ) -> Result<Vec<PostReach>, VkError>;

    /// `stats.get`. The payload is returned raw; its nesting is handled by the
    /// flattening engine.
    async fn stats_get(&self, query: &StatsQuery) -> Result<serde_json::Value, VkError>;

    /// `stories.get` for the owner.
    async fn stories_get(&self, owner_id: i64) -> Result<StoriesPage, VkError>;

    /// `stories.getStats` for one story.
    async fn stories_get_stats(&self, owner_id: i64, story_id: i64)
        -> Result<StoryStats, VkError>;
}
