//! [`VkGateway`] over HTTP.

use crate::client::VkClient;
use crate::error::VkError;
use crate::gateway::{StatsQuery, VkGateway};
use crate::types::{
    CommentPage, Community, GroupIdPage, GroupsByIdResponse, PostReach, StoriesPage, StoryStats,
    WallPage,
};

impl VkGateway for VkClient {
    async fn groups_get_by_id(
        &self,
        group_id: i64,
        fields: &str,
    ) -> Result<Vec<Community>, VkError> {
        let response: GroupsByIdResponse = self
            .call(
                "groups.getById",
                &[
                    ("group_id", group_id.to_string()),
                    ("fields", fields.to_string()),
                    ("extended", "1".to_string()),
                ],
            )
            .await?;
        Ok(response.into_communities())
    }

    async fn groups_get_admin(&self, user_id: i64) -> Result<GroupIdPage, VkError> {
        self.call(
            "groups.get",
            &[
                ("user_id", user_id.to_string()),
                ("filter", "admin".to_string()),
            ],
        )
        .await
    }

    async fn wall_get(&self, owner_id: i64, count: u32) -> Result<WallPage, VkError> {
        self.call(
            "wall.get",
            &[
                ("owner_id", owner_id.to_string()),
                ("count", count.to_string()),
            ],
        )
        .await
    }

    async fn wall_get_comments(
        &self,
        owner_id: i64,
        post_id: i64,
        count: u32,
    ) -> Result<CommentPage, VkError> {
        self.call(
            "wall.getComments",
            &[
                ("owner_id", owner_id.to_string()),
                ("post_id", post_id.to_string()),
                ("need_likes", "1".to_string()),
                ("count", count.to_string()),
                ("sort", "desc".to_string()),
            ],
        )
        .await
    }

    async fn stats_get_post_reach(
        &self,
        owner_id: i64,
        post_id: i64,
    ) -> Result<Vec<PostReach>, VkError> {
        self.call(
            "stats.getPostReach",
            &[
                ("owner_id", owner_id.to_string()),
                ("post_ids", post_id.to_string()),
            ],
        )
        .await
    }

    async fn stats_get(&self, query: &StatsQuery) -> Result<serde_json::Value, VkError> {
        let mut params = vec![
            ("group_id", query.group_id.to_string()),
            ("timestamp_from", query.timestamp_from.to_string()),
            ("interval", query.interval.to_string()),
            ("extended", u8::from(query.extended).to_string()),
        ];
        if let Some(app_id) = query.app_id {
            params.push(("app_id", app_id.to_string()));
        }
        self.call("stats.get", &params).await
    }

    async fn stories_get(&self, owner_id: i64) -> Result<StoriesPage, VkError> {
        self.call("stories.get", &[("owner_id", owner_id.to_string())])
            .await
    }

    async fn stories_get_stats(
        &self,
        owner_id: i64,
        story_id: i64,
    ) -> Result<StoryStats, VkError> {
        self.call(
            "stories.getStats",
            &[
                ("owner_id", owner_id.to_string()),
                ("story_id", story_id.to_string()),
            ],
        )
        .await
    }
}
