//! Scripted in-memory gateway shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use vktap_api::{
    CommentPage, Community, GroupIdPage, GroupsByIdResponse, PostReach, StatsQuery, StoriesPage,
    StoryStats, VkError, VkGateway, WallPage,
};
use vktap_core::{parse_tap_config, TapConfig};

/// A canned answer for one call.
pub enum Reply {
    Ok(Value),
    ApiError(i64),
}

/// Gateway answering from a script keyed by `method` or `method:item_id`.
///
/// Unscripted calls fail with a service error (code 100), so a test that
/// forgets a reply sees an isolated failure rather than a panic.
#[derive(Default)]
pub struct FakeGateway {
    replies: HashMap<String, Reply>,
    calls: RefCell<Vec<String>>,
    last_stats_query: RefCell<Option<StatsQuery>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, key: &str, body: Value) -> Self {
        self.replies.insert(key.to_string(), Reply::Ok(body));
        self
    }

    pub fn fail(mut self, key: &str, code: i64) -> Self {
        self.replies.insert(key.to_string(), Reply::ApiError(code));
        self
    }

    /// Keys of every call made, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn last_stats_query(&self) -> Option<StatsQuery> {
        self.last_stats_query.borrow().clone()
    }

    fn answer<T: DeserializeOwned>(&self, key: String) -> Result<T, VkError> {
        self.calls.borrow_mut().push(key.clone());
        let method = key.split(':').next().unwrap_or_default().to_string();
        match self.replies.get(&key) {
            Some(Reply::Ok(body)) => {
                serde_json::from_value(body.clone()).map_err(|source| VkError::Deserialize {
                    context: key,
                    source,
                })
            }
            Some(Reply::ApiError(code)) => Err(api_error(&method, *code)),
            None => Err(api_error(&method, 100)),
        }
    }
}

pub fn api_error(method: &str, code: i64) -> VkError {
    VkError::Api {
        method: method.to_string(),
        code,
        message: format!("scripted failure {code}"),
    }
}

impl VkGateway for FakeGateway {
    async fn groups_get_by_id(
        &self,
        group_id: i64,
        _fields: &str,
    ) -> Result<Vec<Community>, VkError> {
        // Accept both response shapes, as the HTTP client does.
        self.answer::<GroupsByIdResponse>(format!("groups.getById:{group_id}"))
            .map(GroupsByIdResponse::into_communities)
    }

    async fn groups_get_admin(&self, user_id: i64) -> Result<GroupIdPage, VkError> {
        self.answer(format!("groups.get:{user_id}"))
    }

    async fn wall_get(&self, _owner_id: i64, _count: u32) -> Result<WallPage, VkError> {
        self.answer("wall.get".to_string())
    }

    async fn wall_get_comments(
        &self,
        _owner_id: i64,
        post_id: i64,
        _count: u32,
    ) -> Result<CommentPage, VkError> {
        self.answer(format!("wall.getComments:{post_id}"))
    }

    async fn stats_get_post_reach(
        &self,
        _owner_id: i64,
        post_id: i64,
    ) -> Result<Vec<PostReach>, VkError> {
        self.answer(format!("stats.getPostReach:{post_id}"))
    }

    async fn stats_get(&self, query: &StatsQuery) -> Result<Value, VkError> {
        *self.last_stats_query.borrow_mut() = Some(query.clone());
        self.answer("stats.get".to_string())
    }

    async fn stories_get(&self, _owner_id: i64) -> Result<StoriesPage, VkError> {
        self.answer("stories.get".to_string())
    }

    async fn stories_get_stats(
        &self,
        _owner_id: i64,
        story_id: i64,
    ) -> Result<StoryStats, VkError> {
        self.answer(format!("stories.getStats:{story_id}"))
    }
}

/// Config for community 42 with the given extra YAML lines.
pub fn config(extra: &str) -> TapConfig {
    parse_tap_config(&format!("token: secret\ngroup_id: 42\napp_id: 7\n{extra}"))
        .expect("test config should parse")
}

/// A `wall.get` body listing posts with the given ids.
pub fn wall(post_ids: &[i64]) -> Value {
    let items: Vec<Value> = post_ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "owner_id": -42,
                "date": 1_700_000_000 + id,
                "type": "post",
                "text": format!("post {id}"),
                "comments": { "count": 1 },
                "likes": { "count": 2 }
            })
        })
        .collect();
    serde_json::json!({ "count": items.len(), "items": items })
}
