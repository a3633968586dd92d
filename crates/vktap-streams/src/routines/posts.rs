//! Wall posts joined with their reach counters.

use serde::Serialize;
use vktap_api::{PostReach, VkGateway, WallPost};
use vktap_core::TapConfig;

use super::list_posts;
use crate::definition::StreamKind;
use crate::error::StreamError;
use crate::isolation::Isolator;
use crate::schema::{Property, Schema};

pub const NAME: &str = "group_posts";
pub const PRIMARY_KEYS: &[&str] = &["post_id", "group_id"];

/// Reach counters of one post, without the API's own `post_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReachFields {
    pub hide: i64,
    pub join_group: i64,
    pub links: i64,
    pub reach_subscribers: i64,
    pub reach_total: i64,
    pub reach_viral: i64,
    pub reach_ads: i64,
    pub report: i64,
    pub to_group: i64,
    pub unsubscribe: i64,
}

impl From<PostReach> for ReachFields {
    fn from(r: PostReach) -> Self {
        Self {
            hide: r.hide,
            join_group: r.join_group,
            links: r.links,
            reach_subscribers: r.reach_subscribers,
            reach_total: r.reach_total,
            reach_viral: r.reach_viral,
            reach_ads: r.reach_ads,
            report: r.report,
            to_group: r.to_group,
            unsubscribe: r.unsubscribe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRow {
    pub post_id: i64,
    /// The post's `owner_id`: the negated community id.
    pub group_id: i64,
    pub date: i64,
    pub inner_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: String,
    pub comments: i64,
    pub likes: i64,
    #[serde(flatten)]
    pub reach: ReachFields,
}

impl PostRow {
    #[must_use]
    pub fn new(post: WallPost, reach: ReachFields) -> Self {
        Self {
            post_id: post.id,
            group_id: post.owner_id,
            date: post.date,
            inner_type: post.inner_type,
            kind: post.kind,
            text: post.text,
            comments: post.comments.count,
            likes: post.likes.count,
            reach,
        }
    }
}

#[must_use]
pub fn schema() -> Schema {
    Schema::new(vec![
        Property::integer("post_id").describe("The post's system ID"),
        Property::integer("group_id").describe("The group's system ID"),
        Property::integer("date"),
        Property::string("inner_type"),
        Property::string("type"),
        Property::string("text"),
        Property::integer("comments"),
        Property::integer("likes"),
        Property::integer("hide"),
        Property::integer("join_group"),
        Property::integer("links"),
        Property::integer("reach_subscribers"),
        Property::integer("reach_total"),
        Property::integer("reach_viral"),
        Property::integer("reach_ads"),
        Property::integer("report"),
        Property::integer("to_group"),
        Property::integer("unsubscribe"),
    ])
}

/// List posts and fetch reach for each.
///
/// An isolated reach failure, or an empty reach list, zero-fills the post's
/// counters.
///
/// # Errors
///
/// Listing failures and non-isolatable reach failures are fatal.
pub async fn extract<G: VkGateway>(
    gateway: &G,
    config: &TapConfig,
) -> Result<Vec<PostRow>, StreamError> {
    let owner_id = config.owner_id();
    let posts = list_posts(gateway, config).await?;
    let mut isolator = Isolator::for_stream(StreamKind::GroupPosts);
    let mut rows = Vec::with_capacity(posts.len());

    for post in posts {
        let result = gateway.stats_get_post_reach(owner_id, post.id).await;
        let reach = isolator
            .settle(post.id, result, Vec::new)?
            .and_then(|list| list.into_iter().next())
            .map(ReachFields::from)
            .unwrap_or_default();
        rows.push(PostRow::new(post, reach));
    }

    tracing::info!(
        stream = NAME,
        rows = rows.len(),
        reach_fetched = isolator.fetched(),
        reach_zero_filled = isolator.isolated(),
        "extraction complete"
    );
    Ok(rows)
}
