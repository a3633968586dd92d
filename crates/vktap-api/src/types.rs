//! VK API response types.
//!
//! Every method wraps its payload in `{"response": ...}`; the client unwraps
//! that envelope before these types are deserialized. Counters the API omits
//! when zero are `#[serde(default)]`.

use serde::{Deserialize, Serialize};

/// A `{"count": n}` sub-object, as used for likes and comments.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub count: i64,
}

// ---------------------------------------------------------------------------
// groups.getById
// ---------------------------------------------------------------------------

/// A community snapshot from `groups.getById`. Serialized as-is into the
/// groups stream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Community {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub photo_50: Option<String>,
    #[serde(default)]
    pub photo_100: Option<String>,
    #[serde(default)]
    pub photo_200: Option<String>,
    #[serde(default)]
    pub is_closed: Option<i64>,
    #[serde(default)]
    pub is_admin: Option<i64>,
    #[serde(default)]
    pub admin_level: Option<i64>,
    #[serde(default)]
    pub is_member: Option<i64>,
    #[serde(default)]
    pub is_advertiser: Option<i64>,
    #[serde(default)]
    pub members_count: Option<i64>,
}

/// `groups.getById` returns a bare array on old API versions and a
/// `{"groups": [...], "profiles": [...]}` object on current ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GroupsByIdResponse {
    List(Vec<Community>),
    Envelope { groups: Vec<Community> },
}

impl GroupsByIdResponse {
    #[must_use]
    pub fn into_communities(self) -> Vec<Community> {
        match self {
            GroupsByIdResponse::List(groups) | GroupsByIdResponse::Envelope { groups } => groups,
        }
    }
}

// ---------------------------------------------------------------------------
// groups.get
// ---------------------------------------------------------------------------

/// Community ids returned by `groups.get` without `extended`.
#[derive(Debug, Deserialize)]
pub struct GroupIdPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub items: Vec<i64>,
}

// ---------------------------------------------------------------------------
// wall.get / stats.getPostReach
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct WallPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub items: Vec<WallPost>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WallPost {
    pub id: i64,
    pub owner_id: i64,
    pub date: i64,
    #[serde(default)]
    pub inner_type: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub comments: Counter,
    #[serde(default)]
    pub likes: Counter,
}

/// Per-post reach counters from `stats.getPostReach`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostReach {
    pub post_id: i64,
    #[serde(default)]
    pub hide: i64,
    #[serde(default)]
    pub join_group: i64,
    #[serde(default)]
    pub links: i64,
    #[serde(default)]
    pub reach_subscribers: i64,
    #[serde(default)]
    pub reach_total: i64,
    #[serde(default)]
    pub reach_viral: i64,
    #[serde(default)]
    pub reach_ads: i64,
    #[serde(default)]
    pub report: i64,
    #[serde(default)]
    pub to_group: i64,
    #[serde(default)]
    pub unsubscribe: i64,
}

// ---------------------------------------------------------------------------
// wall.getComments
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub items: Vec<Comment>,
}

/// A wall comment. Deleted comments come back without author or text.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub from_id: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub reply_to_user: Option<i64>,
    #[serde(default)]
    pub reply_to_comment: Option<i64>,
    #[serde(default)]
    pub likes: Option<Counter>,
}

// ---------------------------------------------------------------------------
// stories.get / stories.getStats
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StoriesPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    items: Vec<StoryFeedItem>,
}

/// Older API versions return each feed item as a bare array of stories;
/// newer ones wrap them in `{"stories": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoryFeedItem {
    Flat(Vec<Story>),
    Grouped { stories: Vec<Story> },
}

impl StoriesPage {
    /// All stories across feed items, in response order.
    #[must_use]
    pub fn into_stories(self) -> Vec<Story> {
        self.items
            .into_iter()
            .flat_map(|item| match item {
                StoryFeedItem::Flat(stories) | StoryFeedItem::Grouped { stories } => stories,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    pub id: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub expires_at: i64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub track_code: Option<String>,
    #[serde(default)]
    pub likes_count: Option<i64>,
    #[serde(default)]
    pub new_reactions: Vec<serde_json::Value>,
    #[serde(default)]
    pub narratives_count: Option<i64>,
    #[serde(default)]
    pub clickable_stickers: Option<ClickableStickers>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClickableStickers {
    #[serde(default)]
    pub clickable_stickers: Vec<ClickableSticker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClickableSticker {
    #[serde(default)]
    pub link_object: Option<LinkObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkObject {
    #[serde(default)]
    pub url: Option<String>,
}

impl Story {
    /// URL behind the first clickable sticker, if that sticker is a link.
    #[must_use]
    pub fn first_link(&self) -> Option<&str> {
        self.clickable_stickers
            .as_ref()?
            .clickable_stickers
            .first()?
            .link_object
            .as_ref()?
            .url
            .as_deref()
    }
}

/// A `{"state": "on", "count": n}` metric from `stories.getStats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatCounter {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryStats {
    #[serde(default)]
    pub views: Option<StatCounter>,
    #[serde(default)]
    pub replies: Option<StatCounter>,
    #[serde(default)]
    pub answer: Option<StatCounter>,
    #[serde(default)]
    pub shares: Option<StatCounter>,
    #[serde(default)]
    pub subscribers: Option<StatCounter>,
    #[serde(default)]
    pub bans: Option<StatCounter>,
    #[serde(default)]
    pub open_link: Option<StatCounter>,
}

impl StoryStats {
    /// Count of a metric, 0 when the API omitted it.
    #[must_use]
    pub fn count_of(metric: Option<&StatCounter>) -> i64 {
        metric.map_or(0, |m| m.count)
    }
}
