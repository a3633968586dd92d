//! Community stories with their per-story statistics.

use serde::Serialize;
use vktap_api::{Story, StoryStats, VkGateway};
use vktap_core::TapConfig;

use crate::definition::StreamKind;
use crate::error::StreamError;
use crate::isolation::Isolator;
use crate::schema::{Property, Schema};

pub const NAME: &str = "story";
pub const PRIMARY_KEYS: &[&str] = &["id", "group_id"];

/// Placeholder for absent string attributes.
const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryRow {
    pub id: i64,
    /// Positive community id.
    pub group_id: i64,
    pub date: i64,
    pub expires_at: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub track_code: String,
    pub replies: i64,
    pub views: i64,
    pub likes_count: i64,
    pub new_reactions: i64,
    pub narratives_count: i64,
    pub answer: i64,
    pub shares: i64,
    pub subscribers: i64,
    pub bans: i64,
    pub open_link: i64,
    pub link: String,
}

impl StoryRow {
    #[must_use]
    pub fn new(group_id: i64, story: Story, stats: &StoryStats) -> Self {
        let link = story.first_link().unwrap_or(MISSING).to_string();
        Self {
            id: story.id,
            group_id,
            date: story.date,
            expires_at: story.expires_at,
            kind: story.kind.unwrap_or_else(|| MISSING.to_string()),
            track_code: story.track_code.unwrap_or_else(|| MISSING.to_string()),
            replies: StoryStats::count_of(stats.replies.as_ref()),
            views: StoryStats::count_of(stats.views.as_ref()),
            likes_count: story.likes_count.unwrap_or(0),
            new_reactions: i64::try_from(story.new_reactions.len()).unwrap_or(i64::MAX),
            narratives_count: story.narratives_count.unwrap_or(0),
            answer: StoryStats::count_of(stats.answer.as_ref()),
            shares: StoryStats::count_of(stats.shares.as_ref()),
            subscribers: StoryStats::count_of(stats.subscribers.as_ref()),
            bans: StoryStats::count_of(stats.bans.as_ref()),
            open_link: StoryStats::count_of(stats.open_link.as_ref()),
            link,
        }
    }
}

#[must_use]
pub fn schema() -> Schema {
    Schema::new(vec![
        Property::integer("id").describe("The story's system ID"),
        Property::integer("group_id").describe("The group's system ID"),
        Property::integer("date"),
        Property::integer("expires_at"),
        Property::string("type"),
        Property::string("track_code"),
        Property::integer("replies"),
        Property::integer("views"),
        Property::integer("likes_count"),
        Property::integer("new_reactions"),
        Property::integer("narratives_count"),
        Property::integer("answer"),
        Property::integer("shares"),
        Property::integer("subscribers"),
        Property::integer("bans"),
        Property::integer("open_link"),
        Property::string("link"),
    ])
}

/// List stories and fetch statistics for each.
///
/// # Errors
///
/// Listing failures and non-isolatable statistics failures are fatal.
pub async fn extract<G: VkGateway>(
    gateway: &G,
    config: &TapConfig,
) -> Result<Vec<StoryRow>, StreamError> {
    let owner_id = config.owner_id();
    let stories = gateway.stories_get(owner_id).await?.into_stories();
    let listed = stories.len();
    let mut isolator = Isolator::for_stream(StreamKind::Story);
    let mut rows = Vec::with_capacity(listed);

    for story in stories {
        let result = gateway.stories_get_stats(owner_id, story.id).await;
        if let Some(stats) = isolator.settle(story.id, result, StoryStats::default)? {
            rows.push(StoryRow::new(config.group_id, story, &stats));
        }
    }

    tracing::info!(
        stream = NAME,
        stories = listed,
        rows = rows.len(),
        stories_skipped = isolator.isolated(),
        "extraction complete"
    );
    Ok(rows)
}
