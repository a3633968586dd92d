//! Comments under each listed post.

use serde::Serialize;
use vktap_api::{Comment, CommentPage, VkGateway};
use vktap_core::TapConfig;

use super::list_posts;
use crate::definition::StreamKind;
use crate::error::StreamError;
use crate::isolation::Isolator;
use crate::schema::{Property, Schema};

pub const NAME: &str = "group_posts_comments";
pub const PRIMARY_KEYS: &[&str] = &["post_id", "group_id", "comment_id"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRow {
    pub comment_id: i64,
    pub post_id: i64,
    pub group_id: i64,
    pub from_id: i64,
    pub date: i64,
    pub text: String,
    pub reply_to_user: i64,
    pub reply_to_comment: i64,
    pub likes: i64,
}

impl CommentRow {
    #[must_use]
    pub fn new(owner_id: i64, post_id: i64, comment: Comment) -> Self {
        Self {
            comment_id: comment.id,
            post_id,
            group_id: owner_id,
            from_id: comment.from_id,
            date: comment.date,
            text: comment.text,
            reply_to_user: comment.reply_to_user.unwrap_or(0),
            reply_to_comment: comment.reply_to_comment.unwrap_or(0),
            likes: comment.likes.map_or(0, |l| l.count),
        }
    }
}

#[must_use]
pub fn schema() -> Schema {
    Schema::new(vec![
        Property::integer("post_id").describe("The post's system ID"),
        Property::integer("group_id").describe("The group's system ID"),
        Property::integer("comment_id").describe("The comment's system ID"),
        Property::integer("from_id"),
        Property::integer("date"),
        Property::string("text"),
        Property::integer("reply_to_user"),
        Property::integer("reply_to_comment"),
        Property::integer("likes"),
    ])
}

/// List posts, then the newest comments of each.
///
/// # Errors
///
/// Listing failures and non-isolatable comment failures are fatal.
pub async fn extract<G: VkGateway>(
    gateway: &G,
    config: &TapConfig,
) -> Result<Vec<CommentRow>, StreamError> {
    let owner_id = config.owner_id();
    let posts = list_posts(gateway, config).await?;
    let mut isolator = Isolator::for_stream(StreamKind::GroupPostsComments);
    let mut rows = Vec::new();

    for post in &posts {
        let result = gateway
            .wall_get_comments(owner_id, post.id, config.page_size)
            .await;
        let Some(page) = isolator.settle(post.id, result, CommentPage::default)? else {
            continue;
        };
        rows.extend(
            page.items
                .into_iter()
                .map(|c| CommentRow::new(owner_id, post.id, c)),
        );
    }

    tracing::info!(
        stream = NAME,
        posts = posts.len(),
        rows = rows.len(),
        posts_skipped = isolator.isolated(),
        "extraction complete"
    );
    Ok(rows)
}
