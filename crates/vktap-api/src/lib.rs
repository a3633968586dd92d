//! Client for the VK method API.
//!
//! [`VkClient`] speaks HTTP; [`VkGateway`] is the seam the extraction
//! routines depend on, so they can run against an in-memory double in tests.

pub mod client;
pub mod error;
pub mod gateway;
mod methods;
pub mod types;

pub use client::VkClient;
pub use error::{VkError, AUTH_FAILED_CODE};
pub use gateway::{StatsQuery, VkGateway};
pub use types::{
    Comment, CommentPage, Community, Counter, GroupIdPage, GroupsByIdResponse, PostReach,
    StatCounter, StoriesPage, Story, StoryStats, WallPage, WallPost,
};
