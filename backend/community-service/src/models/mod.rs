/// Data models for community-service
///
/// Row structs (`FromRow`) mirror table columns; enum columns are stored as
/// TEXT and parsed at the edges. Request types carry `validator` rules.
pub mod auth;
pub mod comment;
pub mod feed;
pub mod member;
pub mod notification;
pub mod post;
pub mod profile;

pub use auth::*;
pub use comment::*;
pub use feed::*;
pub use member::*;
pub use notification::*;
pub use post::*;
pub use profile::*;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Which family of tables an interaction (comment, emoji, view) targets.
///
/// Feeds and posts share the same child-table layout, so comment, emoji and
/// view queries are written once and parameterised by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Feed,
}

impl ContentKind {
    pub fn table(self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::Feed => "feeds",
        }
    }

    /// Foreign-key column in child tables
    pub fn parent_column(self) -> &'static str {
        match self {
            ContentKind::Post => "post_id",
            ContentKind::Feed => "feed_id",
        }
    }

    pub fn comment_table(self) -> &'static str {
        match self {
            ContentKind::Post => "post_comments",
            ContentKind::Feed => "feed_comments",
        }
    }

    pub fn comment_heart_table(self) -> &'static str {
        match self {
            ContentKind::Post => "post_comment_hearts",
            ContentKind::Feed => "feed_comment_hearts",
        }
    }

    pub fn emoji_table(self) -> &'static str {
        match self {
            ContentKind::Post => "post_emojis",
            ContentKind::Feed => "feed_emojis",
        }
    }

    pub fn view_table(self) -> &'static str {
        match self {
            ContentKind::Post => "post_views",
            ContentKind::Feed => "feed_views",
        }
    }

    /// Human-readable name used in error messages
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Post => "Post",
            ContentKind::Feed => "Feed",
        }
    }
}

/// Author filter applied to feed and post lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentSortBy {
    #[default]
    All,
    ByFollow,
    ByGeneration,
}

/// Public author card embedded in list items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Writer {
    pub id: Uuid,
    pub nickname: String,
    pub generation: Option<i32>,
    pub profile_image_url: Option<String>,
}

/// One emoji with its reaction count, as returned with a feed or post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmojiSummary {
    pub emoji: String,
    pub emoji_count: i64,
    /// Whether the caller reacted with this emoji
    pub is_clicked: bool,
}

/// Grouped emoji count for one parent row
#[derive(Debug, Clone, FromRow)]
pub struct EmojiCountRow {
    pub parent_id: Uuid,
    pub emoji: String,
    pub emoji_count: i64,
    pub is_clicked: bool,
}

impl From<EmojiCountRow> for EmojiSummary {
    fn from(row: EmojiCountRow) -> Self {
        Self {
            emoji: row.emoji,
            emoji_count: row.emoji_count,
            is_clicked: row.is_clicked,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EmojiRequest {
    #[validate(length(min = 1, max = 32, message = "emoji must be 1-32 characters"))]
    pub emoji: String,
}
