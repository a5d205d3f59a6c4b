use super::{ContentSortBy, EmojiSummary, Writer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostCategory {
    Notice,
    Event,
    SpecialLecture,
    InformationSharing,
    TodaysQuestion,
}

impl PostCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PostCategory::Notice => "NOTICE",
            PostCategory::Event => "EVENT",
            PostCategory::SpecialLecture => "SPECIAL_LECTURE",
            PostCategory::InformationSharing => "INFORMATION_SHARING",
            PostCategory::TodaysQuestion => "TODAYS_QUESTION",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOTICE" => Ok(PostCategory::Notice),
            "EVENT" => Ok(PostCategory::Event),
            "SPECIAL_LECTURE" => Ok(PostCategory::SpecialLecture),
            "INFORMATION_SHARING" => Ok(PostCategory::InformationSharing),
            "TODAYS_QUESTION" => Ok(PostCategory::TodaysQuestion),
            other => Err(format!("unknown post category: {other}")),
        }
    }
}

/// `posts` table row
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub member_id: Uuid,
    pub category: String,
    pub title: String,
    pub content: String,
    pub view_count: i32,
    pub comment_count: i32,
    pub emoji_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Post joined with its author and the caller's scrap flag
#[derive(Debug, Clone, FromRow)]
pub struct PostWithWriter {
    pub id: Uuid,
    pub member_id: Uuid,
    pub category: String,
    pub title: String,
    pub content: String,
    pub view_count: i32,
    pub comment_count: i32,
    pub emoji_count: i32,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_scraped: bool,
    pub writer_nickname: String,
    pub writer_generation: Option<i32>,
    pub writer_profile_image_url: Option<String>,
    pub writer_deleted_at: Option<DateTime<Utc>>,
}

impl PostWithWriter {
    pub fn writer(&self) -> Writer {
        Writer {
            id: self.member_id,
            nickname: self.writer_nickname.clone(),
            generation: self.writer_generation,
            profile_image_url: self.writer_profile_image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct HashTagRequest {
    #[validate(length(min = 1, max = 30, message = "tag_name must be 1-30 characters"))]
    pub tag_name: String,
    #[validate(length(min = 1, max = 20, message = "color must be 1-20 characters"))]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HashTagResponse {
    pub tag_name: String,
    pub color: String,
}

/// A hash tag linked to a post, in link order
#[derive(Debug, Clone, FromRow)]
pub struct PostHashTagRow {
    pub post_id: Uuid,
    pub tag_name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HashTagSearchItem {
    pub id: Uuid,
    pub tag_name: String,
    pub color: String,
    pub post_count: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HashTagSearchQuery {
    #[validate(length(min = 1, max = 30, message = "tag_name must be 1-30 characters"))]
    pub tag_name: String,
    #[serde(default = "default_search_take")]
    #[validate(range(min = 1, max = 50, message = "take must be between 1 and 50"))]
    pub take: i64,
}

fn default_search_take() -> i64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub content: String,
    pub view_count: i32,
    pub comment_count: i32,
    pub emoji_count: i32,
    pub created_at: DateTime<Utc>,
    pub is_scraped: bool,
    pub is_mine: bool,
    pub hash_tags: Vec<HashTagResponse>,
    pub emojis: Vec<EmojiSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostItem {
    pub writer: Writer,
    pub post: PostResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostListQuery {
    #[serde(default)]
    pub sort_by: ContentSortBy,
    pub category: Option<PostCategory>,
}

/// Body of `POST /posts` and `PATCH /posts/{id}`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PostRequest {
    pub category: PostCategory,
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "content must be 1-10000 characters"))]
    pub content: String,
    #[serde(default)]
    #[validate(length(max = 10, message = "at most 10 hash tags"), nested)]
    pub hash_tags: Vec<HashTagRequest>,
}

impl PostRequest {
    /// Hash tags in request order with repeated names dropped
    pub fn unique_hash_tags(&self) -> Vec<&HashTagRequest> {
        let mut seen = std::collections::HashSet::new();
        self.hash_tags
            .iter()
            .filter(|tag| seen.insert(tag.tag_name.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostIdResponse {
    pub post_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TodayQuestionResponse {
    pub post_id: Option<Uuid>,
    pub title: String,
}
