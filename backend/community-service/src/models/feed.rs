use super::{ContentSortBy, EmojiSummary, Writer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// `feeds` table row
#[derive(Debug, Clone, FromRow)]
pub struct Feed {
    pub id: Uuid,
    pub member_id: Uuid,
    pub content: String,
    pub view_count: i32,
    pub comment_count: i32,
    pub emoji_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Feed joined with its author, as read by list and detail queries
#[derive(Debug, Clone, FromRow)]
pub struct FeedWithWriter {
    pub id: Uuid,
    pub member_id: Uuid,
    pub content: String,
    pub view_count: i32,
    pub comment_count: i32,
    pub emoji_count: i32,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub writer_nickname: String,
    pub writer_generation: Option<i32>,
    pub writer_profile_image_url: Option<String>,
    pub writer_deleted_at: Option<DateTime<Utc>>,
}

impl FeedWithWriter {
    pub fn writer(&self) -> Writer {
        Writer {
            id: self.member_id,
            nickname: self.writer_nickname.clone(),
            generation: self.writer_generation,
            profile_image_url: self.writer_profile_image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct FeedImageRow {
    pub feed_id: Uuid,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedResponse {
    pub id: Uuid,
    pub content: String,
    pub view_count: i32,
    pub comment_count: i32,
    pub emoji_count: i32,
    pub created_at: DateTime<Utc>,
    pub image_urls: Vec<String>,
    pub emojis: Vec<EmojiSummary>,
    pub is_mine: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedItem {
    pub writer: Writer,
    pub feed: FeedResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedListQuery {
    #[serde(default)]
    pub sort_by: ContentSortBy,
}

/// Body of `POST /feeds` and `PATCH /feeds/{id}`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FeedRequest {
    #[validate(length(min = 1, max = 2000, message = "content must be 1-2000 characters"))]
    pub content: String,
    #[serde(default)]
    #[validate(length(max = 10, message = "at most 10 images"))]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedIdResponse {
    pub feed_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_request_limits() {
        let ok = FeedRequest {
            content: "hello".into(),
            image_urls: vec!["https://img/1.png".into()],
        };
        assert!(ok.validate().is_ok());

        let empty = FeedRequest {
            content: String::new(),
            image_urls: vec![],
        };
        assert!(empty.validate().is_err());

        let too_many = FeedRequest {
            content: "hello".into(),
            image_urls: vec!["x".into(); 11],
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_image_urls_default_to_empty() {
        let req: FeedRequest = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert!(req.image_urls.is_empty());
    }
}
