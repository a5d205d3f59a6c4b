use super::Writer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Row from `post_comments` or `feed_comments`; `parent_id` is the post or feed
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub member_id: Uuid,
    pub content: String,
    pub heart_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentWithWriter {
    pub id: Uuid,
    pub member_id: Uuid,
    pub content: String,
    pub heart_count: i32,
    pub created_at: DateTime<Utc>,
    pub is_hearted: bool,
    pub writer_nickname: String,
    pub writer_generation: Option<i32>,
    pub writer_profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub heart_count: i32,
    pub is_hearted: bool,
    pub is_mine: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentItem {
    pub writer: Writer,
    pub comment: CommentResponse,
}

impl CommentItem {
    pub fn from_row(row: CommentWithWriter, viewer: Option<Uuid>) -> Self {
        Self {
            writer: Writer {
                id: row.member_id,
                nickname: row.writer_nickname,
                generation: row.writer_generation,
                profile_image_url: row.writer_profile_image_url,
            },
            comment: CommentResponse {
                id: row.id,
                content: row.content,
                heart_count: row.heart_count,
                is_hearted: row.is_hearted,
                is_mine: viewer == Some(row.member_id),
                created_at: row.created_at,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 1000, message = "content must be 1-1000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentIdResponse {
    pub comment_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_mine_follows_viewer() {
        let author = Uuid::new_v4();
        let row = CommentWithWriter {
            id: Uuid::new_v4(),
            member_id: author,
            content: "nice".into(),
            heart_count: 2,
            created_at: Utc::now(),
            is_hearted: true,
            writer_nickname: "octocat".into(),
            writer_generation: None,
            writer_profile_image_url: None,
        };

        assert!(CommentItem::from_row(row.clone(), Some(author)).comment.is_mine);
        assert!(!CommentItem::from_row(row.clone(), Some(Uuid::new_v4())).comment.is_mine);
        assert!(!CommentItem::from_row(row, None).comment.is_mine);
    }

    #[test]
    fn test_comment_length() {
        assert!(CommentRequest { content: "a".into() }.validate().is_ok());
        assert!(CommentRequest { content: "a".repeat(1001) }.validate().is_err());
    }
}
