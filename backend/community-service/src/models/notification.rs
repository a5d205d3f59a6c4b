use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    CreatePostComment,
    CreatePostEmoji,
    CreateFeedComment,
    CreateFeedEmoji,
    Follow,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::CreatePostComment => "CREATE_POST_COMMENT",
            NotificationType::CreatePostEmoji => "CREATE_POST_EMOJI",
            NotificationType::CreateFeedComment => "CREATE_FEED_COMMENT",
            NotificationType::CreateFeedEmoji => "CREATE_FEED_EMOJI",
            NotificationType::Follow => "FOLLOW",
        }
    }

    /// Notification text shown to the receiver
    pub fn message(self, sender_nickname: &str) -> String {
        match self {
            NotificationType::CreatePostComment => {
                format!("{sender_nickname} left a comment on your post.")
            }
            NotificationType::CreatePostEmoji => {
                format!("{sender_nickname} reacted to your post.")
            }
            NotificationType::CreateFeedComment => {
                format!("{sender_nickname} left a comment on your feed.")
            }
            NotificationType::CreateFeedEmoji => {
                format!("{sender_nickname} reacted to your feed.")
            }
            NotificationType::Follow => format!("{sender_nickname} started following you."),
        }
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE_POST_COMMENT" => Ok(NotificationType::CreatePostComment),
            "CREATE_POST_EMOJI" => Ok(NotificationType::CreatePostEmoji),
            "CREATE_FEED_COMMENT" => Ok(NotificationType::CreateFeedComment),
            "CREATE_FEED_EMOJI" => Ok(NotificationType::CreateFeedEmoji),
            "FOLLOW" => Ok(NotificationType::Follow),
            other => Err(format!("unknown notification type: {other}")),
        }
    }
}

/// `notifications` table row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub received_member_id: Uuid,
    pub send_member_id: Uuid,
    pub notification_type: String,
    pub post_id: Option<Uuid>,
    pub feed_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub receiver_id: Uuid,
    pub sender_id: Uuid,
    pub notification_type: NotificationType,
    pub post_id: Option<Uuid>,
    pub feed_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
}

impl NewNotification {
    pub fn post_comment(receiver_id: Uuid, sender_id: Uuid, post_id: Uuid, comment_id: Uuid) -> Self {
        Self {
            receiver_id,
            sender_id,
            notification_type: NotificationType::CreatePostComment,
            post_id: Some(post_id),
            feed_id: None,
            comment_id: Some(comment_id),
        }
    }

    pub fn feed_comment(receiver_id: Uuid, sender_id: Uuid, feed_id: Uuid, comment_id: Uuid) -> Self {
        Self {
            receiver_id,
            sender_id,
            notification_type: NotificationType::CreateFeedComment,
            post_id: None,
            feed_id: Some(feed_id),
            comment_id: Some(comment_id),
        }
    }

    pub fn post_emoji(receiver_id: Uuid, sender_id: Uuid, post_id: Uuid) -> Self {
        Self {
            receiver_id,
            sender_id,
            notification_type: NotificationType::CreatePostEmoji,
            post_id: Some(post_id),
            feed_id: None,
            comment_id: None,
        }
    }

    pub fn feed_emoji(receiver_id: Uuid, sender_id: Uuid, feed_id: Uuid) -> Self {
        Self {
            receiver_id,
            sender_id,
            notification_type: NotificationType::CreateFeedEmoji,
            post_id: None,
            feed_id: Some(feed_id),
            comment_id: None,
        }
    }

    pub fn follow(receiver_id: Uuid, sender_id: Uuid) -> Self {
        Self {
            receiver_id,
            sender_id,
            notification_type: NotificationType::Follow,
            post_id: None,
            feed_id: None,
            comment_id: None,
        }
    }

    pub fn is_self_notification(&self) -> bool {
        self.receiver_id == self.sender_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadAllResponse {
    pub updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_roundtrip() {
        for kind in [
            NotificationType::CreatePostComment,
            NotificationType::CreatePostEmoji,
            NotificationType::CreateFeedComment,
            NotificationType::CreateFeedEmoji,
            NotificationType::Follow,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_message_uses_sender_nickname() {
        assert_eq!(
            NotificationType::CreatePostComment.message("octocat"),
            "octocat left a comment on your post."
        );
        assert_eq!(
            NotificationType::Follow.message("ferris"),
            "ferris started following you."
        );
    }

    #[test]
    fn test_self_notification_detection() {
        let id = Uuid::new_v4();
        assert!(NewNotification::follow(id, id).is_self_notification());
        assert!(!NewNotification::follow(id, Uuid::new_v4()).is_self_notification());
    }

    #[test]
    fn test_constructors_set_related_ids() {
        let (receiver, sender, feed, comment) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let n = NewNotification::feed_comment(receiver, sender, feed, comment);
        assert_eq!(n.notification_type, NotificationType::CreateFeedComment);
        assert_eq!(n.feed_id, Some(feed));
        assert_eq!(n.comment_id, Some(comment));
        assert!(n.post_id.is_none());
    }
}
