/// Ownership checks for mutating feeds, posts and comments
use crate::error::{AppError, Result};
use crate::models::{Comment, Feed, Post};
use uuid::Uuid;

pub fn check_feed_ownership(member_id: Uuid, feed: &Feed) -> Result<()> {
    if feed.member_id != member_id {
        return Err(AppError::Forbidden(
            "You can only modify your own feeds".to_string(),
        ));
    }
    Ok(())
}

pub fn check_post_ownership(member_id: Uuid, post: &Post) -> Result<()> {
    if post.member_id != member_id {
        return Err(AppError::Forbidden(
            "You can only modify your own posts".to_string(),
        ));
    }
    Ok(())
}

pub fn check_comment_ownership(member_id: Uuid, comment: &Comment) -> Result<()> {
    if comment.member_id != member_id {
        return Err(AppError::Forbidden(
            "You can only modify your own comments".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(member_id: Uuid) -> Comment {
        let now = Utc::now();
        Comment {
            id: Uuid::new_v4(),
            parent_id: Uuid::new_v4(),
            member_id,
            content: "hi".into(),
            heart_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_comment_ownership() {
        let owner = Uuid::new_v4();
        assert!(check_comment_ownership(owner, &comment(owner)).is_ok());
        assert!(matches!(
            check_comment_ownership(Uuid::new_v4(), &comment(owner)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_feed_ownership() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let feed = Feed {
            id: Uuid::new_v4(),
            member_id: owner,
            content: "hello".into(),
            view_count: 0,
            comment_count: 0,
            emoji_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        assert!(check_feed_ownership(owner, &feed).is_ok());
        assert!(check_feed_ownership(Uuid::new_v4(), &feed).is_err());
    }
}
