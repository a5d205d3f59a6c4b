use super::ensure_live;
use crate::db::{comment_repo, feed_repo, post_repo};
use crate::error::Result;
use crate::models::{Comment, ContentKind, Feed, Post};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn get_feed_is_not_deleted(pool: &PgPool, feed_id: Uuid) -> Result<Feed> {
    let feed = feed_repo::find_by_id(pool, feed_id).await?;
    ensure_live(feed, "Feed")
}

pub async fn get_post_is_not_deleted(pool: &PgPool, post_id: Uuid) -> Result<Post> {
    let post = post_repo::find_by_id(pool, post_id).await?;
    ensure_live(post, "Post")
}

/// Author of a live feed or post
pub async fn get_parent_author(pool: &PgPool, kind: ContentKind, parent_id: Uuid) -> Result<Uuid> {
    match kind {
        ContentKind::Feed => Ok(get_feed_is_not_deleted(pool, parent_id).await?.member_id),
        ContentKind::Post => Ok(get_post_is_not_deleted(pool, parent_id).await?.member_id),
    }
}

/// Load a live comment that belongs to `parent_id`
pub async fn get_comment_of_parent(
    pool: &PgPool,
    kind: ContentKind,
    parent_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment> {
    let comment = comment_repo::find_by_id(pool, kind, comment_id).await?;
    let comment = comment.filter(|c| c.parent_id == parent_id);
    ensure_live(comment, "Comment")
}

