use crate::models::FollowMember;
use sqlx::PgPool;
use uuid::Uuid;

/// `follower_id` starts following `followee_id`.
///
/// Fails with a unique violation when the pair already exists.
pub async fn insert(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2)")
        .bind(follower_id)
        .bind(followee_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
        .bind(follower_id)
        .bind(followee_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(pool)
    .await
}

/// Members following `member_id`, most recent first
pub async fn followers_of(pool: &PgPool, member_id: Uuid) -> Result<Vec<FollowMember>, sqlx::Error> {
    sqlx::query_as::<_, FollowMember>(
        r#"
        SELECT m.id AS member_id, m.nickname, m.generation, m.profile_image_url
        FROM follows f
        JOIN members m ON m.id = f.follower_id
        WHERE f.followee_id = $1 AND m.deleted_at IS NULL
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await
}

/// Members `member_id` follows, most recent first
pub async fn followings_of(pool: &PgPool, member_id: Uuid) -> Result<Vec<FollowMember>, sqlx::Error> {
    sqlx::query_as::<_, FollowMember>(
        r#"
        SELECT m.id AS member_id, m.nickname, m.generation, m.profile_image_url
        FROM follows f
        JOIN members m ON m.id = f.followee_id
        WHERE f.follower_id = $1 AND m.deleted_at IS NULL
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await
}
