use sqlx::PgPool;
use uuid::Uuid;

/// Fails with a unique violation when the post is already scrapped
pub async fn insert(pool: &PgPool, post_id: Uuid, member_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO post_scraps (post_id, member_id) VALUES ($1, $2)")
        .bind(post_id)
        .bind(member_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete(pool: &PgPool, post_id: Uuid, member_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM post_scraps WHERE post_id = $1 AND member_id = $2")
        .bind(post_id)
        .bind(member_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
