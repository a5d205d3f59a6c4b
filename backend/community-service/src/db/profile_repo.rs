use crate::models::ProfileRow;
use sqlx::PgPool;
use uuid::Uuid;

/// Member profile with follow counts; deleted counterparts are not counted
pub async fn find_profile(pool: &PgPool, member_id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT m.id AS member_id, m.nickname, m.generation, m.profile_image_url, m.introduce,
               m.authorization_status, m.deleted_at,
               (SELECT COUNT(*)
                FROM follows f
                JOIN members fm ON fm.id = f.follower_id
                WHERE f.followee_id = m.id AND fm.deleted_at IS NULL) AS follower_count,
               (SELECT COUNT(*)
                FROM follows f
                JOIN members fm ON fm.id = f.followee_id
                WHERE f.follower_id = m.id AND fm.deleted_at IS NULL) AS following_count
        FROM members m
        WHERE m.id = $1
        "#,
    )
    .bind(member_id)
    .fetch_optional(pool)
    .await
}
