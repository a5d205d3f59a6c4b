use crate::models::{NewNotification, Notification};
use crate::pagination::PaginationRequest;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    notification: &NewNotification,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO notifications
            (received_member_id, send_member_id, notification_type, post_id, feed_id, comment_id, content)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(notification.receiver_id)
    .bind(notification.sender_id)
    .bind(notification.notification_type.as_str())
    .bind(notification.post_id)
    .bind(notification.feed_id)
    .bind(notification.comment_id)
    .bind(content)
    .fetch_one(executor)
    .await
}

pub async fn list_for_member(
    pool: &PgPool,
    member_id: Uuid,
    page: &PaginationRequest,
) -> Result<Vec<Notification>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT id, received_member_id, send_member_id, notification_type, post_id, feed_id,
               comment_id, content, is_read, created_at
        FROM notifications
        WHERE received_member_id = $1
        ORDER BY created_at {order}, id {order}
        LIMIT $2 OFFSET $3
        "#,
        order = page.order.as_sql()
    );

    sqlx::query_as::<_, Notification>(&sql)
        .bind(member_id)
        .bind(page.take)
        .bind(page.skip())
        .fetch_all(pool)
        .await
}

pub async fn count_for_member(pool: &PgPool, member_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE received_member_id = $1")
        .bind(member_id)
        .fetch_one(pool)
        .await
}

pub async fn unread_count(pool: &PgPool, member_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE received_member_id = $1 AND is_read = FALSE",
    )
    .bind(member_id)
    .fetch_one(pool)
    .await
}

/// Returns whether a notification owned by `member_id` was found
pub async fn mark_read(pool: &PgPool, notification_id: Uuid, member_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND received_member_id = $2",
    )
    .bind(notification_id)
    .bind(member_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn mark_all_read(pool: &PgPool, member_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE received_member_id = $1 AND is_read = FALSE",
    )
    .bind(member_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, notification_id: Uuid, member_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND received_member_id = $2")
        .bind(notification_id)
        .bind(member_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
