use super::ContentKind;
use crate::models::{Comment, CommentWithWriter};
use crate::pagination::PaginationRequest;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Find a comment by ID, including soft-deleted comments
pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let sql = format!(
        "SELECT id, {} AS parent_id, member_id, content, heart_count, created_at, updated_at, deleted_at \
         FROM {} WHERE id = $1",
        kind.parent_column(),
        kind.comment_table()
    );

    sqlx::query_as::<_, Comment>(&sql)
        .bind(comment_id)
        .fetch_optional(executor)
        .await
}

pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    parent_id: Uuid,
    member_id: Uuid,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} ({}, member_id, content) VALUES ($1, $2, $3) RETURNING id",
        kind.comment_table(),
        kind.parent_column()
    );

    sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(parent_id)
        .bind(member_id)
        .bind(content)
        .fetch_one(executor)
        .await
}

pub async fn update_content(
    pool: &PgPool,
    kind: ContentKind,
    comment_id: Uuid,
    content: &str,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET content = $2, updated_at = NOW() WHERE id = $1",
        kind.comment_table()
    );

    sqlx::query(&sql)
        .bind(comment_id)
        .bind(content)
        .execute(pool)
        .await?;

    Ok(())
}

/// Returns whether the comment was live before this call
pub async fn soft_delete<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    comment_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        kind.comment_table()
    );

    let result = sqlx::query(&sql).bind(comment_id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

fn list_sql(kind: ContentKind, page: &PaginationRequest) -> String {
    let order = page.order.as_sql();
    format!(
        "SELECT c.id, c.member_id, c.content, c.heart_count, c.created_at, \
         EXISTS (SELECT 1 FROM {hearts} h WHERE h.comment_id = c.id AND h.member_id = $2) AS is_hearted, \
         m.nickname AS writer_nickname, m.generation AS writer_generation, \
         m.profile_image_url AS writer_profile_image_url \
         FROM {comments} c JOIN members m ON m.id = c.member_id \
         WHERE c.{parent} = $1 AND c.deleted_at IS NULL AND m.deleted_at IS NULL \
         ORDER BY c.created_at {order}, c.id {order} \
         LIMIT $3 OFFSET $4",
        hearts = kind.comment_heart_table(),
        comments = kind.comment_table(),
        parent = kind.parent_column(),
    )
}

pub async fn list_for_parent(
    pool: &PgPool,
    kind: ContentKind,
    parent_id: Uuid,
    viewer: Option<Uuid>,
    page: &PaginationRequest,
) -> Result<Vec<CommentWithWriter>, sqlx::Error> {
    sqlx::query_as::<_, CommentWithWriter>(&list_sql(kind, page))
        .bind(parent_id)
        .bind(viewer)
        .bind(page.take)
        .bind(page.skip())
        .fetch_all(pool)
        .await
}

pub async fn count_for_parent(
    pool: &PgPool,
    kind: ContentKind,
    parent_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} c JOIN members m ON m.id = c.member_id \
         WHERE c.{} = $1 AND c.deleted_at IS NULL AND m.deleted_at IS NULL",
        kind.comment_table(),
        kind.parent_column()
    );

    sqlx::query_scalar::<_, i64>(&sql)
        .bind(parent_id)
        .fetch_one(pool)
        .await
}

/// Fails with a unique violation when the member already hearted the comment
pub async fn insert_heart<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    comment_id: Uuid,
    member_id: Uuid,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} (comment_id, member_id) VALUES ($1, $2)",
        kind.comment_heart_table()
    );

    sqlx::query(&sql)
        .bind(comment_id)
        .bind(member_id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn delete_heart<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    comment_id: Uuid,
    member_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "DELETE FROM {} WHERE comment_id = $1 AND member_id = $2",
        kind.comment_heart_table()
    );

    let result = sqlx::query(&sql)
        .bind(comment_id)
        .bind(member_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn increment_hearts<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    comment_id: Uuid,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET heart_count = heart_count + 1 WHERE id = $1",
        kind.comment_table()
    );

    sqlx::query(&sql).bind(comment_id).execute(executor).await?;
    Ok(())
}

pub async fn decrement_hearts<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    comment_id: Uuid,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET heart_count = GREATEST(heart_count - 1, 0) WHERE id = $1",
        kind.comment_table()
    );

    sqlx::query(&sql).bind(comment_id).execute(executor).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SortOrder;

    #[test]
    fn test_list_sql_for_feed_comments() {
        let page = PaginationRequest {
            page: 1,
            take: 10,
            order: SortOrder::Asc,
        };
        let sql = list_sql(ContentKind::Feed, &page);

        assert!(sql.contains("FROM feed_comment_hearts h WHERE h.comment_id = c.id"));
        assert!(sql.contains("FROM feed_comments c JOIN members m"));
        assert!(sql.contains("WHERE c.feed_id = $1 AND c.deleted_at IS NULL"));
        assert!(sql.contains("ORDER BY c.created_at ASC, c.id ASC"));
    }
}
