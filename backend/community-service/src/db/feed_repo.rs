use super::{push_author_filter, AuthorFilter};
use crate::models::{Feed, FeedImageRow, FeedWithWriter};
use crate::pagination::PaginationRequest;
use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const FEED_WITH_WRITER_COLUMNS: &str = "SELECT f.id, f.member_id, f.content, f.view_count, \
     f.comment_count, f.emoji_count, f.created_at, f.deleted_at, \
     m.nickname AS writer_nickname, m.generation AS writer_generation, \
     m.profile_image_url AS writer_profile_image_url, m.deleted_at AS writer_deleted_at";

fn push_list_from_where(qb: &mut QueryBuilder<'_, Postgres>, filter: &AuthorFilter) {
    qb.push(
        " FROM feeds f JOIN members m ON m.id = f.member_id \
         WHERE f.deleted_at IS NULL AND m.deleted_at IS NULL",
    );
    push_author_filter(qb, "f.member_id", filter);
}

/// Paged list of visible feeds, newest or oldest first
pub fn build_list_query(
    filter: &AuthorFilter,
    page: &PaginationRequest,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(FEED_WITH_WRITER_COLUMNS);
    push_list_from_where(&mut qb, filter);

    let order = page.order.as_sql();
    qb.push(format!(" ORDER BY f.created_at {order}, f.id {order}"));
    qb.push(" LIMIT ").push_bind(page.take);
    qb.push(" OFFSET ").push_bind(page.skip());
    qb
}

pub fn build_count_query(filter: &AuthorFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*)");
    push_list_from_where(&mut qb, filter);
    qb
}

pub async fn list_feeds(
    pool: &PgPool,
    filter: &AuthorFilter,
    page: &PaginationRequest,
) -> Result<Vec<FeedWithWriter>, sqlx::Error> {
    let mut qb = build_list_query(filter, page);
    qb.build_query_as::<FeedWithWriter>().fetch_all(pool).await
}

pub async fn count_feeds(pool: &PgPool, filter: &AuthorFilter) -> Result<i64, sqlx::Error> {
    let mut qb = build_count_query(filter);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Feed with author regardless of soft-delete state
pub async fn find_with_writer(
    pool: &PgPool,
    feed_id: Uuid,
) -> Result<Option<FeedWithWriter>, sqlx::Error> {
    let sql = format!(
        "{FEED_WITH_WRITER_COLUMNS} FROM feeds f JOIN members m ON m.id = f.member_id WHERE f.id = $1"
    );

    sqlx::query_as::<_, FeedWithWriter>(&sql)
        .bind(feed_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    feed_id: Uuid,
) -> Result<Option<Feed>, sqlx::Error> {
    sqlx::query_as::<_, Feed>(
        r#"
        SELECT id, member_id, content, view_count, comment_count, emoji_count,
               created_at, updated_at, deleted_at
        FROM feeds
        WHERE id = $1
        "#,
    )
    .bind(feed_id)
    .fetch_optional(executor)
    .await
}

pub async fn insert_feed<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: Uuid,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO feeds (member_id, content) VALUES ($1, $2) RETURNING id",
    )
    .bind(member_id)
    .bind(content)
    .fetch_one(executor)
    .await
}

pub async fn update_content<'e, E: PgExecutor<'e>>(
    executor: E,
    feed_id: Uuid,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE feeds SET content = $2, updated_at = NOW() WHERE id = $1")
        .bind(feed_id)
        .bind(content)
        .execute(executor)
        .await?;

    Ok(())
}

/// Replace a feed's images, keeping the given order
pub async fn replace_images(
    conn: &mut PgConnection,
    feed_id: Uuid,
    image_urls: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM feed_images WHERE feed_id = $1")
        .bind(feed_id)
        .execute(&mut *conn)
        .await?;

    if image_urls.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO feed_images (feed_id, image_url, sort_order)
        SELECT $1, url, ord::INTEGER
        FROM UNNEST($2::TEXT[]) WITH ORDINALITY AS t(url, ord)
        "#,
    )
    .bind(feed_id)
    .bind(image_urls)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn soft_delete(pool: &PgPool, feed_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE feeds SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
        .bind(feed_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Images for a batch of feeds, ordered by feed then position
pub async fn images_for(
    pool: &PgPool,
    feed_ids: &[Uuid],
) -> Result<Vec<FeedImageRow>, sqlx::Error> {
    if feed_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, FeedImageRow>(
        r#"
        SELECT feed_id, image_url
        FROM feed_images
        WHERE feed_id = ANY($1)
        ORDER BY feed_id, sort_order
        "#,
    )
    .bind(feed_ids)
    .fetch_all(pool)
    .await
}
