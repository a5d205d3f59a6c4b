use super::{push_author_filter, AuthorFilter};
use crate::models::{Post, PostCategory, PostWithWriter, TodayQuestionResponse};
use crate::pagination::PaginationRequest;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Filters for post lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author: AuthorFilter,
    pub category: Option<PostCategory>,
    /// Only posts this member scrapped, ordered by scrap time
    pub scrapped_by: Option<Uuid>,
}

/// Select list for posts joined with their writer.
///
/// The first bind (`$1`) is always the viewer used for `is_scraped`.
fn push_select(qb: &mut QueryBuilder<'_, Postgres>, viewer: Option<Uuid>) {
    qb.push(
        "SELECT p.id, p.member_id, p.category, p.title, p.content, p.view_count, \
         p.comment_count, p.emoji_count, p.created_at, p.deleted_at, \
         EXISTS (SELECT 1 FROM post_scraps ps WHERE ps.post_id = p.id AND ps.member_id = ",
    );
    qb.push_bind(viewer);
    qb.push(
        ") AS is_scraped, \
         m.nickname AS writer_nickname, m.generation AS writer_generation, \
         m.profile_image_url AS writer_profile_image_url, m.deleted_at AS writer_deleted_at",
    );
}

fn push_list_from_where(qb: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    qb.push(" FROM posts p JOIN members m ON m.id = p.member_id");

    if let Some(member_id) = filter.scrapped_by {
        qb.push(" JOIN post_scraps sc ON sc.post_id = p.id AND sc.member_id = ")
            .push_bind(member_id);
    }

    qb.push(" WHERE p.deleted_at IS NULL AND m.deleted_at IS NULL");

    if let Some(category) = filter.category {
        qb.push(" AND p.category = ").push_bind(category.as_str());
    }

    push_author_filter(qb, "p.member_id", &filter.author);
}

pub fn build_list_query(
    filter: &PostFilter,
    viewer: Option<Uuid>,
    page: &PaginationRequest,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("");
    push_select(&mut qb, viewer);
    push_list_from_where(&mut qb, filter);

    let order = page.order.as_sql();
    let sort_column = if filter.scrapped_by.is_some() {
        "sc.created_at"
    } else {
        "p.created_at"
    };
    qb.push(format!(" ORDER BY {sort_column} {order}, p.id {order}"));
    qb.push(" LIMIT ").push_bind(page.take);
    qb.push(" OFFSET ").push_bind(page.skip());
    qb
}

pub fn build_count_query(filter: &PostFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*)");
    push_list_from_where(&mut qb, filter);
    qb
}

pub async fn list_posts(
    pool: &PgPool,
    filter: &PostFilter,
    viewer: Option<Uuid>,
    page: &PaginationRequest,
) -> Result<Vec<PostWithWriter>, sqlx::Error> {
    let mut qb = build_list_query(filter, viewer, page);
    qb.build_query_as::<PostWithWriter>().fetch_all(pool).await
}

pub async fn count_posts(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    let mut qb = build_count_query(filter);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Post with author regardless of soft-delete state
pub async fn find_with_writer(
    pool: &PgPool,
    post_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<PostWithWriter>, sqlx::Error> {
    let mut qb = QueryBuilder::new("");
    push_select(&mut qb, viewer);
    qb.push(" FROM posts p JOIN members m ON m.id = p.member_id WHERE p.id = ")
        .push_bind(post_id);

    qb.build_query_as::<PostWithWriter>()
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: Uuid,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, member_id, category, title, content, view_count, comment_count, emoji_count,
               created_at, updated_at, deleted_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(executor)
    .await
}

pub async fn insert_post<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: Uuid,
    category: PostCategory,
    title: &str,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO posts (member_id, category, title, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(member_id)
    .bind(category.as_str())
    .bind(title)
    .bind(content)
    .fetch_one(executor)
    .await
}

pub async fn update_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: Uuid,
    category: PostCategory,
    title: &str,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET category = $2, title = $3, content = $4, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .bind(category.as_str())
    .bind(title)
    .bind(content)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn soft_delete(pool: &PgPool, post_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Random visible `TODAYS_QUESTION` post
pub async fn random_today_question(
    pool: &PgPool,
) -> Result<Option<TodayQuestionResponse>, sqlx::Error> {
    sqlx::query_as::<_, TodayQuestionResponse>(
        r#"
        SELECT p.id AS post_id, p.title
        FROM posts p
        JOIN members m ON m.id = p.member_id
        WHERE p.category = $1 AND p.deleted_at IS NULL AND m.deleted_at IS NULL
        ORDER BY RANDOM()
        LIMIT 1
        "#,
    )
    .bind(PostCategory::TodaysQuestion.as_str())
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SortOrder;

    fn first_page() -> PaginationRequest {
        PaginationRequest {
            page: 1,
            take: 10,
            order: SortOrder::Desc,
        }
    }

    #[test]
    fn test_viewer_is_first_bind() {
        let qb = build_list_query(&PostFilter::default(), None, &first_page());
        let sql = qb.sql();

        assert!(sql.contains("ps.member_id = $1) AS is_scraped"));
        assert!(sql.contains(" FROM posts p JOIN members m ON m.id = p.member_id WHERE "));
        assert!(sql.ends_with("ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn test_category_and_generation_filters() {
        let filter = PostFilter {
            author: AuthorFilter {
                generation: Some(3),
                ..AuthorFilter::default()
            },
            category: Some(PostCategory::Notice),
            scrapped_by: None,
        };
        let qb = build_list_query(&filter, Some(Uuid::new_v4()), &first_page());
        let sql = qb.sql();

        assert!(sql.contains(
            "WHERE p.deleted_at IS NULL AND m.deleted_at IS NULL AND p.category = $2 AND m.generation = $3"
        ));
        assert!(sql.ends_with("LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn test_scrap_list_joins_and_orders_by_scrap_time() {
        let filter = PostFilter {
            scrapped_by: Some(Uuid::new_v4()),
            ..PostFilter::default()
        };
        let qb = build_list_query(&filter, None, &first_page());
        let sql = qb.sql();

        assert!(sql.contains("JOIN post_scraps sc ON sc.post_id = p.id AND sc.member_id = $2"));
        assert!(sql.contains("ORDER BY sc.created_at DESC"));
    }

    #[test]
    fn test_count_query_has_no_viewer_bind() {
        let filter = PostFilter {
            category: Some(PostCategory::Event),
            ..PostFilter::default()
        };
        let qb = build_count_query(&filter);

        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM posts p JOIN members m ON m.id = p.member_id \
             WHERE p.deleted_at IS NULL AND m.deleted_at IS NULL AND p.category = $1"
        );
    }
}
