use crate::models::{HashTagSearchItem, PostHashTagRow};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Return the id of `tag_name`, creating the tag on first use.
///
/// An existing tag keeps its original color.
pub async fn find_or_create(
    conn: &mut PgConnection,
    tag_name: &str,
    color: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO hash_tags (tag_name, color)
        VALUES ($1, $2)
        ON CONFLICT (tag_name) DO UPDATE SET tag_name = EXCLUDED.tag_name
        RETURNING id
        "#,
    )
    .bind(tag_name)
    .bind(color)
    .fetch_one(&mut *conn)
    .await
}

/// Replace a post's tag links; `sort_order` follows `tag_ids` starting at 1
pub async fn replace_post_links(
    conn: &mut PgConnection,
    post_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM post_hash_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO post_hash_tags (post_id, hash_tag_id, sort_order)
        SELECT $1, tag_id, ord::INTEGER
        FROM UNNEST($2::UUID[]) WITH ORDINALITY AS t(tag_id, ord)
        ON CONFLICT (post_id, hash_tag_id) DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(tag_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Tags for a batch of posts, ordered by post then link order
pub async fn tags_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<PostHashTagRow>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, PostHashTagRow>(
        r#"
        SELECT pht.post_id, h.tag_name, h.color
        FROM post_hash_tags pht
        JOIN hash_tags h ON h.id = pht.hash_tag_id
        WHERE pht.post_id = ANY($1)
        ORDER BY pht.post_id, pht.sort_order
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await
}

/// Escape LIKE wildcards so user input matches literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Case-insensitive prefix search, most used tags first
pub async fn search_by_prefix(
    pool: &PgPool,
    prefix: &str,
    take: i64,
) -> Result<Vec<HashTagSearchItem>, sqlx::Error> {
    sqlx::query_as::<_, HashTagSearchItem>(
        r#"
        SELECT h.id, h.tag_name, h.color, COUNT(p.id) AS post_count
        FROM hash_tags h
        LEFT JOIN post_hash_tags pht ON pht.hash_tag_id = h.id
        LEFT JOIN posts p ON p.id = pht.post_id AND p.deleted_at IS NULL
        WHERE h.tag_name ILIKE $1
        GROUP BY h.id, h.tag_name, h.color
        ORDER BY post_count DESC, h.tag_name ASC
        LIMIT $2
        "#,
    )
    .bind(format!("{}%", escape_like(prefix)))
    .bind(take)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("rust"), "rust");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
