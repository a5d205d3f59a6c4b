use super::ContentKind;
use crate::models::EmojiCountRow;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Fails with a unique violation when the member already used this emoji
pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    parent_id: Uuid,
    member_id: Uuid,
    emoji: &str,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} ({}, member_id, emoji) VALUES ($1, $2, $3)",
        kind.emoji_table(),
        kind.parent_column()
    );

    sqlx::query(&sql)
        .bind(parent_id)
        .bind(member_id)
        .bind(emoji)
        .execute(executor)
        .await?;

    Ok(())
}

/// Returns whether a reaction was removed
pub async fn delete<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    parent_id: Uuid,
    member_id: Uuid,
    emoji: &str,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = $1 AND member_id = $2 AND emoji = $3",
        kind.emoji_table(),
        kind.parent_column()
    );

    let result = sqlx::query(&sql)
        .bind(parent_id)
        .bind(member_id)
        .bind(emoji)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn summary_sql(kind: ContentKind) -> String {
    let parent = kind.parent_column();
    format!(
        "SELECT {parent} AS parent_id, emoji, COUNT(*) AS emoji_count, \
         COALESCE(BOOL_OR(member_id = $2), FALSE) AS is_clicked \
         FROM {} WHERE {parent} = ANY($1) \
         GROUP BY {parent}, emoji \
         ORDER BY {parent}, MIN(created_at)",
        kind.emoji_table()
    )
}

/// Emoji counts per parent, grouped by emoji in first-use order
pub async fn summaries_for(
    pool: &PgPool,
    kind: ContentKind,
    parent_ids: &[Uuid],
    viewer: Option<Uuid>,
) -> Result<Vec<EmojiCountRow>, sqlx::Error> {
    if parent_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, EmojiCountRow>(&summary_sql(kind))
        .bind(parent_ids)
        .bind(viewer)
        .fetch_all(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_sql_targets_kind_tables() {
        let sql = summary_sql(ContentKind::Feed);
        assert!(sql.starts_with("SELECT feed_id AS parent_id, emoji"));
        assert!(sql.contains("FROM feed_emojis WHERE feed_id = ANY($1)"));
        assert!(sql.contains("GROUP BY feed_id, emoji"));
    }
}
