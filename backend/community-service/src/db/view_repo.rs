use super::ContentKind;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Record that `member_id` viewed the parent.
///
/// Returns `false` when the member had already viewed it.
pub async fn record_view<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    parent_id: Uuid,
    member_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} ({}, member_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        kind.view_table(),
        kind.parent_column()
    );

    let result = sqlx::query(&sql)
        .bind(parent_id)
        .bind(member_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() == 1)
}
