use super::ContentKind;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Denormalized counters on `posts` and `feeds`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    View,
    Comment,
    Emoji,
}

impl Counter {
    fn column(self) -> &'static str {
        match self {
            Counter::View => "view_count",
            Counter::Comment => "comment_count",
            Counter::Emoji => "emoji_count",
        }
    }
}

fn increment_sql(kind: ContentKind, counter: Counter) -> String {
    let column = counter.column();
    format!(
        "UPDATE {} SET {column} = {column} + 1 WHERE id = $1",
        kind.table()
    )
}

fn decrement_sql(kind: ContentKind, counter: Counter) -> String {
    let column = counter.column();
    format!(
        "UPDATE {} SET {column} = GREATEST({column} - 1, 0) WHERE id = $1",
        kind.table()
    )
}

pub async fn increment<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    counter: Counter,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(&increment_sql(kind, counter))
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Never drops below zero
pub async fn decrement<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ContentKind,
    counter: Counter,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(&decrement_sql(kind, counter))
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
