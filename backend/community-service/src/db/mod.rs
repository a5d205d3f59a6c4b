/// Database access layer
///
/// Repository functions are free functions over a `PgExecutor` so the same
/// query runs against the pool or inside a transaction (`&mut *tx`).
/// Queries that touch feed/post child tables take a [`ContentKind`] and
/// interpolate only the static table names it returns.
pub mod comment_repo;
pub mod counter;
pub mod emoji_repo;
pub mod feed_repo;
pub mod follow_repo;
pub mod hashtag_repo;
pub mod member_repo;
pub mod notification_repo;
pub mod post_repo;
pub mod profile_repo;
pub mod scrap_repo;
pub mod view_repo;

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

pub use crate::models::ContentKind;

/// Restricts a list to certain authors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    /// Only this author
    pub author_id: Option<Uuid>,
    /// Only authors followed by this member
    pub followed_by: Option<Uuid>,
    /// Only authors of this generation
    pub generation: Option<i32>,
}

/// Appends `AND ...` clauses for `filter`.
///
/// `author_column` is the qualified author column of the listed table and
/// `m` must be the joined `members` alias.
pub fn push_author_filter(
    qb: &mut QueryBuilder<'_, Postgres>,
    author_column: &'static str,
    filter: &AuthorFilter,
) {
    if let Some(author_id) = filter.author_id {
        qb.push(" AND ")
            .push(author_column)
            .push(" = ")
            .push_bind(author_id);
    }

    if let Some(follower_id) = filter.followed_by {
        qb.push(" AND ")
            .push(author_column)
            .push(" IN (SELECT followee_id FROM follows WHERE follower_id = ")
            .push_bind(follower_id)
            .push(")");
    }

    if let Some(generation) = filter.generation {
        qb.push(" AND m.generation = ").push_bind(generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_adds_nothing() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM feeds f WHERE TRUE");
        push_author_filter(&mut qb, "f.member_id", &AuthorFilter::default());
        assert_eq!(qb.sql(), "SELECT 1 FROM feeds f WHERE TRUE");
    }

    #[test]
    fn test_all_filters_bind_in_order() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM posts p WHERE TRUE");
        let filter = AuthorFilter {
            author_id: Some(Uuid::new_v4()),
            followed_by: Some(Uuid::new_v4()),
            generation: Some(4),
        };
        push_author_filter(&mut qb, "p.member_id", &filter);

        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM posts p WHERE TRUE AND p.member_id = $1 \
             AND p.member_id IN (SELECT followee_id FROM follows WHERE follower_id = $2) \
             AND m.generation = $3"
        );
    }
}
