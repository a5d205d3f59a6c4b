/// Business logic layer for community-service
///
/// Services are cheap structs over a cloned `PgPool`, built per request by
/// handlers. Writes that touch a counter run inside one transaction;
/// notifications are sent only after the commit.
pub mod admin;
pub mod auth;
pub mod comments;
pub mod feeds;
pub mod follows;
pub mod notifications;
pub mod oauth;
pub mod posts;
pub mod profile;

pub use admin::AdminService;
pub use auth::AuthService;
pub use comments::CommentService;
pub use feeds::FeedService;
pub use follows::FollowService;
pub use notifications::NotificationService;
pub use oauth::{GithubOAuthService, InMemoryStateStore, OAuthStateStore, RedisStateStore};
pub use posts::PostService;
pub use profile::ProfileService;

use crate::db::AuthorFilter;
use crate::domain::member::get_member_is_not_deleted;
use crate::error::{AppError, Result};
use crate::models::ContentSortBy;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Resolve `sort_by` into an author filter, loading the caller's generation when needed
pub(crate) async fn resolve_author_filter(
    pool: &PgPool,
    viewer: Option<Uuid>,
    sort_by: ContentSortBy,
) -> Result<AuthorFilter> {
    let generation = match (sort_by, viewer) {
        (ContentSortBy::ByGeneration, Some(member_id)) => {
            get_member_is_not_deleted(pool, member_id).await?.generation
        }
        _ => None,
    };

    author_filter(sort_by, viewer, generation)
}

pub(crate) fn author_filter(
    sort_by: ContentSortBy,
    viewer: Option<Uuid>,
    viewer_generation: Option<i32>,
) -> Result<AuthorFilter> {
    match sort_by {
        ContentSortBy::All => Ok(AuthorFilter::default()),
        ContentSortBy::ByFollow => {
            let member_id = viewer.ok_or_else(|| {
                AppError::Unauthorized("Login required to sort by follow".to_string())
            })?;
            Ok(AuthorFilter {
                followed_by: Some(member_id),
                ..AuthorFilter::default()
            })
        }
        ContentSortBy::ByGeneration => {
            if viewer.is_none() {
                return Err(AppError::Unauthorized(
                    "Login required to sort by generation".to_string(),
                ));
            }
            let generation = viewer_generation.ok_or_else(|| {
                AppError::BadRequest("Generation has not been assigned yet".to_string())
            })?;
            Ok(AuthorFilter {
                generation: Some(generation),
                ..AuthorFilter::default()
            })
        }
    }
}

/// Bucket child rows by parent id, keeping row order within each bucket
pub(crate) fn group_by_parent<R, V>(
    rows: Vec<R>,
    parent: impl Fn(&R) -> Uuid,
    value: impl Fn(R) -> V,
) -> HashMap<Uuid, Vec<V>> {
    let mut grouped: HashMap<Uuid, Vec<V>> = HashMap::new();
    for row in rows {
        grouped.entry(parent(&row)).or_default().push(value(row));
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_needs_no_login() {
        assert_eq!(
            author_filter(ContentSortBy::All, None, None).unwrap(),
            AuthorFilter::default()
        );
    }

    #[test]
    fn test_by_follow_requires_login() {
        assert!(matches!(
            author_filter(ContentSortBy::ByFollow, None, None),
            Err(AppError::Unauthorized(_))
        ));

        let me = Uuid::new_v4();
        let filter = author_filter(ContentSortBy::ByFollow, Some(me), None).unwrap();
        assert_eq!(filter.followed_by, Some(me));
    }

    #[test]
    fn test_by_generation_requires_assigned_generation() {
        assert!(matches!(
            author_filter(ContentSortBy::ByGeneration, None, Some(3)),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            author_filter(ContentSortBy::ByGeneration, Some(Uuid::new_v4()), None),
            Err(AppError::BadRequest(_))
        ));

        let filter =
            author_filter(ContentSortBy::ByGeneration, Some(Uuid::new_v4()), Some(3)).unwrap();
        assert_eq!(filter.generation, Some(3));
        assert!(filter.followed_by.is_none());
    }

    #[test]
    fn test_group_by_parent_keeps_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let rows = vec![(a, "1"), (b, "x"), (a, "2")];

        let grouped = group_by_parent(rows, |r| r.0, |r| r.1);
        assert_eq!(grouped[&a], vec!["1", "2"]);
        assert_eq!(grouped[&b], vec!["x"]);
    }
}
