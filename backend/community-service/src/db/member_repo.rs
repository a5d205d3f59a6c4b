use crate::models::{AuthorizationStatus, Member};
use crate::pagination::PaginationRequest;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Find a member by ID, including soft-deleted members
pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: Uuid,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        r#"
        SELECT id, oauth_provider, oauth_id, nickname, email, generation, profile_image_url,
               introduce, is_admin, authorization_status, created_at, updated_at, deleted_at
        FROM members
        WHERE id = $1
        "#,
    )
    .bind(member_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_by_oauth(
    pool: &PgPool,
    provider: &str,
    oauth_id: &str,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        r#"
        SELECT id, oauth_provider, oauth_id, nickname, email, generation, profile_image_url,
               introduce, is_admin, authorization_status, created_at, updated_at, deleted_at
        FROM members
        WHERE oauth_provider = $1 AND oauth_id = $2
        "#,
    )
    .bind(provider)
    .bind(oauth_id)
    .fetch_optional(pool)
    .await
}

/// Insert a member on first OAuth login; new members start `PENDING`
pub async fn create_oauth_member(
    pool: &PgPool,
    provider: &str,
    oauth_id: &str,
    nickname: &str,
    email: Option<&str>,
    profile_image_url: Option<&str>,
) -> Result<Member, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        r#"
        INSERT INTO members (oauth_provider, oauth_id, nickname, email, profile_image_url, authorization_status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, oauth_provider, oauth_id, nickname, email, generation, profile_image_url,
                  introduce, is_admin, authorization_status, created_at, updated_at, deleted_at
        "#,
    )
    .bind(provider)
    .bind(oauth_id)
    .bind(nickname)
    .bind(email)
    .bind(profile_image_url)
    .bind(AuthorizationStatus::Pending.as_str())
    .fetch_one(pool)
    .await
}

/// Withdraw a member (soft delete)
pub async fn soft_delete(pool: &PgPool, member_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE members
        SET deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(member_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn update_profile(
    pool: &PgPool,
    member_id: Uuid,
    nickname: &str,
    profile_image_url: Option<&str>,
    introduce: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE members
        SET nickname = $2, profile_image_url = $3, introduce = $4, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(member_id)
    .bind(nickname)
    .bind(profile_image_url)
    .bind(introduce)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn list_by_status_sql(page: &PaginationRequest) -> String {
    format!(
        "SELECT id, oauth_provider, oauth_id, nickname, email, generation, profile_image_url, \
         introduce, is_admin, authorization_status, created_at, updated_at, deleted_at \
         FROM members \
         WHERE authorization_status = $1 AND deleted_at IS NULL \
         ORDER BY created_at {order}, id {order} \
         LIMIT $2 OFFSET $3",
        order = page.order.as_sql()
    )
}

/// Members awaiting (or holding) a given authorization status
pub async fn list_by_status(
    pool: &PgPool,
    status: AuthorizationStatus,
    page: &PaginationRequest,
) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(&list_by_status_sql(page))
        .bind(status.as_str())
        .bind(page.take)
        .bind(page.skip())
        .fetch_all(pool)
        .await
}

pub async fn count_by_status(
    pool: &PgPool,
    status: AuthorizationStatus,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM members WHERE authorization_status = $1 AND deleted_at IS NULL",
    )
    .bind(status.as_str())
    .fetch_one(pool)
    .await
}

/// Set authorization status; `generation` is left untouched when `None`
pub async fn update_authorization(
    pool: &PgPool,
    member_id: Uuid,
    status: AuthorizationStatus,
    generation: Option<i32>,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        r#"
        UPDATE members
        SET authorization_status = $2,
            generation = COALESCE($3, generation),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING id, oauth_provider, oauth_id, nickname, email, generation, profile_image_url,
                  introduce, is_admin, authorization_status, created_at, updated_at, deleted_at
        "#,
    )
    .bind(member_id)
    .bind(status.as_str())
    .bind(generation)
    .fetch_optional(pool)
    .await
}
