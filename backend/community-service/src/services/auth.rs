/// Auth service - token refresh and account lifecycle
use crate::db::member_repo;
use crate::domain::member::get_member_is_not_deleted;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::MemberResponse;
use crypto_core::jwt::{self, TokenResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Trade a refresh token for a new token pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let member_id = jwt::validate_refresh_token(refresh_token)
            .and_then(|data| data.claims.member_id())
            .map_err(|e| {
                tracing::debug!("refresh token rejected: {}", e);
                AppError::Unauthorized("Invalid or expired refresh token".to_string())
            })?;

        let member = get_member_is_not_deleted(&self.pool, member_id).await?;
        Ok(jwt::generate_token_pair(member.id, &member.nickname)?)
    }

    pub async fn me(&self, member_id: Uuid) -> Result<MemberResponse> {
        let member = get_member_is_not_deleted(&self.pool, member_id).await?;
        Ok(MemberResponse::from(&member))
    }

    pub async fn withdraw(&self, member_id: Uuid) -> Result<()> {
        get_member_is_not_deleted(&self.pool, member_id).await?;

        if !member_repo::soft_delete(&self.pool, member_id).await? {
            return Err(AppError::Gone("Member has been deleted".to_string()));
        }

        metrics::record_event("member_withdrawn");
        tracing::info!(%member_id, "member withdrew");
        Ok(())
    }
}
