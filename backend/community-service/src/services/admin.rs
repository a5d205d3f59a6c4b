/// Admin service - member authorization review
use crate::db::member_repo;
use crate::domain::member::{get_admin, get_member_is_not_deleted};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{AuthorizationStatus, MemberResponse, UpdateAuthorizationRequest};
use crate::pagination::{PaginationRequest, PaginationResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_members(
        &self,
        admin_id: Uuid,
        status: Option<AuthorizationStatus>,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<MemberResponse>> {
        get_admin(&self.pool, admin_id).await?;

        let status = status.unwrap_or(AuthorizationStatus::Pending);
        let members = member_repo::list_by_status(&self.pool, status, page).await?;
        let total = member_repo::count_by_status(&self.pool, status).await?;
        let data = members.iter().map(MemberResponse::from).collect();

        Ok(PaginationResponse::new(data, page, total))
    }

    pub async fn update_authorization(
        &self,
        admin_id: Uuid,
        member_id: Uuid,
        req: &UpdateAuthorizationRequest,
    ) -> Result<MemberResponse> {
        get_admin(&self.pool, admin_id).await?;
        get_member_is_not_deleted(&self.pool, member_id).await?;

        let member =
            member_repo::update_authorization(&self.pool, member_id, req.status, req.generation)
                .await?
                .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        metrics::record_event("member_authorization_updated");
        tracing::info!(
            %admin_id,
            %member_id,
            status = %req.status,
            generation = ?req.generation,
            "member authorization updated"
        );

        Ok(MemberResponse::from(&member))
    }
}
