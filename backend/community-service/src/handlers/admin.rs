/// Admin handlers - member authorization review
use crate::error::Result;
use crate::middleware::MemberId;
use crate::models::{AdminMemberQuery, UpdateAuthorizationRequest};
use crate::pagination::PaginationRequest;
use crate::services::AdminService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub async fn list_members(
    pool: web::Data<PgPool>,
    admin: MemberId,
    page: web::Query<PaginationRequest>,
    query: web::Query<AdminMemberQuery>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = AdminService::new((**pool).clone());
    let members = service.list_members(admin.0, query.status, &page).await?;

    Ok(HttpResponse::Ok().json(members))
}

pub async fn update_authorization(
    pool: web::Data<PgPool>,
    admin: MemberId,
    path: web::Path<Uuid>,
    req: web::Json<UpdateAuthorizationRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AdminService::new((**pool).clone());
    let member = service
        .update_authorization(admin.0, path.into_inner(), &req)
        .await?;

    Ok(HttpResponse::Ok().json(member))
}
