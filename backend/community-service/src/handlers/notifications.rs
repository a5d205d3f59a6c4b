/// Notification inbox handlers
use crate::error::Result;
use crate::middleware::MemberId;
use crate::models::UnreadCountResponse;
use crate::pagination::PaginationRequest;
use crate::services::NotificationService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub async fn list_notifications(
    pool: web::Data<PgPool>,
    member: MemberId,
    page: web::Query<PaginationRequest>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = NotificationService::new((**pool).clone());
    let notifications = service.list(member.0, &page).await?;

    Ok(HttpResponse::Ok().json(notifications))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    tag = "notifications",
    responses(
        (status = 200, description = "Unread notification count", body = UnreadCountResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unread_count(pool: web::Data<PgPool>, member: MemberId) -> Result<HttpResponse> {
    let service = NotificationService::new((**pool).clone());
    let count = service.unread_count(member.0).await?;

    Ok(HttpResponse::Ok().json(count))
}

pub async fn mark_read(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = NotificationService::new((**pool).clone());
    service.mark_read(member.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn mark_all_read(pool: web::Data<PgPool>, member: MemberId) -> Result<HttpResponse> {
    let service = NotificationService::new((**pool).clone());
    let updated = service.mark_all_read(member.0).await?;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_notification(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = NotificationService::new((**pool).clone());
    service.delete(member.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
