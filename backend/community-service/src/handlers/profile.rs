/// Profile handlers - member cards and per-member content lists
use crate::error::Result;
use crate::middleware::{MemberId, OptionalMember};
use crate::models::{ProfileResponse, UpdateProfileRequest};
use crate::pagination::PaginationRequest;
use crate::services::ProfileService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub async fn my_profile(pool: web::Data<PgPool>, member: MemberId) -> Result<HttpResponse> {
    let service = ProfileService::new((**pool).clone());
    let profile = service.my_profile(member.0).await?;

    Ok(HttpResponse::Ok().json(profile))
}

pub async fn update_my_profile(
    pool: web::Data<PgPool>,
    member: MemberId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = ProfileService::new((**pool).clone());
    let profile = service.update_my_profile(member.0, &req).await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/{member_id}",
    tag = "profile",
    params(("member_id" = Uuid, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member profile", body = ProfileResponse),
        (status = 404, description = "Member not found"),
        (status = 410, description = "Member has withdrawn")
    )
)]
pub async fn member_profile(
    pool: web::Data<PgPool>,
    viewer: OptionalMember,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = ProfileService::new((**pool).clone());
    let profile = service.member_profile(viewer.0, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(profile))
}

pub async fn my_posts(
    pool: web::Data<PgPool>,
    member: MemberId,
    page: web::Query<PaginationRequest>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = ProfileService::new((**pool).clone());
    let posts = service.member_posts(Some(member.0), member.0, &page).await?;

    Ok(HttpResponse::Ok().json(posts))
}

pub async fn member_posts(
    pool: web::Data<PgPool>,
    viewer: OptionalMember,
    path: web::Path<Uuid>,
    page: web::Query<PaginationRequest>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = ProfileService::new((**pool).clone());
    let posts = service
        .member_posts(viewer.0, path.into_inner(), &page)
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

pub async fn my_feeds(
    pool: web::Data<PgPool>,
    member: MemberId,
    page: web::Query<PaginationRequest>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = ProfileService::new((**pool).clone());
    let feeds = service.member_feeds(Some(member.0), member.0, &page).await?;

    Ok(HttpResponse::Ok().json(feeds))
}

pub async fn member_feeds(
    pool: web::Data<PgPool>,
    viewer: OptionalMember,
    path: web::Path<Uuid>,
    page: web::Query<PaginationRequest>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = ProfileService::new((**pool).clone());
    let feeds = service
        .member_feeds(viewer.0, path.into_inner(), &page)
        .await?;

    Ok(HttpResponse::Ok().json(feeds))
}

pub async fn my_scraps(
    pool: web::Data<PgPool>,
    member: MemberId,
    page: web::Query<PaginationRequest>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = ProfileService::new((**pool).clone());
    let scraps = service.my_scraps(member.0, &page).await?;

    Ok(HttpResponse::Ok().json(scraps))
}
