/// Follow handlers
use crate::error::Result;
use crate::middleware::MemberId;
use crate::services::FollowService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn follow(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    service.follow(member.0, path.into_inner()).await?;

    Ok(HttpResponse::Created().finish())
}

pub async fn unfollow(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    service.unfollow(member.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn followers(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    let members = service.followers(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(members))
}

pub async fn followings(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    let members = service.followings(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(members))
}
