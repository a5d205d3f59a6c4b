/// Feed handlers - HTTP endpoints for feed operations
use crate::error::Result;
use crate::middleware::{MemberId, OptionalMember};
use crate::models::{EmojiRequest, FeedIdResponse, FeedItem, FeedListQuery, FeedRequest};
use crate::pagination::PaginationRequest;
use crate::services::FeedService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/feeds",
    tag = "feeds",
    request_body = FeedRequest,
    responses(
        (status = 201, description = "Feed created", body = FeedIdResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Member is not approved to write")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_feed(
    pool: web::Data<PgPool>,
    member: MemberId,
    req: web::Json<FeedRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = FeedService::new((**pool).clone());
    let created = service.create_feed(member.0, &req).await?;

    Ok(HttpResponse::Created().json(created))
}

/// List feeds, optionally restricted to followed authors or the caller's generation
pub async fn list_feeds(
    pool: web::Data<PgPool>,
    viewer: OptionalMember,
    page: web::Query<PaginationRequest>,
    query: web::Query<FeedListQuery>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = FeedService::new((**pool).clone());
    let feeds = service.list_feeds(viewer.0, query.sort_by, &page).await?;

    Ok(HttpResponse::Ok().json(feeds))
}

#[utoipa::path(
    get,
    path = "/api/v1/feeds/{feed_id}",
    tag = "feeds",
    params(("feed_id" = Uuid, Path, description = "Feed ID")),
    responses(
        (status = 200, description = "Feed detail", body = FeedItem),
        (status = 404, description = "Feed not found"),
        (status = 410, description = "Feed or its writer was deleted")
    )
)]
pub async fn get_feed(
    pool: web::Data<PgPool>,
    viewer: OptionalMember,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let feed = service.get_feed(viewer.0, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(feed))
}

pub async fn update_feed(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
    req: web::Json<FeedRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = FeedService::new((**pool).clone());
    let updated = service
        .update_feed(member.0, path.into_inner(), &req)
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_feed(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    service.delete_feed(member.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn view_feed(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    service.view_feed(member.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn add_feed_emoji(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
    req: web::Json<EmojiRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = FeedService::new((**pool).clone());
    service
        .add_emoji(member.0, path.into_inner(), &req.emoji)
        .await?;

    Ok(HttpResponse::Created().finish())
}

pub async fn remove_feed_emoji(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse> {
    let (feed_id, emoji) = path.into_inner();

    let service = FeedService::new((**pool).clone());
    service.remove_emoji(member.0, feed_id, &emoji).await?;

    Ok(HttpResponse::NoContent().finish())
}
