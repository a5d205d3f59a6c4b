/// Comment handlers shared by feeds and posts.
///
/// The enclosing scope registers the parent [`ContentKind`] as app data, so
/// one set of handlers serves `/feeds/{id}/comments` and `/posts/{id}/comments`.
use crate::db::ContentKind;
use crate::error::Result;
use crate::middleware::{MemberId, OptionalMember};
use crate::models::CommentRequest;
use crate::pagination::PaginationRequest;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

fn service(pool: &web::Data<PgPool>, kind: &web::Data<ContentKind>) -> CommentService {
    CommentService::new((***pool).clone(), ***kind)
}

pub async fn list_comments(
    pool: web::Data<PgPool>,
    kind: web::Data<ContentKind>,
    viewer: OptionalMember,
    path: web::Path<Uuid>,
    page: web::Query<PaginationRequest>,
) -> Result<HttpResponse> {
    page.validate()?;

    let comments = service(&pool, &kind)
        .list_comments(viewer.0, path.into_inner(), &page)
        .await?;

    Ok(HttpResponse::Ok().json(comments))
}

pub async fn create_comment(
    pool: web::Data<PgPool>,
    kind: web::Data<ContentKind>,
    member: MemberId,
    path: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let created = service(&pool, &kind)
        .create_comment(member.0, path.into_inner(), &req.content)
        .await?;

    Ok(HttpResponse::Created().json(created))
}

pub async fn update_comment(
    pool: web::Data<PgPool>,
    kind: web::Data<ContentKind>,
    member: MemberId,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let (parent_id, comment_id) = path.into_inner();

    let updated = service(&pool, &kind)
        .update_comment(member.0, parent_id, comment_id, &req.content)
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_comment(
    pool: web::Data<PgPool>,
    kind: web::Data<ContentKind>,
    member: MemberId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (parent_id, comment_id) = path.into_inner();

    service(&pool, &kind)
        .delete_comment(member.0, parent_id, comment_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn add_heart(
    pool: web::Data<PgPool>,
    kind: web::Data<ContentKind>,
    member: MemberId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (parent_id, comment_id) = path.into_inner();

    service(&pool, &kind)
        .add_heart(member.0, parent_id, comment_id)
        .await?;

    Ok(HttpResponse::Created().finish())
}

pub async fn remove_heart(
    pool: web::Data<PgPool>,
    kind: web::Data<ContentKind>,
    member: MemberId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (parent_id, comment_id) = path.into_inner();

    service(&pool, &kind)
        .remove_heart(member.0, parent_id, comment_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
