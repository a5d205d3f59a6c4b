/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::{MemberId, OptionalMember};
use crate::models::{
    EmojiRequest, HashTagSearchItem, HashTagSearchQuery, PostIdResponse, PostItem, PostListQuery,
    PostRequest, TodayQuestionResponse,
};
use crate::pagination::PaginationRequest;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostIdResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Member is not approved to write")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    pool: web::Data<PgPool>,
    member: MemberId,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = PostService::new((**pool).clone());
    let created = service.create_post(member.0, &req).await?;

    Ok(HttpResponse::Created().json(created))
}

pub async fn list_posts(
    pool: web::Data<PgPool>,
    viewer: OptionalMember,
    page: web::Query<PaginationRequest>,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    page.validate()?;

    let service = PostService::new((**pool).clone());
    let posts = service
        .list_posts(viewer.0, query.sort_by, query.category, &page)
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post detail", body = PostItem),
        (status = 404, description = "Post not found"),
        (status = 410, description = "Post or its writer was deleted")
    )
)]
pub async fn get_post(
    pool: web::Data<PgPool>,
    viewer: OptionalMember,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service.get_post(viewer.0, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post))
}

pub async fn update_post(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = PostService::new((**pool).clone());
    let updated = service
        .update_post(member.0, path.into_inner(), &req)
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_post(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.delete_post(member.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn view_post(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.view_post(member.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn add_post_emoji(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
    req: web::Json<EmojiRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = PostService::new((**pool).clone());
    service
        .add_emoji(member.0, path.into_inner(), &req.emoji)
        .await?;

    Ok(HttpResponse::Created().finish())
}

pub async fn remove_post_emoji(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse> {
    let (post_id, emoji) = path.into_inner();

    let service = PostService::new((**pool).clone());
    service.remove_emoji(member.0, post_id, &emoji).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/hash-tags/search",
    tag = "posts",
    params(
        ("tag_name" = String, Query, description = "Tag prefix, case-insensitive"),
        ("take" = Option<i64>, Query, description = "Maximum results (1-50, default 10)")
    ),
    responses(
        (status = 200, description = "Matching tags by usage", body = [HashTagSearchItem]),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn search_hash_tags(
    pool: web::Data<PgPool>,
    query: web::Query<HashTagSearchQuery>,
) -> Result<HttpResponse> {
    query.validate()?;

    let service = PostService::new((**pool).clone());
    let tags = service.search_hash_tags(&query.tag_name, query.take).await?;

    Ok(HttpResponse::Ok().json(tags))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/today-question",
    tag = "posts",
    responses((status = 200, description = "Random question post", body = TodayQuestionResponse))
)]
pub async fn today_question(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let question = service.today_question().await?;

    Ok(HttpResponse::Ok().json(question))
}

pub async fn scrap_post(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.scrap_post(member.0, path.into_inner()).await?;

    Ok(HttpResponse::Created().finish())
}

pub async fn unscrap_post(
    pool: web::Data<PgPool>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.unscrap_post(member.0, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
