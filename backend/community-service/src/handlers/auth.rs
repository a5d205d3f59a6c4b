/// Auth handlers - GitHub OAuth login, token refresh and withdrawal
use crate::error::Result;
use crate::middleware::MemberId;
use crate::models::{MemberResponse, OAuthCallbackQuery, OAuthUrlResponse, RefreshTokenRequest};
use crate::services::{AuthService, GithubOAuthService};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/v1/auth/github",
    tag = "auth",
    responses((status = 200, description = "GitHub consent URL and state", body = OAuthUrlResponse))
)]
pub async fn github_login_url(oauth: web::Data<GithubOAuthService>) -> Result<HttpResponse> {
    let response = oauth.start_login().await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn github_callback(
    pool: web::Data<PgPool>,
    oauth: web::Data<GithubOAuthService>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse> {
    let login = oauth
        .complete_login(&pool, &query.code, &query.state)
        .await?;

    Ok(HttpResponse::Ok().json(login))
}

pub async fn refresh_token(
    pool: web::Data<PgPool>,
    req: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new((**pool).clone());
    let tokens = service.refresh(&req.refresh_token).await?;

    Ok(HttpResponse::Ok().json(tokens))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current member", body = MemberResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(pool: web::Data<PgPool>, member: MemberId) -> Result<HttpResponse> {
    let service = AuthService::new((**pool).clone());
    let me = service.me(member.0).await?;

    Ok(HttpResponse::Ok().json(me))
}

pub async fn withdraw(pool: web::Data<PgPool>, member: MemberId) -> Result<HttpResponse> {
    let service = AuthService::new((**pool).clone());
    service.withdraw(member.0).await?;

    Ok(HttpResponse::NoContent().finish())
}
