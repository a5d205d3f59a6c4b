//! GitHub OAuth login.
//!
//! The `state` parameter is stored for ten minutes and consumed exactly once
//! on callback. Redis backs it in production; [`InMemoryStateStore`] serves
//! tests and single-node development.

use crate::config::GithubOAuthConfig;
use crate::db::member_repo;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{LoginResponse, Member, MemberResponse, OAuthUrlResponse};
use async_trait::async_trait;
use crypto_core::jwt;
use redis::aio::ConnectionManager;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const OAUTH_PROVIDER: &str = "github";
pub const STATE_TTL_SECS: u64 = 600;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const OAUTH_SCOPE: &str = "read:user user:email";
const USER_AGENT: &str = "community-service";

/// One-shot storage for OAuth `state` values
#[async_trait]
pub trait OAuthStateStore: Send + Sync {
    async fn save(&self, state: &str) -> Result<()>;

    /// Remove `state`, returning whether it was present and unexpired
    async fn consume(&self, state: &str) -> Result<bool>;

    /// Readiness probe for the backing store
    async fn ping(&self) -> Result<()>;
}

pub struct RedisStateStore {
    redis: ConnectionManager,
}

impl RedisStateStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn key(state: &str) -> String {
        format!("community:oauth:state:{}", state)
    }
}

#[async_trait]
impl OAuthStateStore for RedisStateStore {
    async fn save(&self, state: &str) -> Result<()> {
        let mut conn = self.redis.clone();
        redis::cmd("SET")
            .arg(Self::key(state))
            .arg("1")
            .arg("EX")
            .arg(STATE_TTL_SECS)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn consume(&self, state: &str) -> Result<bool> {
        let mut conn = self.redis.clone();
        let removed: i64 = redis::cmd("DEL")
            .arg(Self::key(state))
            .query_async(&mut conn)
            .await?;
        Ok(removed > 0)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.redis.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStateStore {
    states: Mutex<HashMap<String, Instant>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Instant>>> {
        self.states
            .lock()
            .map_err(|_| AppError::Internal("oauth state lock poisoned".to_string()))
    }
}

#[async_trait]
impl OAuthStateStore for InMemoryStateStore {
    async fn save(&self, state: &str) -> Result<()> {
        let expires_at = Instant::now() + Duration::from_secs(STATE_TTL_SECS);
        let mut states = self.lock()?;
        states.retain(|_, expiry| *expiry > Instant::now());
        states.insert(state.to_string(), expires_at);
        Ok(())
    }

    async fn consume(&self, state: &str) -> Result<bool> {
        let expiry = self.lock()?.remove(state);
        Ok(matches!(expiry, Some(expiry) if expiry > Instant::now()))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct GithubTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
    email: Option<String>,
    avatar_url: Option<String>,
}

pub struct GithubOAuthService {
    config: GithubOAuthConfig,
    http: reqwest::Client,
    states: Arc<dyn OAuthStateStore>,
}

impl GithubOAuthService {
    pub fn new(config: GithubOAuthConfig, states: Arc<dyn OAuthStateStore>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            states,
        }
    }

    pub fn state_store(&self) -> Arc<dyn OAuthStateStore> {
        self.states.clone()
    }

    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{AUTHORIZE_URL}?client_id={}&redirect_uri={}&scope={}&state={}",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(OAUTH_SCOPE),
            urlencoding::encode(state),
        )
    }

    /// Issue a fresh `state` and the GitHub consent URL carrying it
    pub async fn start_login(&self) -> Result<OAuthUrlResponse> {
        let state = Uuid::new_v4().simple().to_string();
        self.states.save(&state).await?;

        Ok(OAuthUrlResponse {
            url: self.authorize_url(&state),
            state,
        })
    }

    pub async fn complete_login(
        &self,
        pool: &PgPool,
        code: &str,
        state: &str,
    ) -> Result<LoginResponse> {
        if !self.states.consume(state).await? {
            return Err(AppError::BadRequest(
                "Invalid or expired OAuth state".to_string(),
            ));
        }

        let access_token = self.exchange_code(code).await?;
        let user = self.fetch_user(&access_token).await?;
        let (member, is_new_member) = upsert_member(pool, &user).await?;

        let tokens = jwt::generate_token_pair(member.id, &member.nickname)?;

        metrics::record_event(if is_new_member { "member_signed_up" } else { "member_logged_in" });
        tracing::info!(member_id = %member.id, is_new_member, "github login completed");

        Ok(LoginResponse {
            tokens,
            member: MemberResponse::from(&member),
            is_new_member,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<String> {
        let response = self
            .http
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&serde_json::json!({
                "client_id": self.config.client_id,
                "client_secret": self.config.client_secret,
                "code": code,
                "redirect_uri": self.config.redirect_uri,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "GitHub token exchange failed with status {}",
                response.status()
            )));
        }

        let body: GithubTokenResponse = response.json().await?;
        match (body.access_token, body.error) {
            (Some(token), None) => Ok(token),
            (_, Some(error)) => {
                tracing::warn!(error = %error, "github rejected authorization code");
                Err(AppError::BadRequest(format!(
                    "GitHub rejected the authorization code: {}",
                    body.error_description.unwrap_or(error)
                )))
            }
            (None, None) => Err(AppError::External(
                "GitHub token response had no access_token".to_string(),
            )),
        }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<GithubUser> {
        let response = self
            .http
            .get(USER_URL)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "GitHub user lookup failed with status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

/// Existing member for the GitHub account, or a new `PENDING` one
async fn upsert_member(pool: &PgPool, user: &GithubUser) -> Result<(Member, bool)> {
    let oauth_id = user.id.to_string();

    if let Some(member) = member_repo::find_by_oauth(pool, OAUTH_PROVIDER, &oauth_id).await? {
        if member.is_deleted() {
            return Err(AppError::Gone("Member has withdrawn".to_string()));
        }
        return Ok((member, false));
    }

    let member = member_repo::create_oauth_member(
        pool,
        OAUTH_PROVIDER,
        &oauth_id,
        &user.login,
        user.email.as_deref(),
        user.avatar_url.as_deref(),
    )
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Member already registered"))?;

    Ok((member, true))
}
