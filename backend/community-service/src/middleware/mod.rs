/// HTTP middleware utilities for community-service
///
/// Bearer tokens are checked once per request by [`JwtAuthMiddleware`], which
/// never rejects on its own; it records an [`AuthState`] that the
/// [`MemberId`] and [`OptionalMember`] extractors turn into 401s where a
/// route needs them. Anonymous callers can therefore reach public routes
/// while a malformed token is still refused everywhere.
pub mod permissions;

pub use permissions::*;

use crate::error::AppError;
use crate::metrics::http::observe_request;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use crypto_core::jwt;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

// =====================================================================
// JWT Authentication
// =====================================================================

/// Outcome of reading the `Authorization` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Member(Uuid),
    Invalid(&'static str),
}

impl AuthState {
    pub fn from_header(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return AuthState::Anonymous;
        };

        let Some(token) = header.strip_prefix("Bearer ") else {
            return AuthState::Invalid("Invalid Authorization scheme");
        };

        match jwt::validate_access_token(token).and_then(|data| data.claims.member_id()) {
            Ok(member_id) => AuthState::Member(member_id),
            Err(err) => {
                tracing::debug!("access token rejected: {}", err);
                AuthState::Invalid("Invalid or expired token")
            }
        }
    }
}

/// Authenticated member id; 401 when the caller is anonymous or the token is bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberId(pub Uuid);

/// Caller id when a valid token is present; 401 only for a bad token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalMember(pub Option<Uuid>);

/// Actix middleware that validates a Bearer token using shared JWT helpers.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let state = AuthState::from_header(
                req.headers()
                    .get(AUTHORIZATION)
                    .map(|h| h.to_str().unwrap_or_default()),
            );
            req.extensions_mut().insert(state);

            service.call(req).await
        })
    }
}

fn auth_state(req: &HttpRequest) -> AuthState {
    req.extensions()
        .get::<AuthState>()
        .cloned()
        .unwrap_or(AuthState::Anonymous)
}

impl FromRequest for MemberId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(match auth_state(req) {
            AuthState::Member(id) => Ok(MemberId(id)),
            AuthState::Invalid(reason) => Err(AppError::Unauthorized(reason.to_string())),
            AuthState::Anonymous => Err(AppError::Unauthorized(
                "Missing Authorization header".to_string(),
            )),
        })
    }
}

impl FromRequest for OptionalMember {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(match auth_state(req) {
            AuthState::Member(id) => Ok(OptionalMember(Some(id))),
            AuthState::Anonymous => Ok(OptionalMember(None)),
            AuthState::Invalid(reason) => Err(AppError::Unauthorized(reason.to_string())),
        })
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();
            let status = match &res {
                Ok(response) => response.status().as_u16(),
                Err(err) => err.as_response_error().status_code().as_u16(),
            };

            observe_request(&method, status, elapsed.as_secs_f64());
            tracing::debug!(%method, %path, status, elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(AuthState::from_header(None), AuthState::Anonymous);
    }

    #[test]
    fn test_non_bearer_scheme_is_invalid() {
        assert_eq!(
            AuthState::from_header(Some("Basic dXNlcjpwYXNz")),
            AuthState::Invalid("Invalid Authorization scheme")
        );
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(
            AuthState::from_header(Some("Bearer not-a-jwt")),
            AuthState::Invalid("Invalid or expired token")
        );
    }
}
