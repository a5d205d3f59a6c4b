/// HTTP handlers for community-service
///
/// Handlers validate input, build a service from the shared pool and map
/// the result to a status code:
/// - Create: 201 with the new id
/// - Update: 200 with the id or updated resource
/// - Delete and side-effect-only calls: 204
pub mod admin;
pub mod auth;
pub mod comments;
pub mod feeds;
pub mod follows;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod profile;

pub use health::HealthState;
