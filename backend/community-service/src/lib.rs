/// Community Service Library
///
/// Backend for a cohort community: members sign in with GitHub, wait for an
/// admin to approve them, then share feeds and categorized posts, react with
/// emojis, comment, scrap posts and follow each other.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: route table mounted under `/api/v1`
/// - `services`: business logic layer
/// - `domain`: shared lookups that enforce existence and soft-delete rules
/// - `db`: PostgreSQL repositories
/// - `models`: rows, request and response types
/// - `middleware`: JWT authentication, metrics and ownership checks
/// - `pagination`: page/take/order parameters and page metadata
/// - `error`: error types and HTTP mapping
/// - `config`: configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
