use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use community_service::handlers::HealthState;
use community_service::routes;
use community_service::services::{GithubOAuthService, OAuthStateStore, RedisStateStore};
use community_service::Config;
use crypto_core::jwt;
use db_pool::{create_pool, DbConfig};
use redis::aio::ConnectionManager;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn init_jwt(config: &Config) -> io::Result<()> {
    let result = match (&config.jwt.private_key_pem, &config.jwt.public_key_pem) {
        (Some(private_key), Some(public_key)) => jwt::initialize_jwt_keys(private_key, public_key),
        (None, Some(public_key)) => {
            tracing::warn!("JWT private key not configured; login and refresh will fail");
            jwt::initialize_jwt_validation_only(public_key)
        }
        _ => {
            tracing::warn!(
                "JWT keys not configured; every Bearer token will be rejected as invalid"
            );
            return Ok(());
        }
    };

    result.map_err(|err| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize JWT keys: {err}"),
        )
    })
}

async fn run_healthcheck() -> io::Result<()> {
    let port = std::env::var("COMMUNITY_SERVICE_PORT").unwrap_or_else(|_| "8080".to_string());
    let url = format!("http://127.0.0.1:{port}/api/v1/health/live");
    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Community Service
///
/// # Routes
///
/// - `/api/v1/auth/*` - GitHub OAuth login, token refresh
/// - `/api/v1/admin/*` - member approval
/// - `/api/v1/feeds/*`, `/api/v1/posts/*` - content, reactions, comments
/// - `/api/v1/profile/*`, `/api/v1/follows/*` - members and follow graph
/// - `/api/v1/notifications/*` - activity inbox
/// - `/api/v1/health*`, `/metrics`, `/api/v1/openapi.json`
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Container healthcheck: `community-service healthcheck`
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        return run_healthcheck().await;
    }

    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting community-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    init_jwt(&config)?;

    let mut db_cfg = DbConfig::from_env("community-service", &config.database.url);
    db_cfg.max_connections = std::cmp::max(db_cfg.max_connections, config.database.max_connections);
    db_cfg.log_config();

    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Migration failed: {e}")))?;
    tracing::info!("Database migrations applied");

    let redis_client = redis::Client::open(config.cache.url.as_str()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid REDIS_URL: {e}"),
        )
    })?;
    let redis_manager = ConnectionManager::new(redis_client).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize Redis connection: {e}"),
        )
    })?;

    let oauth_states: Arc<dyn OAuthStateStore> = Arc::new(RedisStateStore::new(redis_manager));
    let oauth = web::Data::new(GithubOAuthService::new(
        config.oauth.clone(),
        oauth_states.clone(),
    ));
    let health_state = web::Data::new(HealthState::new(db_pool.clone(), oauth_states));
    let pool_data = web::Data::new(db_pool.clone());

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let cors_origins = config.cors_origins();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &cors_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .app_data(oauth.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .workers(config.app.workers)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping HTTP server");
        server_handle.stop(true).await;
    });

    server.await?;

    db_pool.close().await;
    tracing::info!("community-service stopped");
    Ok(())
}
