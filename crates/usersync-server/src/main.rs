use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use usersync_api::{AppState, AppStateInner, admin, users};
use usersync_core::{HttpUpstream, UserService};
use usersync_db::Database;

const DEFAULT_UPSTREAM_URL: &str = "https://jsonplaceholder.typicode.com/users/1";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usersync=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("USERSYNC_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("USERSYNC_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()?;
    let db_path = std::env::var("USERSYNC_DB_PATH").unwrap_or_else(|_| "usersync.db".into());
    let upstream_url =
        std::env::var("USERSYNC_UPSTREAM_URL").unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.into());
    let ttl_minutes: i64 = std::env::var("USERSYNC_CACHE_TTL_MINUTES")
        .unwrap_or_else(|_| "10".into())
        .parse()?;
    let fetch_timeout_secs: u64 = std::env::var("USERSYNC_UPSTREAM_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".into())
        .parse()?;

    let ttl = chrono::Duration::minutes(ttl_minutes);

    // Store. Schema setup happens once here at startup, inside open().
    let db = Arc::new(Database::open(&PathBuf::from(&db_path))?);

    let upstream = Arc::new(HttpUpstream::new(
        upstream_url,
        Duration::from_secs(fetch_timeout_secs),
    )?);
    let service = UserService::new(db.clone(), upstream, ttl);

    let state: AppState = Arc::new(AppStateInner { db, service, ttl });

    // Routes. The static /api/users/1 read path takes precedence over the
    // {user_id} admin lookup for that one id.
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/users", get(admin::list_users))
        .route("/api/users/1", get(users::get_user))
        .route("/api/users/refresh", post(users::refresh_user))
        .route("/api/users/count", get(admin::count_users))
        .route("/api/users/stale", get(admin::stale_users))
        .route(
            "/api/users/{user_id}",
            get(admin::get_user_by_id).delete(admin::delete_user),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("usersync listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
