pub mod admin;
pub mod users;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Duration;
use tracing::{error, warn};

use usersync_core::{SyncError, UserService};
use usersync_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub service: UserService,
    /// Staleness window, shared with the service; the diagnostics
    /// endpoints need it to compute the cutoff.
    pub ttl: Duration,
}

/// Log and map a core error to the caller-visible status code. Malformed
/// payloads look like an unavailable upstream to callers but are logged
/// under their own message for diagnostics.
pub(crate) fn error_status(err: SyncError) -> StatusCode {
    match err {
        SyncError::UpstreamUnavailable(msg) => {
            error!("upstream unavailable: {}", msg);
            StatusCode::BAD_GATEWAY
        }
        SyncError::MalformedPayload(msg) => {
            error!("malformed upstream payload: {}", msg);
            StatusCode::BAD_GATEWAY
        }
        SyncError::Conflict(username) => {
            warn!("username conflict during upsert: {}", username);
            StatusCode::CONFLICT
        }
        SyncError::NotFound => StatusCode::NOT_FOUND,
        SyncError::Db(e) => {
            error!("database error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SyncError::Task(e) => {
            error!("blocking task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
