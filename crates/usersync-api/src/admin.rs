//! Pass-through store endpoints: listing, counting, stale diagnostics,
//! point lookup, and delete. These never touch the upstream API.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use usersync_core::SyncError;
use usersync_types::api::{CountResponse, StaleUserEntry, StaleUsersResponse, UserView};

use crate::{AppState, error_status};

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let db = state.db.clone();
    let rows = tokio::task::spawn_blocking(move || db.list_users())
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    let views: Vec<UserView> = rows.iter().map(|r| r.to_view()).collect();
    Ok(Json(views))
}

/// GET /api/users/count
pub async fn count_users(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let db = state.db.clone();
    let count = tokio::task::spawn_blocking(move || db.count_users())
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    Ok(Json(CountResponse { count }))
}

/// GET /api/users/stale — rows whose timestamp is older than the TTL.
pub async fn stale_users(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let cutoff = Utc::now() - state.ttl;

    let db = state.db.clone();
    let rows = tokio::task::spawn_blocking(move || db.list_stale(cutoff))
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    let stale_users = rows
        .into_iter()
        .map(|r| StaleUserEntry {
            id: r.id,
            name: r.name,
            username: r.username,
            updated_at: r.updated_at,
        })
        .collect();

    Ok(Json(StaleUsersResponse { stale_users }))
}

/// GET /api/users/{user_id}
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.db.clone();
    let row = tokio::task::spawn_blocking(move || db.get_user(user_id))
        .await
        .map_err(join_error)?
        .map_err(db_error)?
        .ok_or_else(|| error_status(SyncError::NotFound))?;

    Ok(Json(row.to_view()))
}

/// DELETE /api/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.db.clone();
    let deleted = tokio::task::spawn_blocking(move || db.delete_user(user_id))
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    if !deleted {
        return Err(error_status(SyncError::NotFound));
    }

    Ok(Json(json!({ "message": format!("User {user_id} deleted") })))
}

fn join_error(e: tokio::task::JoinError) -> StatusCode {
    error!("spawn_blocking join error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn db_error(e: usersync_db::DbError) -> StatusCode {
    error!("database error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}
