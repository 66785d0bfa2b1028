use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use serde::Deserialize;

use crate::{AppState, error_status};

/// The cache fronts exactly one upstream resource; this is its row id.
pub const CACHED_USER_ID: i64 = 1;

#[derive(Debug, Deserialize)]
pub struct CacheQuery {
    /// Force a refetch from the upstream API even when the row is fresh.
    #[serde(default)]
    pub bypass_cache: bool,
}

/// GET /api/users/1 — read path. Serves the persisted row when fresh,
/// refetches from upstream when the row is missing, stale, or bypassed.
pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<CacheQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let view = state
        .service
        .get_user(CACHED_USER_ID, query.bypass_cache)
        .await
        .map_err(error_status)?;

    Ok(Json(view))
}

/// POST /api/users/refresh — unconditional fetch-and-upsert.
pub async fn refresh_user(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let view = state.service.refresh_user().await.map_err(error_status)?;
    Ok(Json(view))
}
