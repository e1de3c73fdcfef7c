//! Saved PG API Handlers
//!
//! A renter's shortlist.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::HeaderMap,
};
use findmypg_core::dto::Ack;
use findmypg_core::dto::saved::{SavedPgDetails, SavedPgIds, SavedPgRequest};
use findmypg_core::lenient::parse_int;
use serde::Deserialize;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{json_body, query_params, require_header_id};
use crate::service::saved_service;

#[derive(Debug, Deserialize)]
pub struct SavedPgQuery {
    pub user_id: Option<String>,
}

/// POST /api/save_pg
pub async fn save_pg(
    State(state): State<AppState>,
    payload: Result<Json<SavedPgRequest>, JsonRejection>,
) -> ApiResult<Json<Ack>> {
    let req = json_body(payload)?;

    saved_service::save_pg(&state.pool, req).await?;

    Ok(Json(Ack::success()))
}

/// POST /api/unsave_pg
/// Removing an entry that does not exist is reported in the body, not the status
pub async fn unsave_pg(
    State(state): State<AppState>,
    payload: Result<Json<SavedPgRequest>, JsonRejection>,
) -> ApiResult<Json<Ack>> {
    let req = json_body(payload)?;

    let removed = saved_service::unsave_pg(&state.pool, req).await?;

    if removed {
        Ok(Json(Ack::success()))
    } else {
        Ok(Json(Ack::error(
            "Failed to remove PG or entry doesn't exist",
        )))
    }
}

/// GET /api/get_saved_pgs
pub async fn get_saved_pgs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SavedPgIds>> {
    let user_id = require_header_id(&headers, "user_id")?;

    let ids = saved_service::saved_pg_ids(&state.pool, user_id).await?;

    Ok(Json(SavedPgIds::new(ids)))
}

/// GET /api/get_saved_pg_details?user_id=n
pub async fn get_saved_pg_details(
    State(state): State<AppState>,
    query: Result<Query<SavedPgQuery>, QueryRejection>,
) -> ApiResult<Json<SavedPgDetails>> {
    let query = query_params(query)?;

    let raw = query
        .user_id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing user_id parameter".to_string()))?;

    let user_id = parse_int(&raw)
        .ok()
        .flatten()
        .ok_or_else(|| ApiError::BadRequest("Invalid user_id parameter".to_string()))?;

    tracing::debug!("Loading saved PG cards of user {}", user_id);

    let saved = saved_service::saved_pg_details(&state.pool, user_id).await?;

    Ok(Json(SavedPgDetails::new(saved)))
}
