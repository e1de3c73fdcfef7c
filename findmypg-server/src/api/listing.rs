//! Listing API Handlers
//!
//! HTTP endpoints for PGs and their rooms.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::HeaderMap,
};
use findmypg_core::dto::listing::{
    ListingDeleted, ListingUpdated, ListingsResponse, PgCreated, PgDraft, RoomCreated, RoomDraft,
};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{UploadForm, header_id, require_header_id};
use crate::service::listing::{DeleteTarget, ImageChanges};
use crate::service::listing_service;

/// GET /api/getData
/// Every PG, for the public catalogue
pub async fn get_data(State(state): State<AppState>) -> ApiResult<Json<ListingsResponse>> {
    tracing::debug!("Listing catalogue");

    let listings = listing_service::list_catalogue(&state.pool).await?;

    Ok(Json(ListingsResponse::new(listings)))
}

/// GET /api/getPG_Details
/// PGs selected by the `owner_id` and/or `pg_id` headers
pub async fn get_pg_details(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ListingsResponse>> {
    let owner_id = header_id(&headers, "owner_id")?;
    let pg_id = header_id(&headers, "pg_id")?;

    tracing::debug!("Listing PGs (owner: {:?}, pg: {:?})", owner_id, pg_id);

    let listings = listing_service::list_pgs(&state.pool, owner_id, pg_id).await?;

    Ok(Json(ListingsResponse::new(listings)))
}

/// POST /api/addPG
/// Multipart: `data` (PG JSON) and `images[]`
pub async fn add_pg(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<PgCreated>> {
    let mut form = UploadForm::read(multipart, state.config.max_upload_bytes).await?;

    let draft: PgDraft = form
        .json("data")?
        .ok_or_else(|| ApiError::BadRequest("PG data not provided".to_string()))?;
    let images = form.take_files("images");

    tracing::info!(
        "Adding PG {:?} for owner {:?} with {} image(s)",
        draft.pg_name,
        draft.owner_id,
        images.len()
    );

    let created = listing_service::add_pg(&state.pool, state.images.as_ref(), draft, images).await?;

    Ok(Json(created))
}

/// POST /api/updatePG
/// Header `pg_id`; multipart: optional `data`, `PgImages[]`, `RmImages`
pub async fn update_pg(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ListingUpdated>> {
    let pg_id = require_header_id(&headers, "pg_id")?;
    let mut form = UploadForm::read(multipart, state.config.max_upload_bytes).await?;

    let draft: Option<PgDraft> = form.json("data")?;
    let changes = ImageChanges {
        added: form.take_files("PgImages"),
        removed: form.url_list("RmImages"),
    };

    tracing::info!(
        "Updating PG {} (details: {}, +{} / -{} images)",
        pg_id,
        draft.is_some(),
        changes.added.len(),
        changes.removed.len()
    );

    let updated =
        listing_service::update_pg(&state.pool, state.images.as_ref(), pg_id, draft, changes)
            .await?;

    Ok(Json(updated))
}

/// POST /api/deletePG
/// Header `id`, optional header `target` (`pg` or `room`)
pub async fn delete_pg(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ListingDeleted>> {
    let id = require_header_id(&headers, "id")?;

    let target = match headers.get("target") {
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| ApiError::BadRequest("Invalid target header".to_string()))?;
            Some(raw.parse::<DeleteTarget>()?)
        }
        None => None,
    };

    tracing::info!("Deleting listing {} (target: {:?})", id, target);

    let deleted =
        listing_service::delete_listing(&state.pool, state.images.as_ref(), id, target).await?;

    Ok(Json(deleted))
}

/// POST /api/addRoom
/// Multipart: `data` (room JSON) and `images[]`
pub async fn add_room(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<RoomCreated>> {
    let mut form = UploadForm::read(multipart, state.config.max_upload_bytes).await?;

    let draft: RoomDraft = form
        .json("data")?
        .ok_or_else(|| ApiError::BadRequest("Room data not provided".to_string()))?;
    let images = form.take_files("images");

    tracing::info!("Adding room to PG {:?}", draft.pg_id);

    let created =
        listing_service::add_room(&state.pool, state.images.as_ref(), draft, images).await?;

    Ok(Json(created))
}

/// POST /api/updateRoom
/// Multipart: `data`, `RoomImages[]`, `RmRoomImages`
pub async fn update_room(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ListingUpdated>> {
    let mut form = UploadForm::read(multipart, state.config.max_upload_bytes).await?;

    let draft: RoomDraft = form
        .json("data")?
        .ok_or_else(|| ApiError::BadRequest("Room data not provided".to_string()))?;
    let changes = ImageChanges {
        added: form.take_files("RoomImages"),
        removed: form.url_list("RmRoomImages"),
    };

    tracing::info!(
        "Updating room {:?} of PG {:?} (+{} / -{} images)",
        draft.room_id,
        draft.pg_id,
        changes.added.len(),
        changes.removed.len()
    );

    let updated =
        listing_service::update_room(&state.pool, state.images.as_ref(), draft, changes).await?;

    Ok(Json(updated))
}
