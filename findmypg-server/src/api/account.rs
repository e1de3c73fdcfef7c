//! Account API Handlers
//!
//! Sign-up, sign-in and profile endpoints for owners and renters.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection, rejection::JsonRejection},
    http::HeaderMap,
};
use findmypg_core::dto::Ack;
use findmypg_core::dto::account::{
    LoginRequest, LoginResponse, OwnerResponse, RegisterRequest, UserResponse,
};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::api::extract::{UploadForm, json_body, require_header_id};
use crate::service::account_service;

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<Ack>> {
    let req = json_body(payload)?;
    tracing::info!("Registering {} account", req.user_type);

    let ack = account_service::register(&state.pool, req).await?;

    Ok(Json(ack))
}

/// POST /api/login
/// Wrong credentials still answer 200 with `success: false`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let req = json_body(payload)?;
    tracing::debug!("Login attempt ({})", req.user_type);

    let response = account_service::login(&state.pool, req).await?;

    Ok(Json(response))
}

/// GET /api/getOwner
pub async fn get_owner(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<OwnerResponse>> {
    let owner_id = require_header_id(&headers, "owner_id")?;

    let profile = account_service::get_owner(&state.pool, owner_id).await?;

    Ok(Json(OwnerResponse::new(profile, None)))
}

/// GET /api/getUser
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<UserResponse>> {
    let user_id = require_header_id(&headers, "user_id")?;

    let user = account_service::get_user(&state.pool, user_id).await?;

    Ok(Json(UserResponse::new(user, None)))
}

/// POST /api/updateOwner
/// Multipart profile fields plus an optional `avatar`
pub async fn update_owner(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<OwnerResponse>> {
    let mut form = UploadForm::read(multipart, state.config.max_upload_bytes).await?;

    let update = account_service::owner_update_from_form(form.fields())?;
    let avatar = form.take_files("avatar").into_iter().next();

    tracing::info!(
        "Updating owner {} (new avatar: {})",
        update.owner_id,
        avatar.is_some()
    );

    let profile =
        account_service::update_owner(&state.pool, state.images.as_ref(), update, avatar).await?;

    Ok(Json(OwnerResponse::new(
        profile,
        Some("Owner details updated successfully"),
    )))
}

/// POST /api/updateUser
/// Multipart profile fields plus an optional `avatar`
pub async fn update_user(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UserResponse>> {
    let mut form = UploadForm::read(multipart, state.config.max_upload_bytes).await?;

    let update = account_service::user_update_from_form(form.fields())?;
    let avatar = form.take_files("avatar").into_iter().next();

    tracing::info!(
        "Updating user {} (new avatar: {})",
        update.user_id,
        avatar.is_some()
    );

    let user =
        account_service::update_user(&state.pool, state.images.as_ref(), update, avatar).await?;

    Ok(Json(UserResponse::new(user, Some("User updated successfully"))))
}
