//! Booking API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use findmypg_core::dto::Outcome;
use findmypg_core::dto::booking::{
    BookingCreated, CreateBooking, OwnerBookings, UpdateBookingStatus, UserBookings,
};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::api::extract::{json_body, require_header_id};
use crate::service::booking_service;

/// POST /api/bookRoom
pub async fn book_room(
    State(state): State<AppState>,
    payload: Result<Json<CreateBooking>, JsonRejection>,
) -> ApiResult<Json<BookingCreated>> {
    let req = json_body(payload)?;

    let booking_id = booking_service::create_booking(&state.pool, req).await?;

    Ok(Json(BookingCreated {
        success: true,
        message: "Booking saved successfully".to_string(),
        booking_id,
    }))
}

/// GET /api/get_bookRoom
/// A renter's bookings, keyed by the `user-id` header
pub async fn get_user_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<UserBookings>> {
    let user_id = require_header_id(&headers, "user-id")?;
    tracing::debug!("Listing bookings of user {}", user_id);

    let bookings = booking_service::list_user_bookings(&state.pool, user_id).await?;

    Ok(Json(UserBookings::from_bookings(bookings)))
}

/// GET /api/get_owner_bookRoom
pub async fn get_owner_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<OwnerBookings>> {
    let owner_id = require_header_id(&headers, "owner_id")?;
    tracing::debug!("Listing bookings for owner {}", owner_id);

    let bookings = booking_service::list_owner_bookings(&state.pool, owner_id).await?;

    Ok(Json(OwnerBookings {
        success: true,
        bookings,
    }))
}

/// POST /api/update_booking_status
pub async fn update_booking_status(
    State(state): State<AppState>,
    payload: Result<Json<UpdateBookingStatus>, JsonRejection>,
) -> ApiResult<Json<Outcome>> {
    let req = json_body(payload)?;

    booking_service::update_status(&state.pool, req).await?;

    Ok(Json(Outcome::ok("Booking status updated.")))
}
