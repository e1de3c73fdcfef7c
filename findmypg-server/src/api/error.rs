//! API Error Handling
//!
//! Unified error types and conversion for API responses. Error bodies carry
//! both envelope flags the web client checks:
//! `{"status": "error", "success": false, "message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use findmypg_core::dto::ERROR;

use crate::service::account::AccountError;
use crate::service::booking::BookingError;
use crate::service::listing::ListingError;
use crate::service::saved::SavedError;
use crate::storage::StorageError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    DatabaseError(sqlx::Error),
    StorageError(StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::StorageError(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::StorageError(err) => {
                tracing::error!("Image storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image upload failed".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "status": ERROR,
            "success": false,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::StorageError(err)
    }
}

impl From<ListingError> for ApiError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::NotFound(msg) => ApiError::NotFound(msg),
            ListingError::ValidationError(msg) => ApiError::BadRequest(msg),
            ListingError::DatabaseError(err) => ApiError::DatabaseError(err),
            ListingError::StorageError(err) => ApiError::StorageError(err),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(msg) => ApiError::NotFound(msg),
            AccountError::ValidationError(msg) => ApiError::BadRequest(msg),
            AccountError::DuplicateEmail => {
                ApiError::BadRequest("Email already registered".to_string())
            }
            AccountError::DatabaseError(err) => ApiError::DatabaseError(err),
            AccountError::StorageError(err) => ApiError::StorageError(err),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(id) => ApiError::NotFound(format!("Booking {} not found", id)),
            BookingError::ValidationError(msg) => ApiError::BadRequest(msg),
            BookingError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<SavedError> for ApiError {
    fn from(err: SavedError) -> Self {
        match err {
            SavedError::AlreadySaved => ApiError::BadRequest("PG already saved".to_string()),
            SavedError::ValidationError(msg) => ApiError::BadRequest(msg),
            SavedError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
