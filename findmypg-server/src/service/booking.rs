//! Booking Service
//!
//! Business logic for room bookings.

use findmypg_core::domain::booking::{Booking, DEFAULT_BOOKING_STATUS};
use findmypg_core::dto::booking::{CreateBooking, UpdateBookingStatus};
use sqlx::PgPool;

use crate::repository::booking::NewBooking;
use crate::repository::booking_repository;

/// Service error type
#[derive(Debug)]
pub enum BookingError {
    NotFound(i32),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        BookingError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;

/// Record a booking, returning its id
pub async fn create_booking(pool: &PgPool, req: CreateBooking) -> Result<i32> {
    let booking = validate_booking(req, chrono::Utc::now().date_naive())?;

    let booking_id = booking_repository::create(pool, &booking).await?;

    tracing::info!(
        "Booking {} created: user {} -> PG {} ({} to {})",
        booking_id,
        booking.user_id,
        booking.pg_id,
        booking.check_in_date,
        booking.check_out_date
    );

    Ok(booking_id)
}

/// A renter's bookings, most recent first
pub async fn list_user_bookings(pool: &PgPool, user_id: i32) -> Result<Vec<Booking>> {
    let bookings = booking_repository::list_for_user(pool, user_id).await?;
    Ok(bookings)
}

/// Bookings across all of an owner's PGs
pub async fn list_owner_bookings(pool: &PgPool, owner_id: i32) -> Result<Vec<Booking>> {
    let bookings = booking_repository::list_for_owner(pool, owner_id).await?;
    Ok(bookings)
}

/// Set a booking's status (confirmed, cancelled, ...)
pub async fn update_status(pool: &PgPool, req: UpdateBookingStatus) -> Result<()> {
    let (booking_id, status) = match (req.booking_id, req.status.as_deref().map(str::trim)) {
        (Some(id), Some(status)) if !status.is_empty() => (id, status.to_string()),
        _ => {
            return Err(BookingError::ValidationError(
                "Missing booking_id or status.".to_string(),
            ));
        }
    };

    let updated = booking_repository::update_status(pool, booking_id, &status).await?;

    if !updated {
        return Err(BookingError::NotFound(booking_id));
    }

    tracing::info!("Booking {} is now {}", booking_id, status);
    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

fn validate_booking(req: CreateBooking, today: chrono::NaiveDate) -> Result<NewBooking> {
    let (user_id, pg_id) = match (req.user_id, req.pg_id) {
        (Some(user_id), Some(pg_id)) => (user_id, pg_id),
        _ => {
            return Err(BookingError::ValidationError(
                "userId and pgId are required".to_string(),
            ));
        }
    };

    let (check_in_date, check_out_date) = match (req.check_in_date, req.check_out_date) {
        (Some(check_in), Some(check_out)) => (check_in, check_out),
        _ => {
            return Err(BookingError::ValidationError(
                "checkInDate and checkOutDate are required".to_string(),
            ));
        }
    };

    if check_out_date < check_in_date {
        return Err(BookingError::ValidationError(
            "checkOutDate cannot be before checkInDate".to_string(),
        ));
    }

    let contact = req.user_details.unwrap_or_default();

    Ok(NewBooking {
        user_id,
        pg_id,
        pg_name: req.pg_name,
        address: req.address,
        room_type: req.room_type,
        room_id: req.room_id,
        amount: req.amount,
        check_in_date,
        check_out_date,
        status: req
            .status
            .unwrap_or_else(|| DEFAULT_BOOKING_STATUS.to_string()),
        booking_date: req.booking_date.unwrap_or(today),
        user_name: contact.name,
        user_gender: contact.gender,
        user_email: contact.email,
        user_phone: contact.phone,
        special_requests: req.special_requests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> CreateBooking {
        CreateBooking {
            user_id: Some(5),
            pg_id: Some(3),
            check_in_date: Some(date(2024, 6, 1)),
            check_out_date: Some(date(2024, 9, 1)),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_status_and_booking_date() {
        let booking = validate_booking(request(), date(2024, 5, 20)).unwrap();
        assert_eq!(booking.status, "pending");
        assert_eq!(booking.booking_date, date(2024, 5, 20));
        assert_eq!(booking.user_name, None);
    }

    #[test]
    fn test_keeps_given_status() {
        let mut req = request();
        req.status = Some("confirmed".to_string());
        req.booking_date = Some(date(2024, 5, 1));
        let booking = validate_booking(req, date(2024, 5, 20)).unwrap();
        assert_eq!(booking.status, "confirmed");
        assert_eq!(booking.booking_date, date(2024, 5, 1));
    }

    #[test]
    fn test_requires_ids_and_dates() {
        let mut req = request();
        req.pg_id = None;
        assert!(matches!(
            validate_booking(req, date(2024, 5, 20)),
            Err(BookingError::ValidationError(_))
        ));

        let mut req = request();
        req.check_out_date = None;
        assert!(matches!(
            validate_booking(req, date(2024, 5, 20)),
            Err(BookingError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_reversed_dates() {
        let mut req = request();
        req.check_out_date = Some(date(2024, 5, 1));
        assert!(validate_booking(req, date(2024, 5, 20)).is_err());
    }
}
