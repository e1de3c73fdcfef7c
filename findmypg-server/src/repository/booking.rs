//! Booking Repository
//!
//! Handles all database operations related to bookings.

use chrono::NaiveDate;
use findmypg_core::domain::booking::Booking;
use sqlx::PgExecutor;

const BOOKING_COLUMNS: &str = "b.booking_id, b.user_id, b.pg_id, b.pg_name, b.address, \
     b.room_type, b.room_id, b.amount, b.check_in_date, b.check_out_date, b.status, \
     b.booking_date, b.user_name, b.user_gender, b.user_email, b.user_phone, b.special_requests";

/// A validated booking, ready to insert
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i32,
    pub pg_id: i32,
    pub pg_name: Option<String>,
    pub address: Option<String>,
    pub room_type: Option<String>,
    pub room_id: Option<i32>,
    pub amount: Option<f64>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: String,
    pub booking_date: NaiveDate,
    pub user_name: Option<String>,
    pub user_gender: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
}

/// Create a booking
pub async fn create<'e>(executor: impl PgExecutor<'e>, booking: &NewBooking) -> Result<i32, sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO bookings (
            user_id, pg_id, pg_name, address, room_type, room_id, amount,
            check_in_date, check_out_date, status, booking_date,
            user_name, user_gender, user_email, user_phone, special_requests
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING booking_id
        "#,
    )
    .bind(booking.user_id)
    .bind(booking.pg_id)
    .bind(&booking.pg_name)
    .bind(&booking.address)
    .bind(&booking.room_type)
    .bind(booking.room_id)
    .bind(booking.amount)
    .bind(booking.check_in_date)
    .bind(booking.check_out_date)
    .bind(&booking.status)
    .bind(booking.booking_date)
    .bind(&booking.user_name)
    .bind(&booking.user_gender)
    .bind(&booking.user_email)
    .bind(&booking.user_phone)
    .bind(&booking.special_requests)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// A renter's bookings, most recent first
pub async fn list_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i32,
) -> Result<Vec<Booking>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM bookings b WHERE b.user_id = $1 \
         ORDER BY b.booking_date DESC, b.booking_id DESC",
        BOOKING_COLUMNS
    );
    let rows = sqlx::query_as::<_, BookingRow>(&sql)
        .bind(user_id)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Bookings made for any PG of an owner, most recent first
pub async fn list_for_owner<'e>(
    executor: impl PgExecutor<'e>,
    owner_id: i32,
) -> Result<Vec<Booking>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM bookings b JOIN pg p ON p.pg_id = b.pg_id WHERE p.owner_id = $1 \
         ORDER BY b.booking_date DESC, b.booking_id DESC",
        BOOKING_COLUMNS
    );
    let rows = sqlx::query_as::<_, BookingRow>(&sql)
        .bind(owner_id)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Update booking status
pub async fn update_status<'e>(
    executor: impl PgExecutor<'e>,
    booking_id: i32,
    status: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE bookings SET status = $1 WHERE booking_id = $2")
        .bind(status)
        .bind(booking_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct BookingRow {
    booking_id: i32,
    user_id: i32,
    pg_id: i32,
    pg_name: Option<String>,
    address: Option<String>,
    room_type: Option<String>,
    room_id: Option<i32>,
    amount: Option<f64>,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    status: String,
    booking_date: NaiveDate,
    user_name: Option<String>,
    user_gender: Option<String>,
    user_email: Option<String>,
    user_phone: Option<String>,
    special_requests: Option<String>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            booking_id: row.booking_id,
            user_id: row.user_id,
            pg_id: row.pg_id,
            pg_name: row.pg_name,
            address: row.address,
            room_type: row.room_type,
            room_id: row.room_id,
            amount: row.amount,
            check_in_date: row.check_in_date,
            check_out_date: row.check_out_date,
            status: row.status,
            booking_date: row.booking_date,
            user_name: row.user_name,
            user_gender: row.user_gender,
            user_email: row.user_email,
            user_phone: row.user_phone,
            special_requests: row.special_requests,
        }
    }
}
