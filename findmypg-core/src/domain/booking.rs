//! Booking domain model
//!
//! A booking snapshots the PG name, address, and renter contact details at
//! the time it was made, so it stays readable after the PG is removed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status given to bookings created without one
pub const DEFAULT_BOOKING_STATUS: &str = "pending";

/// A room booking made by a renter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: i32,
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
