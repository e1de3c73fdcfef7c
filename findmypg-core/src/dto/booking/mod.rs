//! Booking DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::booking::Booking;

/// Booking request as sent by the room checkout page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub user_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub pg_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub pg_name: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub room_type: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub room_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::lenient::optional_date")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::lenient::optional_date")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_date")]
    pub booking_date: Option<NaiveDate>,
    #[serde(default)]
    pub user_details: Option<BookingContact>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub special_requests: Option<String>,
}

/// Renter contact details copied into the booking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingContact {
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookingStatus {
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub booking_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreated {
    pub success: bool,
    pub message: String,
    pub booking_id: i32,
}

/// A renter's bookings, or a `success: false` note when there are none
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBookings {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Booking>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UserBookings {
    pub fn from_bookings(bookings: Vec<Booking>) -> Self {
        if bookings.is_empty() {
            Self {
                success: false,
                data: None,
                message: Some("No bookings found for this user.".to_string()),
            }
        } else {
            Self {
                success: true,
                data: Some(bookings),
                message: None,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerBookings {
    pub success: bool,
    pub bookings: Vec<Booking>,
}
