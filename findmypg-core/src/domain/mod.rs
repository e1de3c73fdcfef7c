//! Core domain types
//!
//! Rows of the listing database as the service reads them. The server
//! persists these, and the API serialises them into its responses.

pub mod account;
pub mod booking;
pub mod facility;
pub mod listing;
