//! Service Module
//!
//! Business logic layer for the listing server.
//! Services validate requests, run multi-statement work in transactions,
//! and keep stored images in step with the rows that reference them.

pub mod account;
pub mod booking;
pub mod listing;
pub mod saved;

// Re-export for convenience
pub use account as account_service;
pub use booking as booking_service;
pub use listing as listing_service;
pub use saved as saved_service;
