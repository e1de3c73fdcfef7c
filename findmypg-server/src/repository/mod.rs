//! Repository Module
//!
//! Data access layer for the listing server.
//! Each repository handles database operations for a specific table (or a
//! small family of tables). Functions take any Postgres executor so they
//! run the same on the pool or inside a transaction.

pub mod address;
pub mod attributes;
pub mod booking;
pub mod image;
pub mod owner;
pub mod pg;
pub mod room;
pub mod saved;
pub mod user;

// Re-export for convenience
pub use address as address_repository;
pub use attributes as attribute_repository;
pub use booking as booking_repository;
pub use image as image_repository;
pub use owner as owner_repository;
pub use pg as pg_repository;
pub use room as room_repository;
pub use saved as saved_repository;
pub use user as user_repository;

/// True when the error is a unique constraint violation (duplicate email,
/// PG already saved, ...)
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Unique constraints on the `email` column of `owner` and `users`
pub const EMAIL_CONSTRAINTS: &[&str] = &["owner_email_key", "users_email_key"];

/// True when the error is a unique violation of an account email. Other
/// unique violations (a colliding primary key, say) are not duplicate emails.
pub fn is_duplicate_email(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && is_email_constraint(db_err.constraint())
        }
        _ => false,
    }
}

fn is_email_constraint(constraint: Option<&str>) -> bool {
    constraint.is_some_and(|name| EMAIL_CONSTRAINTS.contains(&name))
}

/// True when the error is a foreign key violation (unknown user or PG)
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
