//! Saved PG Repository
//!
//! A renter's shortlist: one `saved_pgs` row per (user, PG) pair.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

/// Save a PG; fails with a unique violation when it is already saved
pub async fn insert<'e>(executor: impl PgExecutor<'e>, user_id: i32, pg_id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO saved_pgs (user_id, pg_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(pg_id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, user_id: i32, pg_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM saved_pgs WHERE user_id = $1 AND pg_id = $2")
        .bind(user_id)
        .bind(pg_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Forget a PG in every shortlist (used when the PG is deleted)
pub async fn delete_for_pg<'e>(executor: impl PgExecutor<'e>, pg_id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM saved_pgs WHERE pg_id = $1")
        .bind(pg_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Ids of the PGs a renter saved, most recent first
pub async fn pg_ids_for_user<'e>(executor: impl PgExecutor<'e>, user_id: i32) -> Result<Vec<i32>, sqlx::Error> {
    let rows: Vec<(i32,)> =
        sqlx::query_as("SELECT pg_id FROM saved_pgs WHERE user_id = $1 ORDER BY saved_on DESC")
            .bind(user_id)
            .fetch_all(executor)
            .await?;

    Ok(rows.into_iter().map(|(pg_id,)| pg_id).collect())
}

/// A saved PG joined with the PG row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SavedPgRow {
    pub pg_id: i32,
    pub pg_name: String,
    pub address_id: Option<i32>,
    pub saved_on: DateTime<Utc>,
}

/// Saved PGs of a renter with their names, most recent first
pub async fn list_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i32,
) -> Result<Vec<SavedPgRow>, sqlx::Error> {
    sqlx::query_as::<_, SavedPgRow>(
        r#"
        SELECT p.pg_id, p.pg_name, p.address_id, s.saved_on
        FROM saved_pgs s
        JOIN pg p ON p.pg_id = s.pg_id
        WHERE s.user_id = $1
        ORDER BY s.saved_on DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
