//! PG Repository
//!
//! Handles all database operations on the `pg` table.

use chrono::NaiveDate;
use findmypg_core::domain::listing::Pg;
use sqlx::PgExecutor;

/// Fields of a new PG row
#[derive(Debug, Clone)]
pub struct NewPg<'a> {
    pub pg_id: Option<i32>,
    pub owner_id: i32,
    pub pg_name: &'a str,
    pub address_id: i32,
    pub map_location: Option<&'a str>,
    pub description: Option<&'a str>,
    pub operating_since: Option<NaiveDate>,
}

/// Insert a PG; the id is taken from the sequence unless given
pub async fn insert<'e>(executor: impl PgExecutor<'e>, pg: NewPg<'_>) -> Result<i32, sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO pg (pg_id, owner_id, pg_name, address_id, map_location, description, operating_since)
        VALUES (
            COALESCE($1, nextval(pg_get_serial_sequence('pg', 'pg_id'))::INTEGER),
            $2, $3, $4, $5, $6, $7
        )
        RETURNING pg_id
        "#,
    )
    .bind(pg.pg_id)
    .bind(pg.owner_id)
    .bind(pg.pg_name)
    .bind(pg.address_id)
    .bind(pg.map_location)
    .bind(pg.description)
    .bind(pg.operating_since)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Move the id sequence past the largest stored id
pub async fn sync_id_sequence<'e>(executor: impl PgExecutor<'e>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        SELECT setval(
            pg_get_serial_sequence('pg', 'pg_id'),
            GREATEST((SELECT MAX(pg_id) FROM pg), 1)
        )
        "#,
    )
    .execute(executor)
    .await?;

    Ok(())
}

/// Point a PG at an address (for PGs whose address row is gone)
pub async fn set_address<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    address_id: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE pg SET address_id = $1 WHERE pg_id = $2")
        .bind(address_id)
        .bind(pg_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Find a PG by ID
pub async fn find_by_id<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<Option<Pg>, sqlx::Error> {
    let row = sqlx::query_as::<_, PgRow>(
        r#"
        SELECT pg_id, owner_id, pg_name, address_id, map_location, description, operating_since
        FROM pg
        WHERE pg_id = $1
        "#,
    )
    .bind(pg_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all PGs
pub async fn list_all<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Pg>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PgRow>(
        r#"
        SELECT pg_id, owner_id, pg_name, address_id, map_location, description, operating_since
        FROM pg
        ORDER BY pg_id
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// PGs matching every filter that is given
pub async fn list_filtered<'e>(
    executor: impl PgExecutor<'e>,
    owner_id: Option<i32>,
    pg_id: Option<i32>,
) -> Result<Vec<Pg>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PgRow>(
        r#"
        SELECT pg_id, owner_id, pg_name, address_id, map_location, description, operating_since
        FROM pg
        WHERE ($1::INTEGER IS NULL OR owner_id = $1)
          AND ($2::INTEGER IS NULL OR pg_id = $2)
        ORDER BY pg_id
        "#,
    )
    .bind(owner_id)
    .bind(pg_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Update the descriptive fields; name and map link are kept when absent
pub async fn update_details<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    pg_name: Option<&str>,
    description: Option<&str>,
    operating_since: Option<NaiveDate>,
    map_location: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE pg
        SET pg_name = COALESCE($1, pg_name),
            description = $2,
            operating_since = $3,
            map_location = COALESCE($4, map_location)
        WHERE pg_id = $5
        "#,
    )
    .bind(pg_name)
    .bind(description)
    .bind(operating_since)
    .bind(map_location)
    .bind(pg_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a PG row, returning the address it pointed at
pub async fn delete<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<Option<Option<i32>>, sqlx::Error> {
    let row: Option<(Option<i32>,)> =
        sqlx::query_as("DELETE FROM pg WHERE pg_id = $1 RETURNING address_id")
            .bind(pg_id)
            .fetch_optional(executor)
            .await?;

    Ok(row.map(|(address_id,)| address_id))
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PgRow {
    pg_id: i32,
    owner_id: i32,
    pg_name: String,
    address_id: Option<i32>,
    map_location: Option<String>,
    description: Option<String>,
    operating_since: Option<NaiveDate>,
}

impl From<PgRow> for Pg {
    fn from(row: PgRow) -> Self {
        Pg {
            pg_id: row.pg_id,
            owner_id: row.owner_id,
            pg_name: row.pg_name,
            address_id: row.address_id,
            map_location: row.map_location,
            description: row.description,
            operating_since: row.operating_since,
        }
    }
}
