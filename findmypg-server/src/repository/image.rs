//! Image Repository
//!
//! Image rows hold the public URL returned by the image store. PG-level
//! pictures have no `room_id`.

use sqlx::PgExecutor;

pub async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    room_id: Option<i32>,
    image_path: &str,
) -> Result<i32, sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO images (pg_id, room_id, image_path) VALUES ($1, $2, $3) RETURNING image_id",
    )
    .bind(pg_id)
    .bind(room_id)
    .bind(image_path)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// PG-level pictures, oldest first
pub async fn pg_paths<'e>(executor: impl PgExecutor<'e>, pg_id: i32) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT image_path FROM images WHERE pg_id = $1 AND room_id IS NULL ORDER BY image_id",
    )
    .bind(pg_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|(path,)| path).collect())
}

pub async fn room_paths<'e>(
    executor: impl PgExecutor<'e>,
    room_id: i32,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT image_path FROM images WHERE room_id = $1 ORDER BY image_id")
            .bind(room_id)
            .fetch_all(executor)
            .await?;

    Ok(rows.into_iter().map(|(path,)| path).collect())
}

/// Every picture of a PG, its rooms included
pub async fn all_paths_for_pg<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT image_path FROM images
        WHERE pg_id = $1 OR room_id IN (SELECT room_id FROM room WHERE pg_id = $1)
        ORDER BY image_id
        "#,
    )
    .bind(pg_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|(path,)| path).collect())
}

/// Cover picture of a PG
pub async fn first_pg_path<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT image_path FROM images
        WHERE pg_id = $1 AND room_id IS NULL
        ORDER BY image_id
        LIMIT 1
        "#,
    )
    .bind(pg_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|(path,)| path))
}

/// Remove one picture row; `room_id` None means a PG-level picture
pub async fn delete_path<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    room_id: Option<i32>,
    image_path: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM images
        WHERE image_path = $1 AND pg_id = $2 AND room_id IS NOT DISTINCT FROM $3
        "#,
    )
    .bind(image_path)
    .bind(pg_id)
    .bind(room_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_for_room<'e>(
    executor: impl PgExecutor<'e>,
    room_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM images WHERE room_id = $1")
        .bind(room_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Remove every picture row of a PG, its rooms included
pub async fn delete_for_pg<'e>(executor: impl PgExecutor<'e>, pg_id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM images
        WHERE pg_id = $1 OR room_id IN (SELECT room_id FROM room WHERE pg_id = $1)
        "#,
    )
    .bind(pg_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
