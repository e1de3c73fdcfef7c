//! Room Repository

use findmypg_core::domain::listing::Room;
use findmypg_core::dto::listing::RoomDraft;
use sqlx::PgExecutor;

const ROOM_COLUMNS: &str = "room_id, pg_id, room_type, available_room, room_size, \
     person_type, gender, no_of_rooms, rent";

/// Insert a room for `pg_id`; the draft must already be validated
pub async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    draft: &RoomDraft,
) -> Result<i32, sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO room (pg_id, room_type, available_room, room_size, person_type, gender, no_of_rooms, rent)
        VALUES ($1, $2, COALESCE($3, 0), $4, $5, $6, $7, $8)
        RETURNING room_id
        "#,
    )
    .bind(pg_id)
    .bind(&draft.room_type)
    .bind(draft.available_room)
    .bind(&draft.room_size)
    .bind(&draft.person_type)
    .bind(&draft.gender)
    .bind(draft.no_of_rooms)
    .bind(draft.rent)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

pub async fn find_by_id<'e>(
    executor: impl PgExecutor<'e>,
    room_id: i32,
) -> Result<Option<Room>, sqlx::Error> {
    let sql = format!("SELECT {} FROM room WHERE room_id = $1", ROOM_COLUMNS);
    let row = sqlx::query_as::<_, RoomRow>(&sql)
        .bind(room_id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn list_for_pg<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<Vec<Room>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM room WHERE pg_id = $1 ORDER BY room_id",
        ROOM_COLUMNS
    );
    let rows = sqlx::query_as::<_, RoomRow>(&sql)
        .bind(pg_id)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Lowest and highest rent among a PG's rooms
pub async fn rent_range<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<(Option<i32>, Option<i32>), sqlx::Error> {
    sqlx::query_as("SELECT MIN(rent), MAX(rent) FROM room WHERE pg_id = $1")
        .bind(pg_id)
        .fetch_one(executor)
        .await
}

/// Update the fields present in the draft, keeping the rest
pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    room_id: i32,
    draft: &RoomDraft,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE room
        SET room_type = COALESCE($1, room_type),
            available_room = COALESCE($2, available_room),
            room_size = COALESCE($3, room_size),
            person_type = COALESCE($4, person_type),
            gender = COALESCE($5, gender),
            no_of_rooms = COALESCE($6, no_of_rooms),
            rent = COALESCE($7, rent)
        WHERE room_id = $8
        "#,
    )
    .bind(&draft.room_type)
    .bind(draft.available_room)
    .bind(&draft.room_size)
    .bind(&draft.person_type)
    .bind(&draft.gender)
    .bind(draft.no_of_rooms)
    .bind(draft.rent)
    .bind(room_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, room_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM room WHERE room_id = $1")
        .bind(room_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_for_pg<'e>(executor: impl PgExecutor<'e>, pg_id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM room WHERE pg_id = $1")
        .bind(pg_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct RoomRow {
    room_id: i32,
    pg_id: i32,
    room_type: String,
    available_room: i32,
    room_size: String,
    person_type: String,
    gender: String,
    no_of_rooms: i32,
    rent: i32,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            room_id: row.room_id,
            pg_id: row.pg_id,
            room_type: row.room_type,
            available_room: row.available_room,
            room_size: row.room_size,
            person_type: row.person_type,
            gender: row.gender,
            no_of_rooms: row.no_of_rooms,
            rent: row.rent,
        }
    }
}
