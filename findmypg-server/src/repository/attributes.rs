//! Attribute Repository
//!
//! One-row-per-owner attribute tables: `pg_facilities`, `room_facilities`,
//! `rules` and `other_charges`. Rows are read back as JSON (`to_jsonb`) and
//! deserialised into the core types. Rules and charges replace the whole
//! row; facility writes only touch the flags that were sent.

use findmypg_core::domain::facility::{
    PgFacilities, PgFacilitiesPatch, RoomFacilities, RoomFacilitiesPatch,
};
use findmypg_core::domain::listing::{OtherCharges, PgRules};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use sqlx::PgExecutor;

static PG_FACILITIES_UPSERT: Lazy<String> =
    Lazy::new(|| upsert_sql("pg_facilities", "pg_id", PgFacilities::COLUMNS));

static ROOM_FACILITIES_UPSERT: Lazy<String> =
    Lazy::new(|| upsert_sql("room_facilities", "room_id", RoomFacilities::COLUMNS));

/// `INSERT ... ON CONFLICT (key) DO UPDATE` over a fixed column list of
/// flags. A NULL parameter inserts FALSE and leaves an existing value alone.
fn upsert_sql(table: &str, key: &str, columns: &[&str]) -> String {
    let values = columns
        .iter()
        .enumerate()
        .map(|(i, _)| format!("COALESCE(${}, FALSE)", i + 2))
        .collect::<Vec<_>>()
        .join(", ");

    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{c} = COALESCE(${}, {table}.{c})", i + 2))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {table} ({key}, {columns}) VALUES ($1, {values}) \
         ON CONFLICT ({key}) DO UPDATE SET {assignments}",
        columns = columns.join(", "),
    )
}

/// Fetch one row of `table` as JSON and deserialise it
async fn find_row<'e, T: DeserializeOwned>(
    executor: impl PgExecutor<'e>,
    table: &str,
    key: &str,
    id: i32,
) -> Result<Option<T>, sqlx::Error> {
    let sql = format!("SELECT to_jsonb(t) FROM {table} t WHERE t.{key} = $1");
    let row: Option<(serde_json::Value,)> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(|(value,)| serde_json::from_value(value).map_err(|e| sqlx::Error::Decode(Box::new(e))))
        .transpose()
}

// =============================================================================
// PG facilities
// =============================================================================

pub async fn find_pg_facilities<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<Option<PgFacilities>, sqlx::Error> {
    find_row(executor, "pg_facilities", "pg_id", pg_id).await
}

pub async fn upsert_pg_facilities<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    facilities: &PgFacilitiesPatch,
) -> Result<(), sqlx::Error> {
    let mut query = sqlx::query(PG_FACILITIES_UPSERT.as_str()).bind(pg_id);
    for value in facilities.values() {
        query = query.bind(value);
    }
    query.execute(executor).await?;

    Ok(())
}

pub async fn delete_pg_facilities<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pg_facilities WHERE pg_id = $1")
        .bind(pg_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Room facilities
// =============================================================================

pub async fn find_room_facilities<'e>(
    executor: impl PgExecutor<'e>,
    room_id: i32,
) -> Result<Option<RoomFacilities>, sqlx::Error> {
    find_row(executor, "room_facilities", "room_id", room_id).await
}

pub async fn upsert_room_facilities<'e>(
    executor: impl PgExecutor<'e>,
    room_id: i32,
    facilities: &RoomFacilitiesPatch,
) -> Result<(), sqlx::Error> {
    let mut query = sqlx::query(ROOM_FACILITIES_UPSERT.as_str()).bind(room_id);
    for value in facilities.values() {
        query = query.bind(value);
    }
    query.execute(executor).await?;

    Ok(())
}

pub async fn delete_room_facilities<'e>(
    executor: impl PgExecutor<'e>,
    room_id: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM room_facilities WHERE room_id = $1")
        .bind(room_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove the facility rows of every room of a PG
pub async fn delete_room_facilities_for_pg<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM room_facilities WHERE room_id IN (SELECT room_id FROM room WHERE pg_id = $1)",
    )
    .bind(pg_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// House rules
// =============================================================================

pub async fn find_rules<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<Option<PgRules>, sqlx::Error> {
    find_row(executor, "rules", "pg_id", pg_id).await
}

pub async fn upsert_rules<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    rules: &PgRules,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO rules (pg_id, visitor_allowed, non_veg, other_gender, smoking, drinking, party, gate_close_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (pg_id) DO UPDATE
        SET visitor_allowed = EXCLUDED.visitor_allowed,
            non_veg = EXCLUDED.non_veg,
            other_gender = EXCLUDED.other_gender,
            smoking = EXCLUDED.smoking,
            drinking = EXCLUDED.drinking,
            party = EXCLUDED.party,
            gate_close_time = EXCLUDED.gate_close_time
        "#,
    )
    .bind(pg_id)
    .bind(rules.visitor_allowed)
    .bind(rules.non_veg)
    .bind(rules.other_gender)
    .bind(rules.smoking)
    .bind(rules.drinking)
    .bind(rules.party)
    .bind(&rules.gate_close_time)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn delete_rules<'e>(executor: impl PgExecutor<'e>, pg_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM rules WHERE pg_id = $1")
        .bind(pg_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Other charges
// =============================================================================

pub async fn find_charges<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
) -> Result<Option<OtherCharges>, sqlx::Error> {
    find_row(executor, "other_charges", "pg_id", pg_id).await
}

pub async fn upsert_charges<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    charges: &OtherCharges,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO other_charges (pg_id, electricity, laundry, food, deposit_amount, refundable, notice_period)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (pg_id) DO UPDATE
        SET electricity = EXCLUDED.electricity,
            laundry = EXCLUDED.laundry,
            food = EXCLUDED.food,
            deposit_amount = EXCLUDED.deposit_amount,
            refundable = EXCLUDED.refundable,
            notice_period = EXCLUDED.notice_period
        "#,
    )
    .bind(pg_id)
    .bind(charges.electricity)
    .bind(charges.laundry)
    .bind(charges.food)
    .bind(charges.deposit_amount)
    .bind(charges.refundable)
    .bind(charges.notice_period)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn delete_charges<'e>(executor: impl PgExecutor<'e>, pg_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM other_charges WHERE pg_id = $1")
        .bind(pg_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_sql_shape() {
        let sql = upsert_sql("room_facilities", "room_id", &["ac", "tv"]);
        assert_eq!(
            sql,
            "INSERT INTO room_facilities (room_id, ac, tv) \
             VALUES ($1, COALESCE($2, FALSE), COALESCE($3, FALSE)) \
             ON CONFLICT (room_id) DO UPDATE SET \
             ac = COALESCE($2, room_facilities.ac), tv = COALESCE($3, room_facilities.tv)"
        );
    }

    #[test]
    fn test_pg_facilities_upsert_covers_every_column() {
        let sql = PG_FACILITIES_UPSERT.as_str();
        assert!(sql.contains("COALESCE($26, FALSE))"));
        assert!(sql.contains("dining_area = COALESCE($"));
        assert!(sql.contains("_24_x_7_electricity"));
    }

    #[test]
    fn test_rows_deserialise_from_jsonb() {
        // Shape produced by to_jsonb(row)
        let row = serde_json::json!({
            "pg_id": 4,
            "food": true,
            "dining_area": true,
            "gym": false
        });
        let facilities: PgFacilities = serde_json::from_value(row).unwrap();
        assert!(facilities.food);
        assert!(facilities.dining_area);

        let charges: OtherCharges = serde_json::from_value(serde_json::json!({
            "pg_id": 4,
            "electricity": null,
            "deposit_amount": 10000,
            "refundable": true,
            "notice_period": 30
        }))
        .unwrap();
        assert_eq!(charges.deposit_amount, Some(10000));
        assert_eq!(charges.electricity, None);
    }
}
