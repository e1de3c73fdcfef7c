//! Address Repository

use findmypg_core::domain::account::Address;
use sqlx::PgExecutor;

/// Insert an address; the id is taken from the sequence unless given
pub async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    address_id: Option<i32>,
    address: &Address,
) -> Result<i32, sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO address (address_id, residence_name, street, area, city, state, zip)
        VALUES (
            COALESCE($1, nextval(pg_get_serial_sequence('address', 'address_id'))::INTEGER),
            $2, $3, $4, $5, $6, $7
        )
        RETURNING address_id
        "#,
    )
    .bind(address_id)
    .bind(&address.residence_name)
    .bind(&address.street)
    .bind(&address.area)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.zip)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Move the id sequence past the largest stored id, so ids chosen by a
/// client are never handed out again
pub async fn sync_id_sequence<'e>(executor: impl PgExecutor<'e>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        SELECT setval(
            pg_get_serial_sequence('address', 'address_id'),
            GREATEST((SELECT MAX(address_id) FROM address), 1)
        )
        "#,
    )
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn find_by_id<'e>(
    executor: impl PgExecutor<'e>,
    address_id: i32,
) -> Result<Option<Address>, sqlx::Error> {
    let row = sqlx::query_as::<_, AddressRow>(
        r#"
        SELECT residence_name, street, area, city, state, zip
        FROM address
        WHERE address_id = $1
        "#,
    )
    .bind(address_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Overwrite the address a PG points at
pub async fn update_for_pg<'e>(
    executor: impl PgExecutor<'e>,
    pg_id: i32,
    address: &Address,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE address
        SET residence_name = $1, street = $2, area = $3, city = $4, state = $5, zip = $6
        WHERE address_id = (SELECT address_id FROM pg WHERE pg_id = $7)
        "#,
    )
    .bind(&address.residence_name)
    .bind(&address.street)
    .bind(&address.area)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.zip)
    .bind(pg_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Overwrite the address an owner points at
pub async fn update_for_owner<'e>(
    executor: impl PgExecutor<'e>,
    owner_id: i32,
    address: &Address,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE address
        SET residence_name = $1, street = $2, area = $3, city = $4, state = $5, zip = $6
        WHERE address_id = (SELECT address_id FROM owner WHERE owner_id = $7)
        "#,
    )
    .bind(&address.residence_name)
    .bind(&address.street)
    .bind(&address.area)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.zip)
    .bind(owner_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, address_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM address WHERE address_id = $1")
        .bind(address_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
pub(crate) struct AddressRow {
    pub residence_name: String,
    pub street: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            residence_name: row.residence_name,
            street: row.street,
            area: row.area,
            city: row.city,
            state: row.state,
            zip: row.zip,
        }
    }
}
