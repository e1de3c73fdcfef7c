//! Owner Repository

use findmypg_core::domain::account::Owner;
use findmypg_core::dto::account::OwnerUpdate;
use sqlx::PgExecutor;

const OWNER_COLUMNS: &str = "owner_id, name, email, mobile, password, image, \
     no_of_pg_hold, gender, aadhar_card, address_id";

/// Create an owner account linked to `address_id`
pub async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
    email: &str,
    mobile: &str,
    password: &str,
    address_id: i32,
) -> Result<i32, sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO owner (name, email, mobile, password, address_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING owner_id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(mobile)
    .bind(password)
    .bind(address_id)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

pub async fn find_by_id<'e>(
    executor: impl PgExecutor<'e>,
    owner_id: i32,
) -> Result<Option<Owner>, sqlx::Error> {
    let sql = format!("SELECT {} FROM owner WHERE owner_id = $1", OWNER_COLUMNS);
    let row = sqlx::query_as::<_, OwnerRow>(&sql)
        .bind(owner_id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_by_email<'e>(
    executor: impl PgExecutor<'e>,
    email: &str,
) -> Result<Option<Owner>, sqlx::Error> {
    let sql = format!("SELECT {} FROM owner WHERE email = $1", OWNER_COLUMNS);
    let row = sqlx::query_as::<_, OwnerRow>(&sql)
        .bind(email)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|r| r.into()))
}

/// Overwrite the editable profile fields
pub async fn update_profile<'e>(
    executor: impl PgExecutor<'e>,
    update: &OwnerUpdate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE owner
        SET name = $1, mobile = $2, email = $3, password = $4,
            no_of_pg_hold = $5, gender = $6, aadhar_card = $7
        WHERE owner_id = $8
        "#,
    )
    .bind(&update.name)
    .bind(&update.mobile)
    .bind(&update.email)
    .bind(&update.password)
    .bind(update.no_of_pg_hold)
    .bind(&update.gender)
    .bind(update.aadhar_card)
    .bind(update.owner_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_image<'e>(
    executor: impl PgExecutor<'e>,
    owner_id: i32,
    image: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE owner SET image = $1 WHERE owner_id = $2")
        .bind(image)
        .bind(owner_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Point an owner at an address (for accounts created without one)
pub async fn set_address<'e>(
    executor: impl PgExecutor<'e>,
    owner_id: i32,
    address_id: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE owner SET address_id = $1 WHERE owner_id = $2")
        .bind(address_id)
        .bind(owner_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct OwnerRow {
    owner_id: i32,
    name: String,
    email: String,
    mobile: String,
    password: String,
    image: Option<String>,
    no_of_pg_hold: Option<i32>,
    gender: Option<String>,
    aadhar_card: Option<i64>,
    address_id: Option<i32>,
}

impl From<OwnerRow> for Owner {
    fn from(row: OwnerRow) -> Self {
        Owner {
            owner_id: row.owner_id,
            name: row.name,
            email: row.email,
            mobile: row.mobile,
            password: row.password,
            image: row.image,
            no_of_pg_hold: row.no_of_pg_hold,
            gender: row.gender,
            aadhar_card: row.aadhar_card,
            address_id: row.address_id,
        }
    }
}
