//! User Repository

use findmypg_core::domain::account::User;
use findmypg_core::dto::account::UserUpdate;
use sqlx::PgExecutor;

pub async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<i32, sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO users (name, email, phone, password)
        VALUES ($1, $2, $3, $4)
        RETURNING user_id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(password)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

pub async fn find_by_id<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i32,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT user_id, name, email, phone, password, gender, profile_image
        FROM users
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_by_email<'e>(
    executor: impl PgExecutor<'e>,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT user_id, name, email, phone, password, gender, profile_image
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Overwrite the profile; the picture is kept unless a new one is given
pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    update: &UserUpdate,
    profile_image: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = $1, phone = $2, email = $3, password = $4, gender = $5,
            profile_image = COALESCE($6, profile_image)
        WHERE user_id = $7
        "#,
    )
    .bind(&update.name)
    .bind(&update.phone)
    .bind(&update.email)
    .bind(&update.password)
    .bind(&update.gender)
    .bind(profile_image)
    .bind(update.user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i32,
    name: String,
    email: String,
    phone: String,
    password: String,
    gender: Option<String>,
    profile_image: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            password: row.password,
            gender: row.gender,
            profile_image: row.profile_image,
        }
    }
}
