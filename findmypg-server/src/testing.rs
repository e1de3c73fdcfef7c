//! Database fixtures for service tests
//!
//! Tests that need Postgres call [`database`] and return early when neither
//! `TEST_DATABASE_URL` nor `DATABASE_URL` is set. Accounts get fresh emails
//! so tests can share one database.

use std::path::Path;

use findmypg_core::dto::account::RegisterRequest;
use findmypg_core::dto::listing::PgDraft;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::db;
use crate::repository::{owner_repository, user_repository};
use crate::service::account_service;
use crate::storage::UploadedImage;
use crate::storage::local::LocalImageStore;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Pool on the test database with the schema in place
pub async fn database() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    MIGRATED
        .get_or_init(|| async {
            db::run_migrations(&pool)
                .await
                .expect("Failed to run migrations");
        })
        .await;

    Some(pool)
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@test.findmypg", prefix, Uuid::new_v4())
}

fn registration(user_type: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        user_type: user_type.to_string(),
        name: Some("Test Account".to_string()),
        email: Some(email.to_string()),
        password: Some("secret".to_string()),
        phone: Some("9999999999".to_string()),
    }
}

pub async fn register_owner(pool: &PgPool) -> i32 {
    let email = unique_email("owner");
    account_service::register(pool, registration("owner", &email))
        .await
        .unwrap();

    owner_repository::find_by_email(pool, &email)
        .await
        .unwrap()
        .unwrap()
        .owner_id
}

pub async fn register_user(pool: &PgPool) -> i32 {
    let email = unique_email("user");
    account_service::register(pool, registration("user", &email))
        .await
        .unwrap();

    user_repository::find_by_email(pool, &email)
        .await
        .unwrap()
        .unwrap()
        .user_id
}

pub fn pg_draft(owner_id: i32) -> PgDraft {
    PgDraft {
        owner_id: Some(owner_id),
        pg_name: Some("Sunrise Residency".to_string()),
        residence_name: Some("Sunrise".to_string()),
        street: Some("MG Road".to_string()),
        area: Some("Kothrud".to_string()),
        city: Some("Pune".to_string()),
        state: Some("Maharashtra".to_string()),
        zip: Some("411038".to_string()),
        ..Default::default()
    }
}

pub fn local_store(dir: &TempDir) -> LocalImageStore {
    LocalImageStore::new(dir.path().to_path_buf(), "http://localhost:8080")
}

pub fn image(name: &str) -> UploadedImage {
    UploadedImage {
        file_name: name.to_string(),
        content_type: Some("image/jpeg".to_string()),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

/// Files stored under `root`, in any folder
pub fn stored_files(root: &Path) -> usize {
    let Ok(folders) = std::fs::read_dir(root) else {
        return 0;
    };

    folders
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| std::fs::read_dir(entry.path()).ok())
        .map(|files| files.count())
        .sum()
}

/// Rows of `table` whose `column` equals `id`
pub async fn count_rows(pool: &PgPool, table: &str, column: &str, id: i32) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1");
    let (count,): (i64,) = sqlx::query_as(&sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

/// The id a sequence-backed insert into `table` would get next
pub async fn next_serial(pool: &PgPool, table: &str, column: &str) -> i32 {
    let sql = format!("SELECT last_value, is_called FROM {table}_{column}_seq");
    let (last, called): (i64, bool) = sqlx::query_as(&sql).fetch_one(pool).await.unwrap();
    (if called { last + 1 } else { last }) as i32
}
