//! Saved PG Service
//!
//! A renter's shortlist of PGs.

use chrono::{DateTime, Utc};
use findmypg_core::domain::listing::price_label;
use findmypg_core::dto::saved::{SavedPgRequest, SavedPgSummary};
use sqlx::PgPool;

use crate::repository::{
    address_repository, image_repository, is_foreign_key_violation, is_unique_violation,
    room_repository, saved_repository,
};

/// Service error type
#[derive(Debug)]
pub enum SavedError {
    AlreadySaved,
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for SavedError {
    fn from(err: sqlx::Error) -> Self {
        SavedError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, SavedError>;

/// Add a PG to a renter's shortlist
pub async fn save_pg(pool: &PgPool, req: SavedPgRequest) -> Result<()> {
    let (user_id, pg_id) = ids(&req)?;

    match saved_repository::insert(pool, user_id, pg_id).await {
        Ok(()) => {}
        Err(err) if is_unique_violation(&err) => return Err(SavedError::AlreadySaved),
        Err(err) if is_foreign_key_violation(&err) => {
            return Err(SavedError::ValidationError(format!(
                "Unknown user {} or PG {}",
                user_id, pg_id
            )));
        }
        Err(err) => return Err(err.into()),
    }

    tracing::debug!("User {} saved PG {}", user_id, pg_id);
    Ok(())
}

/// Remove a PG from a renter's shortlist; false when it was not saved
pub async fn unsave_pg(pool: &PgPool, req: SavedPgRequest) -> Result<bool> {
    let (user_id, pg_id) = ids(&req)?;

    let removed = saved_repository::delete(pool, user_id, pg_id).await?;

    tracing::debug!("User {} unsaved PG {} (removed: {})", user_id, pg_id, removed);
    Ok(removed)
}

/// Ids of the PGs a renter saved
pub async fn saved_pg_ids(pool: &PgPool, user_id: i32) -> Result<Vec<i32>> {
    let ids = saved_repository::pg_ids_for_user(pool, user_id).await?;
    Ok(ids)
}

/// Shortlist cards: name, address, cover picture and price range
pub async fn saved_pg_details(pool: &PgPool, user_id: i32) -> Result<Vec<SavedPgSummary>> {
    let rows = saved_repository::list_for_user(pool, user_id).await?;
    let mut summaries = Vec::with_capacity(rows.len());

    for row in rows {
        let address = match row.address_id {
            Some(address_id) => address_repository::find_by_id(pool, address_id)
                .await?
                .map(|a| a.postal_line())
                .unwrap_or_default(),
            None => String::new(),
        };

        let image = image_repository::first_pg_path(pool, row.pg_id)
            .await?
            .unwrap_or_default();

        let (min_rent, max_rent) = room_repository::rent_range(pool, row.pg_id).await?;

        summaries.push(SavedPgSummary {
            id: row.pg_id,
            name: row.pg_name,
            address,
            image,
            price: price_label(min_rent, max_rent),
            saved_on: saved_on_label(row.saved_on),
        });
    }

    Ok(summaries)
}

/// `"May 1, 2024"`
fn saved_on_label(saved_on: DateTime<Utc>) -> String {
    saved_on.format("%B %-d, %Y").to_string()
}

fn ids(req: &SavedPgRequest) -> Result<(i32, i32)> {
    match (req.user_id, req.pg_id) {
        (Some(user_id), Some(pg_id)) => Ok((user_id, pg_id)),
        _ => Err(SavedError::ValidationError("Invalid input".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    use crate::service::listing_service::{self, DeleteTarget};
    use crate::testing;

    #[test]
    fn test_saved_on_label() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap();
        assert_eq!(saved_on_label(at), "May 1, 2024");

        let at = Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(saved_on_label(at), "December 25, 2023");
    }

    #[test]
    fn test_ids_require_both() {
        let req = SavedPgRequest {
            user_id: Some(1),
            pg_id: None,
        };
        assert!(matches!(
            ids(&req),
            Err(SavedError::ValidationError(msg)) if msg == "Invalid input"
        ));

        let req = SavedPgRequest {
            user_id: Some(1),
            pg_id: Some(2),
        };
        assert_eq!(ids(&req).unwrap(), (1, 2));
    }

    #[tokio::test]
    async fn test_saving_twice_is_reported() {
        let Some(pool) = testing::database().await else {
            return;
        };
        let dir = TempDir::new().unwrap();
        let store = testing::local_store(&dir);
        let owner_id = testing::register_owner(&pool).await;
        let user_id = testing::register_user(&pool).await;

        let pg_id = listing_service::add_pg(&pool, &store, testing::pg_draft(owner_id), vec![])
            .await
            .unwrap()
            .pg_id;
        let req = SavedPgRequest {
            user_id: Some(user_id),
            pg_id: Some(pg_id),
        };

        save_pg(&pool, req.clone()).await.unwrap();
        assert!(matches!(
            save_pg(&pool, req.clone()).await,
            Err(SavedError::AlreadySaved)
        ));
        assert_eq!(saved_pg_ids(&pool, user_id).await.unwrap(), vec![pg_id]);

        let cards = saved_pg_details(&pool, user_id).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Sunrise Residency");

        assert!(unsave_pg(&pool, req.clone()).await.unwrap());
        assert!(!unsave_pg(&pool, req).await.unwrap());

        let unknown_pg = SavedPgRequest {
            user_id: Some(user_id),
            pg_id: Some(-1),
        };
        assert!(matches!(
            save_pg(&pool, unknown_pg).await,
            Err(SavedError::ValidationError(_))
        ));

        listing_service::delete_listing(&pool, &store, pg_id, Some(DeleteTarget::Pg))
            .await
            .unwrap();
    }
}
