//! Listing Service
//!
//! Business logic for PGs and rooms: the public catalogue, an owner's
//! listings, and adding, updating and deleting listings together with
//! their pictures.

use findmypg_core::domain::listing::Pg;
use findmypg_core::dto::SUCCESS;
use findmypg_core::dto::listing::{
    ListingDeleted, ListingUpdated, PgAttributes, PgCreated, PgDraft, PgListing, RoomCreated,
    RoomDraft, RoomListing,
};
use sqlx::{PgConnection, PgPool};

use crate::repository::pg::NewPg;
use crate::repository::{
    address_repository, attribute_repository, image_repository, owner_repository, pg_repository,
    room_repository, saved_repository,
};
use crate::storage::{self, ImageFolder, ImageStore, StorageError, UploadedImage};

/// Service error type
#[derive(Debug)]
pub enum ListingError {
    NotFound(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
    StorageError(StorageError),
}

impl From<sqlx::Error> for ListingError {
    fn from(err: sqlx::Error) -> Self {
        ListingError::DatabaseError(err)
    }
}

impl From<StorageError> for ListingError {
    fn from(err: StorageError) -> Self {
        ListingError::StorageError(err)
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;

/// What a delete request removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Pg,
    Room,
}

impl std::str::FromStr for DeleteTarget {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pg" => Ok(DeleteTarget::Pg),
            "room" => Ok(DeleteTarget::Room),
            other => Err(ListingError::ValidationError(format!(
                "Unknown delete target '{}' (expected pg or room)",
                other
            ))),
        }
    }
}

/// Picture changes requested by an update
#[derive(Debug, Default)]
pub struct ImageChanges {
    pub added: Vec<UploadedImage>,
    /// URLs of pictures to drop
    pub removed: Vec<String>,
}

// =============================================================================
// Reading
// =============================================================================

/// Every PG with its owner's public profile
pub async fn list_catalogue(pool: &PgPool) -> Result<Vec<PgListing>> {
    let pgs = pg_repository::list_all(pool).await?;
    let mut listings = Vec::with_capacity(pgs.len());

    for pg in pgs {
        let owner = owner_repository::find_by_id(pool, pg.owner_id).await?;
        listings.push(load_listing(pool, pg).await?.with_owner(owner));
    }

    tracing::debug!("Loaded {} listings", listings.len());
    Ok(listings)
}

/// PGs filtered by owner, by id, or both
pub async fn list_pgs(
    pool: &PgPool,
    owner_id: Option<i32>,
    pg_id: Option<i32>,
) -> Result<Vec<PgListing>> {
    if owner_id.is_none() && pg_id.is_none() {
        return Err(ListingError::ValidationError(
            "Invalid or missing owner_id or pg_id".to_string(),
        ));
    }

    let pgs = pg_repository::list_filtered(pool, owner_id, pg_id).await?;
    let mut listings = Vec::with_capacity(pgs.len());

    for pg in pgs {
        listings.push(load_listing(pool, pg).await?);
    }

    Ok(listings)
}

async fn load_listing(pool: &PgPool, pg: Pg) -> Result<PgListing> {
    let location = match pg.address_id {
        Some(address_id) => address_repository::find_by_id(pool, address_id).await?,
        None => None,
    };

    let images = image_repository::pg_paths(pool, pg.pg_id).await?;

    let attributes = PgAttributes {
        facilities: attribute_repository::find_pg_facilities(pool, pg.pg_id).await?,
        rules: attribute_repository::find_rules(pool, pg.pg_id).await?,
        charges: attribute_repository::find_charges(pool, pg.pg_id).await?,
    };

    let rooms = room_repository::list_for_pg(pool, pg.pg_id).await?;
    let mut room_listings = Vec::with_capacity(rooms.len());
    for room in rooms {
        let images = image_repository::room_paths(pool, room.room_id).await?;
        let room_facilities = attribute_repository::find_room_facilities(pool, room.room_id).await?;
        room_listings.push(RoomListing {
            room,
            images,
            room_facilities,
        });
    }

    Ok(PgListing::assemble(
        pg,
        location,
        images,
        attributes,
        room_listings,
    ))
}

// =============================================================================
// PGs
// =============================================================================

/// List a new PG
///
/// Pictures are stored first; if the database work then fails they are
/// removed again.
pub async fn add_pg(
    pool: &PgPool,
    store: &dyn ImageStore,
    draft: PgDraft,
    images: Vec<UploadedImage>,
) -> Result<PgCreated> {
    let (owner_id, pg_name) = validate_new_pg(&draft)?;

    owner_repository::find_by_id(pool, owner_id)
        .await?
        .ok_or_else(|| ListingError::NotFound(format!("Owner {} not found", owner_id)))?;

    let uploaded = storage::store_all(store, ImageFolder::PgImages, &images).await?;

    let pg_id = match insert_pg(pool, &draft, owner_id, &pg_name, &uploaded).await {
        Ok(pg_id) => pg_id,
        Err(e) => {
            storage::discard(store, &uploaded).await;
            return Err(e);
        }
    };

    tracing::info!("PG created: {} ({})", pg_name, pg_id);

    Ok(PgCreated {
        status: SUCCESS.to_string(),
        message: "PG details inserted successfully".to_string(),
        pg_id,
        uploaded_images: uploaded,
    })
}

async fn insert_pg(
    pool: &PgPool,
    draft: &PgDraft,
    owner_id: i32,
    pg_name: &str,
    images: &[String],
) -> Result<i32> {
    let mut tx = pool.begin().await?;

    let address_id = address_repository::insert(&mut *tx, draft.address_id, &draft.address()).await?;
    if draft.address_id.is_some() {
        address_repository::sync_id_sequence(&mut *tx).await?;
    }

    let pg_id = pg_repository::insert(
        &mut *tx,
        NewPg {
            pg_id: draft.pg_id,
            owner_id,
            pg_name,
            address_id,
            map_location: draft.map_location.as_deref(),
            description: draft.description.as_deref(),
            operating_since: draft.operating_since,
        },
    )
    .await?;
    if draft.pg_id.is_some() {
        pg_repository::sync_id_sequence(&mut *tx).await?;
    }

    for url in images {
        image_repository::insert(&mut *tx, pg_id, None, url).await?;
    }

    if let Some(facilities) = &draft.pg_facilities {
        attribute_repository::upsert_pg_facilities(&mut *tx, pg_id, facilities).await?;
    }

    if let Some(rules) = &draft.rules_in_pg {
        attribute_repository::upsert_rules(&mut *tx, pg_id, rules).await?;
    }

    if let Some(charges) = &draft.other_charges {
        attribute_repository::upsert_charges(&mut *tx, pg_id, &charges.zero_filled()).await?;
    }

    tx.commit().await?;
    Ok(pg_id)
}

/// Update a PG's details and pictures
///
/// `draft` is None when only pictures change. Stored files of removed
/// pictures are deleted after the transaction commits.
pub async fn update_pg(
    pool: &PgPool,
    store: &dyn ImageStore,
    pg_id: i32,
    draft: Option<PgDraft>,
    images: ImageChanges,
) -> Result<ListingUpdated> {
    pg_repository::find_by_id(pool, pg_id)
        .await?
        .ok_or_else(|| ListingError::NotFound(format!("PG {} not found", pg_id)))?;

    let uploaded = storage::store_all(store, ImageFolder::PgImages, &images.added).await?;

    let removed = match apply_pg_update(pool, pg_id, draft.as_ref(), &uploaded, &images.removed).await
    {
        Ok(removed) => removed,
        Err(e) => {
            storage::discard(store, &uploaded).await;
            return Err(e);
        }
    };

    storage::discard(store, &removed).await;

    tracing::info!(
        "PG {} updated ({} images added, {} removed)",
        pg_id,
        uploaded.len(),
        removed.len()
    );

    Ok(ListingUpdated {
        status: SUCCESS.to_string(),
        message: draft.map(|_| "PG details updated successfully".to_string()),
        uploaded_images: (!uploaded.is_empty()).then_some(uploaded),
        deleted: (!images.removed.is_empty()).then_some(removed),
    })
}

/// Returns the URLs whose rows were removed
async fn apply_pg_update(
    pool: &PgPool,
    pg_id: i32,
    draft: Option<&PgDraft>,
    uploaded: &[String],
    removed: &[String],
) -> Result<Vec<String>> {
    let mut tx = pool.begin().await?;

    for url in uploaded {
        image_repository::insert(&mut *tx, pg_id, None, url).await?;
    }

    let dropped = remove_image_rows(&mut tx, pg_id, None, removed).await?;

    if let Some(draft) = draft {
        if !address_repository::update_for_pg(&mut *tx, pg_id, &draft.address()).await? {
            tracing::warn!("PG {} has no address row, creating one", pg_id);
            let address_id = address_repository::insert(&mut *tx, None, &draft.address()).await?;
            pg_repository::set_address(&mut *tx, pg_id, address_id).await?;
        }

        pg_repository::update_details(
            &mut *tx,
            pg_id,
            draft.pg_name.as_deref(),
            draft.description.as_deref(),
            draft.operating_since,
            draft.map_location.as_deref(),
        )
        .await?;

        if let Some(facilities) = &draft.pg_facilities {
            attribute_repository::upsert_pg_facilities(&mut *tx, pg_id, facilities).await?;
        }

        if let Some(rules) = &draft.rules_in_pg {
            attribute_repository::upsert_rules(&mut *tx, pg_id, rules).await?;
        }

        if let Some(charges) = &draft.other_charges {
            attribute_repository::upsert_charges(&mut *tx, pg_id, charges).await?;
        }
    }

    tx.commit().await?;
    Ok(dropped)
}

async fn remove_image_rows(
    conn: &mut PgConnection,
    pg_id: i32,
    room_id: Option<i32>,
    urls: &[String],
) -> Result<Vec<String>> {
    let mut dropped = Vec::with_capacity(urls.len());

    for url in urls {
        if image_repository::delete_path(&mut *conn, pg_id, room_id, url).await? {
            dropped.push(url.clone());
        } else {
            tracing::warn!("Image {} is not part of PG {}, skipping", url, pg_id);
        }
    }

    Ok(dropped)
}

/// Delete a PG or a single room, with everything that hangs off it
///
/// Without an explicit target the id is taken as a room when room pictures
/// exist for it, and as a PG otherwise.
pub async fn delete_listing(
    pool: &PgPool,
    store: &dyn ImageStore,
    id: i32,
    target: Option<DeleteTarget>,
) -> Result<ListingDeleted> {
    let target = match target {
        Some(target) => target,
        None => {
            if image_repository::room_paths(pool, id).await?.is_empty() {
                DeleteTarget::Pg
            } else {
                DeleteTarget::Room
            }
        }
    };

    let (urls, message) = match target {
        DeleteTarget::Room => {
            room_repository::find_by_id(pool, id)
                .await?
                .ok_or_else(|| ListingError::NotFound(format!("Room {} not found", id)))?;

            let urls = image_repository::room_paths(pool, id).await?;
            delete_room_rows(pool, id).await?;
            (urls, format!("Room with ID {} deleted successfully.", id))
        }
        DeleteTarget::Pg => {
            pg_repository::find_by_id(pool, id)
                .await?
                .ok_or_else(|| ListingError::NotFound(format!("PG {} not found", id)))?;

            let urls = image_repository::all_paths_for_pg(pool, id).await?;
            delete_pg_rows(pool, id).await?;
            (urls, format!("PG with ID {} deleted successfully.", id))
        }
    };

    let (images_deleted, failed_image_deletions) = storage::discard(store, &urls).await;

    tracing::info!(
        "{} ({} images removed, {} failed)",
        message,
        images_deleted,
        failed_image_deletions
    );

    Ok(ListingDeleted {
        status: SUCCESS.to_string(),
        message,
        images_deleted,
        failed_image_deletions,
    })
}

async fn delete_room_rows(pool: &PgPool, room_id: i32) -> Result<()> {
    let mut tx = pool.begin().await?;

    image_repository::delete_for_room(&mut *tx, room_id).await?;
    attribute_repository::delete_room_facilities(&mut *tx, room_id).await?;
    room_repository::delete(&mut *tx, room_id).await?;

    tx.commit().await?;
    Ok(())
}

async fn delete_pg_rows(pool: &PgPool, pg_id: i32) -> Result<()> {
    let mut tx = pool.begin().await?;

    image_repository::delete_for_pg(&mut *tx, pg_id).await?;
    saved_repository::delete_for_pg(&mut *tx, pg_id).await?;
    attribute_repository::delete_room_facilities_for_pg(&mut *tx, pg_id).await?;
    room_repository::delete_for_pg(&mut *tx, pg_id).await?;
    attribute_repository::delete_pg_facilities(&mut *tx, pg_id).await?;
    attribute_repository::delete_rules(&mut *tx, pg_id).await?;
    attribute_repository::delete_charges(&mut *tx, pg_id).await?;

    if let Some(Some(address_id)) = pg_repository::delete(&mut *tx, pg_id).await? {
        address_repository::delete(&mut *tx, address_id).await?;
    }

    tx.commit().await?;
    Ok(())
}

// =============================================================================
// Rooms
// =============================================================================

/// Add a room type to a PG
pub async fn add_room(
    pool: &PgPool,
    store: &dyn ImageStore,
    draft: RoomDraft,
    images: Vec<UploadedImage>,
) -> Result<RoomCreated> {
    let pg_id = validate_new_room(&draft)?;

    pg_repository::find_by_id(pool, pg_id)
        .await?
        .ok_or_else(|| ListingError::NotFound(format!("PG {} not found", pg_id)))?;

    let uploaded = storage::store_all(store, ImageFolder::RoomImages, &images).await?;

    let room_id = match insert_room(pool, pg_id, &draft, &uploaded).await {
        Ok(room_id) => room_id,
        Err(e) => {
            storage::discard(store, &uploaded).await;
            return Err(e);
        }
    };

    tracing::info!("Room {} added to PG {}", room_id, pg_id);

    Ok(RoomCreated {
        status: SUCCESS.to_string(),
        message: "Room details added successfully".to_string(),
        room_id,
        uploaded_images: uploaded,
    })
}

async fn insert_room(pool: &PgPool, pg_id: i32, draft: &RoomDraft, images: &[String]) -> Result<i32> {
    let mut tx = pool.begin().await?;

    let room_id = room_repository::insert(&mut *tx, pg_id, draft).await?;

    let facilities = draft.room_facilities.clone().unwrap_or_default();
    attribute_repository::upsert_room_facilities(&mut *tx, room_id, &facilities).await?;

    for url in images {
        image_repository::insert(&mut *tx, pg_id, Some(room_id), url).await?;
    }

    tx.commit().await?;
    Ok(room_id)
}

/// Update a room's details and pictures
pub async fn update_room(
    pool: &PgPool,
    store: &dyn ImageStore,
    draft: RoomDraft,
    images: ImageChanges,
) -> Result<ListingUpdated> {
    let (pg_id, room_id) = match (draft.pg_id, draft.room_id) {
        (Some(pg_id), Some(room_id)) => (pg_id, room_id),
        _ => {
            return Err(ListingError::ValidationError(
                "PG ID or Room ID not provided".to_string(),
            ));
        }
    };

    let room = room_repository::find_by_id(pool, room_id)
        .await?
        .ok_or_else(|| ListingError::NotFound(format!("Room {} not found", room_id)))?;

    if room.pg_id != pg_id {
        return Err(ListingError::ValidationError(format!(
            "Room {} does not belong to PG {}",
            room_id, pg_id
        )));
    }

    let uploaded = storage::store_all(store, ImageFolder::RoomImages, &images.added).await?;

    let removed =
        match apply_room_update(pool, pg_id, room_id, &draft, &uploaded, &images.removed).await {
            Ok(removed) => removed,
            Err(e) => {
                storage::discard(store, &uploaded).await;
                return Err(e);
            }
        };

    storage::discard(store, &removed).await;

    tracing::info!("Room {} of PG {} updated", room_id, pg_id);

    Ok(ListingUpdated {
        status: SUCCESS.to_string(),
        message: Some("Room details updated successfully".to_string()),
        uploaded_images: (!uploaded.is_empty()).then_some(uploaded),
        deleted: (!images.removed.is_empty()).then_some(removed),
    })
}

async fn apply_room_update(
    pool: &PgPool,
    pg_id: i32,
    room_id: i32,
    draft: &RoomDraft,
    uploaded: &[String],
    removed: &[String],
) -> Result<Vec<String>> {
    let mut tx = pool.begin().await?;

    room_repository::update(&mut *tx, room_id, draft).await?;

    if let Some(facilities) = &draft.room_facilities {
        attribute_repository::upsert_room_facilities(&mut *tx, room_id, facilities).await?;
    }

    for url in uploaded {
        image_repository::insert(&mut *tx, pg_id, Some(room_id), url).await?;
    }

    let dropped = remove_image_rows(&mut tx, pg_id, Some(room_id), removed).await?;

    tx.commit().await?;
    Ok(dropped)
}

// =============================================================================
// Validation
// =============================================================================

fn validate_new_pg(draft: &PgDraft) -> Result<(i32, String)> {
    let owner_id = draft.owner_id.ok_or_else(|| {
        ListingError::ValidationError("owner_id is required".to_string())
    })?;

    let pg_name = draft
        .pg_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ListingError::ValidationError("pg_name is required".to_string()))?;

    if pg_name.len() > 255 {
        return Err(ListingError::ValidationError(
            "PG name is too long (max 255 characters)".to_string(),
        ));
    }

    Ok((owner_id, pg_name.to_string()))
}

fn validate_new_room(draft: &RoomDraft) -> Result<i32> {
    let missing = || ListingError::ValidationError("Missing required fields".to_string());

    let pg_id = draft.pg_id.ok_or_else(missing)?;

    let text_present = [
        &draft.room_type,
        &draft.room_size,
        &draft.person_type,
        &draft.gender,
    ]
    .iter()
    .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()));

    // Zero rooms or zero rent count as missing
    let numbers_present = [draft.no_of_rooms, draft.rent]
        .iter()
        .all(|field| field.is_some_and(|v| v != 0));

    if !text_present || !numbers_present {
        return Err(missing());
    }

    Ok(pg_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use findmypg_core::dto::saved::SavedPgRequest;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::service::saved_service;
    use crate::testing::{self, count_rows, stored_files};

    fn room_draft() -> RoomDraft {
        serde_json::from_value(json!({
            "pg_id": 3,
            "room_type": "Double",
            "room_size": "120 sqft",
            "person_type": "Student",
            "gender": "Female",
            "no_of_rooms": "4",
            "rent": 6500
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_new_pg_requires_owner_and_name() {
        let draft = PgDraft {
            pg_name: Some("Sunrise".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_new_pg(&draft),
            Err(ListingError::ValidationError(_))
        ));

        let draft = PgDraft {
            owner_id: Some(1),
            pg_name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_new_pg(&draft),
            Err(ListingError::ValidationError(_))
        ));

        let draft = PgDraft {
            owner_id: Some(1),
            pg_name: Some(" Sunrise ".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_new_pg(&draft).unwrap(), (1, "Sunrise".to_string()));
    }

    #[test]
    fn test_validate_new_room() {
        assert_eq!(validate_new_room(&room_draft()).unwrap(), 3);

        let mut draft = room_draft();
        draft.gender = None;
        assert!(matches!(
            validate_new_room(&draft),
            Err(ListingError::ValidationError(msg)) if msg == "Missing required fields"
        ));

        let mut draft = room_draft();
        draft.rent = Some(0);
        assert!(validate_new_room(&draft).is_err());

        let mut draft = room_draft();
        draft.pg_id = None;
        assert!(validate_new_room(&draft).is_err());
    }

    #[test]
    fn test_delete_target_from_str() {
        assert_eq!("PG".parse::<DeleteTarget>().unwrap(), DeleteTarget::Pg);
        assert_eq!(" room ".parse::<DeleteTarget>().unwrap(), DeleteTarget::Room);
        assert!("bed".parse::<DeleteTarget>().is_err());
    }

    #[tokio::test]
    async fn test_client_chosen_ids_move_the_sequences() {
        let Some(pool) = testing::database().await else {
            return;
        };
        let dir = TempDir::new().unwrap();
        let store = testing::local_store(&dir);
        let owner_id = testing::register_owner(&pool).await;

        let pg_id = testing::next_serial(&pool, "pg", "pg_id").await + 1000;
        let address_id = testing::next_serial(&pool, "address", "address_id").await + 1000;
        let draft = PgDraft {
            pg_id: Some(pg_id),
            address_id: Some(address_id),
            ..testing::pg_draft(owner_id)
        };

        let chosen = add_pg(&pool, &store, draft, vec![]).await.unwrap();
        assert_eq!(chosen.pg_id, pg_id);
        assert!(testing::next_serial(&pool, "pg", "pg_id").await > pg_id);
        assert!(testing::next_serial(&pool, "address", "address_id").await > address_id);

        let assigned = add_pg(&pool, &store, testing::pg_draft(owner_id), vec![])
            .await
            .unwrap();
        assert!(assigned.pg_id > pg_id);

        // Owner sign-up draws from the address sequence too
        testing::register_owner(&pool).await;

        for id in [chosen.pg_id, assigned.pg_id] {
            delete_listing(&pool, &store, id, Some(DeleteTarget::Pg))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_delete_pg_clears_dependent_rows_and_files() {
        let Some(pool) = testing::database().await else {
            return;
        };
        let dir = TempDir::new().unwrap();
        let store = testing::local_store(&dir);
        let owner_id = testing::register_owner(&pool).await;
        let user_id = testing::register_user(&pool).await;

        let draft = PgDraft {
            pg_facilities: Some(serde_json::from_value(json!({ "food": 1 })).unwrap()),
            ..testing::pg_draft(owner_id)
        };
        let pg_id = add_pg(&pool, &store, draft, vec![testing::image("front.jpg")])
            .await
            .unwrap()
            .pg_id;

        let mut room = room_draft();
        room.pg_id = Some(pg_id);
        room.room_facilities = Some(serde_json::from_value(json!({ "ac": true })).unwrap());
        let room_id = add_room(&pool, &store, room, vec![testing::image("bed.jpg")])
            .await
            .unwrap()
            .room_id;

        saved_service::save_pg(
            &pool,
            SavedPgRequest {
                user_id: Some(user_id),
                pg_id: Some(pg_id),
            },
        )
        .await
        .unwrap();

        let address_id = pg_repository::find_by_id(&pool, pg_id)
            .await
            .unwrap()
            .unwrap()
            .address_id
            .unwrap();
        assert_eq!(stored_files(dir.path()), 2);

        let deleted = delete_listing(&pool, &store, pg_id, Some(DeleteTarget::Pg))
            .await
            .unwrap();
        assert_eq!(deleted.message, format!("PG with ID {} deleted successfully.", pg_id));
        assert_eq!(deleted.images_deleted, 2);
        assert_eq!(deleted.failed_image_deletions, 0);

        for (table, column, id) in [
            ("pg", "pg_id", pg_id),
            ("room", "pg_id", pg_id),
            ("images", "pg_id", pg_id),
            ("room_facilities", "room_id", room_id),
            ("pg_facilities", "pg_id", pg_id),
            ("saved_pgs", "pg_id", pg_id),
            ("address", "address_id", address_id),
        ] {
            assert_eq!(count_rows(&pool, table, column, id).await, 0, "{} rows left", table);
        }
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_failed_add_pg_discards_stored_images() {
        let Some(pool) = testing::database().await else {
            return;
        };
        let dir = TempDir::new().unwrap();
        let store = testing::local_store(&dir);
        let owner_id = testing::register_owner(&pool).await;

        let existing = add_pg(&pool, &store, testing::pg_draft(owner_id), vec![])
            .await
            .unwrap()
            .pg_id;

        let clash = PgDraft {
            pg_id: Some(existing),
            ..testing::pg_draft(owner_id)
        };
        let result = add_pg(&pool, &store, clash, vec![testing::image("front.jpg")]).await;

        assert!(matches!(result, Err(ListingError::DatabaseError(_))));
        assert_eq!(stored_files(dir.path()), 0);
        assert_eq!(count_rows(&pool, "images", "pg_id", existing).await, 0);

        delete_listing(&pool, &store, existing, Some(DeleteTarget::Pg))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_pg_keeps_facilities_it_did_not_send() {
        let Some(pool) = testing::database().await else {
            return;
        };
        let dir = TempDir::new().unwrap();
        let store = testing::local_store(&dir);
        let owner_id = testing::register_owner(&pool).await;

        let draft = PgDraft {
            pg_facilities: Some(serde_json::from_value(json!({ "food": 1, "gym": 1 })).unwrap()),
            ..testing::pg_draft(owner_id)
        };
        let pg_id = add_pg(&pool, &store, draft, vec![]).await.unwrap().pg_id;

        let update = PgDraft {
            pg_facilities: Some(serde_json::from_value(json!({ "gym": 0, "cctv": "1" })).unwrap()),
            ..testing::pg_draft(owner_id)
        };
        update_pg(&pool, &store, pg_id, Some(update), ImageChanges::default())
            .await
            .unwrap();

        let facilities = attribute_repository::find_pg_facilities(&pool, pg_id)
            .await
            .unwrap()
            .unwrap();
        assert!(facilities.food);
        assert!(!facilities.gym);
        assert!(facilities.cctv);
        assert!(!facilities.parking);

        delete_listing(&pool, &store, pg_id, Some(DeleteTarget::Pg))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_pg_recreates_a_missing_address() {
        let Some(pool) = testing::database().await else {
            return;
        };
        let dir = TempDir::new().unwrap();
        let store = testing::local_store(&dir);
        let owner_id = testing::register_owner(&pool).await;

        let pg_id = add_pg(&pool, &store, testing::pg_draft(owner_id), vec![])
            .await
            .unwrap()
            .pg_id;
        let pg = pg_repository::find_by_id(&pool, pg_id).await.unwrap().unwrap();
        address_repository::delete(&pool, pg.address_id.unwrap())
            .await
            .unwrap();

        let update = PgDraft {
            city: Some("Mumbai".to_string()),
            ..testing::pg_draft(owner_id)
        };
        update_pg(&pool, &store, pg_id, Some(update), ImageChanges::default())
            .await
            .unwrap();

        let address_id = pg_repository::find_by_id(&pool, pg_id)
            .await
            .unwrap()
            .unwrap()
            .address_id
            .expect("address linked again");
        let address = address_repository::find_by_id(&pool, address_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(address.city, "Mumbai");

        delete_listing(&pool, &store, pg_id, Some(DeleteTarget::Pg))
            .await
            .unwrap();
    }
}
