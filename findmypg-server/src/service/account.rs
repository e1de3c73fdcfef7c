//! Account Service
//!
//! Sign-up, sign-in and profile management for owners and renters.
//! Passwords are stored and compared as given.

use std::collections::HashMap;

use findmypg_core::domain::account::{AccountKind, Address, User};
use findmypg_core::dto::Ack;
use findmypg_core::dto::account::{
    LoginRequest, LoginResponse, OwnerProfile, OwnerUpdate, RegisterRequest, UserUpdate,
};
use findmypg_core::lenient::parse_int;
use sqlx::{PgConnection, PgPool};

use crate::repository::{
    address_repository, is_duplicate_email, owner_repository, user_repository,
};
use crate::storage::{self, ImageFolder, ImageStore, StorageError, UploadedImage};

/// Service error type
#[derive(Debug)]
pub enum AccountError {
    NotFound(String),
    ValidationError(String),
    DuplicateEmail,
    DatabaseError(sqlx::Error),
    StorageError(StorageError),
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        if is_duplicate_email(&err) {
            AccountError::DuplicateEmail
        } else {
            AccountError::DatabaseError(err)
        }
    }
}

impl From<StorageError> for AccountError {
    fn from(err: StorageError) -> Self {
        AccountError::StorageError(err)
    }
}

pub type Result<T> = std::result::Result<T, AccountError>;

/// Create an owner or renter account
pub async fn register(pool: &PgPool, req: RegisterRequest) -> Result<Ack> {
    let name = required(&req.name, "Name, email and password are required")?;
    let email = required(&req.email, "Name, email and password are required")?;
    let password = required(&req.password, "Name, email and password are required")?;
    let phone = req.phone.as_deref().unwrap_or_default().trim();

    let kind = AccountKind::from_user_type(&req.user_type);

    let id = match kind {
        AccountKind::Owner => {
            let mut tx = pool.begin().await?;
            let address_id = address_repository::insert(&mut *tx, None, &Address::default()).await?;
            let owner_id =
                owner_repository::insert(&mut *tx, name, email, phone, password, address_id).await?;
            tx.commit().await?;
            owner_id
        }
        AccountKind::User => user_repository::insert(pool, name, email, phone, password).await?,
    };

    tracing::info!("Registered {} {} ({})", kind, id, email);

    let label = match req.user_type.trim() {
        "" => kind.to_string(),
        given => given.to_string(),
    };
    Ok(Ack::success_with(format!("{} Registered", label)))
}

/// Check an email/password pair
///
/// Wrong credentials are not an error: the response says what went wrong.
pub async fn login(pool: &PgPool, req: LoginRequest) -> Result<LoginResponse> {
    let email = required(&req.email, "Email and password are required")?;
    let password = required(&req.password, "Email and password are required")?;

    let (stored_password, id) = match AccountKind::from_user_type(&req.user_type) {
        AccountKind::Owner => match owner_repository::find_by_email(pool, email).await? {
            Some(owner) => (owner.password, (Some(owner.owner_id), None)),
            None => return Ok(LoginResponse::rejected("Email does not exist.")),
        },
        AccountKind::User => match user_repository::find_by_email(pool, email).await? {
            Some(user) => (user.password, (None, Some(user.user_id))),
            None => return Ok(LoginResponse::rejected("Email does not exist.")),
        },
    };

    if stored_password != password {
        tracing::debug!("Rejected login for {}", email);
        return Ok(LoginResponse::rejected("Invalid password."));
    }

    let (owner_id, user_id) = id;
    Ok(LoginResponse {
        success: true,
        message: "Login successful.".to_string(),
        owner_id,
        user_id,
    })
}

/// Owner profile with its address
pub async fn get_owner(pool: &PgPool, owner_id: i32) -> Result<OwnerProfile> {
    let mut conn = pool.acquire().await?;
    load_owner_profile(&mut conn, owner_id).await
}

pub async fn get_user(pool: &PgPool, user_id: i32) -> Result<User> {
    user_repository::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AccountError::NotFound("No users found".to_string()))
}

async fn load_owner_profile(conn: &mut PgConnection, owner_id: i32) -> Result<OwnerProfile> {
    let owner = owner_repository::find_by_id(&mut *conn, owner_id)
        .await?
        .ok_or_else(|| AccountError::NotFound("No owners found".to_string()))?;

    let address = match owner.address_id {
        Some(address_id) => address_repository::find_by_id(&mut *conn, address_id)
            .await?
            .unwrap_or_default(),
        None => Address::default(),
    };

    Ok(OwnerProfile::new(owner, address))
}

/// Update an owner's profile, address and (optionally) picture
pub async fn update_owner(
    pool: &PgPool,
    store: &dyn ImageStore,
    update: OwnerUpdate,
    avatar: Option<UploadedImage>,
) -> Result<OwnerProfile> {
    let existing = owner_repository::find_by_id(pool, update.owner_id)
        .await?
        .ok_or_else(|| AccountError::NotFound("No owners found".to_string()))?;

    let image = match &avatar {
        Some(avatar) => Some(store.store(ImageFolder::Owners, avatar).await?),
        None => None,
    };

    let profile = match apply_owner_update(pool, &update, image.as_deref()).await {
        Ok(profile) => profile,
        Err(e) => {
            if let Some(url) = image {
                storage::discard(store, &[url]).await;
            }
            return Err(e);
        }
    };

    if image.is_some() {
        replace_picture(store, existing.image).await;
    }

    tracing::info!("Owner {} updated", update.owner_id);
    Ok(profile)
}

async fn apply_owner_update(
    pool: &PgPool,
    update: &OwnerUpdate,
    image: Option<&str>,
) -> Result<OwnerProfile> {
    let mut tx = pool.begin().await?;

    if let Some(url) = image {
        owner_repository::set_image(&mut *tx, update.owner_id, url).await?;
    }

    owner_repository::update_profile(&mut *tx, update).await?;

    if !address_repository::update_for_owner(&mut *tx, update.owner_id, &update.address).await? {
        // Accounts created before addresses were tracked have none yet
        let address_id = address_repository::insert(&mut *tx, None, &update.address).await?;
        owner_repository::set_address(&mut *tx, update.owner_id, address_id).await?;
    }

    let profile = load_owner_profile(&mut tx, update.owner_id).await?;

    tx.commit().await?;
    Ok(profile)
}

/// Update a renter's profile and (optionally) picture
pub async fn update_user(
    pool: &PgPool,
    store: &dyn ImageStore,
    update: UserUpdate,
    avatar: Option<UploadedImage>,
) -> Result<User> {
    let existing = user_repository::find_by_id(pool, update.user_id)
        .await?
        .ok_or_else(|| AccountError::NotFound("No users found".to_string()))?;

    let image = match &avatar {
        Some(avatar) => Some(store.store(ImageFolder::Users, avatar).await?),
        None => None,
    };

    let user = match apply_user_update(pool, &update, image.as_deref()).await {
        Ok(user) => user,
        Err(e) => {
            if let Some(url) = image {
                storage::discard(store, &[url]).await;
            }
            return Err(e);
        }
    };

    if image.is_some() {
        replace_picture(store, existing.profile_image).await;
    }

    tracing::info!("User {} updated", update.user_id);
    Ok(user)
}

async fn apply_user_update(pool: &PgPool, update: &UserUpdate, image: Option<&str>) -> Result<User> {
    user_repository::update(pool, update, image).await?;

    user_repository::find_by_id(pool, update.user_id)
        .await?
        .ok_or_else(|| AccountError::NotFound("No users found".to_string()))
}

/// Drop the picture a new upload replaced
async fn replace_picture(store: &dyn ImageStore, previous: Option<String>) {
    if let Some(previous) = previous.filter(|p| !p.is_empty()) {
        storage::discard(store, &[previous]).await;
    }
}

// =============================================================================
// Form parsing and validation
// =============================================================================

/// Build an owner update from the multipart text fields of the profile form
pub fn owner_update_from_form(fields: &HashMap<String, String>) -> Result<OwnerUpdate> {
    let text = |key: &str| field(fields, key).unwrap_or_default().to_string();
    let missing = || AccountError::ValidationError("Missing required fields".to_string());

    for key in ["id", "name", "mobile", "email", "password", "gender"] {
        if field(fields, key).is_none() {
            return Err(missing());
        }
    }

    let owner_id = parse_int(&text("id"))
        .map_err(|_| AccountError::ValidationError("Invalid owner id".to_string()))?
        .ok_or_else(missing)?;

    let no_of_pg_hold = match field(fields, "no_of_pg_hold") {
        Some(raw) => parse_int(raw)
            .map_err(|_| AccountError::ValidationError("Invalid no_of_pg_hold".to_string()))?,
        None => None,
    };

    let aadhar_card = match field(fields, "aadhar_card") {
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            AccountError::ValidationError("Invalid aadhar_card".to_string())
        })?),
        None => None,
    };

    Ok(OwnerUpdate {
        owner_id,
        name: text("name"),
        mobile: text("mobile"),
        email: text("email"),
        password: text("password"),
        no_of_pg_hold,
        gender: text("gender"),
        aadhar_card,
        address: Address {
            residence_name: text("residence_name"),
            street: text("street"),
            area: text("area"),
            city: text("city"),
            state: text("state"),
            zip: text("zip"),
        },
    })
}

/// Build a user update from the multipart text fields of the profile form
pub fn user_update_from_form(fields: &HashMap<String, String>) -> Result<UserUpdate> {
    let text = |key: &str| field(fields, key).unwrap_or_default().to_string();

    for key in ["id", "name", "phone", "email", "password", "gender"] {
        if field(fields, key).is_none() {
            return Err(AccountError::ValidationError(
                "All fields are required".to_string(),
            ));
        }
    }

    let user_id = parse_int(&text("id"))
        .map_err(|_| AccountError::ValidationError("Invalid user id".to_string()))?
        .ok_or_else(|| AccountError::ValidationError("All fields are required".to_string()))?;

    Ok(UserUpdate {
        user_id,
        name: text("name"),
        phone: text("phone"),
        email: text("email"),
        password: text("password"),
        gender: text("gender"),
    })
}

/// A form field with blank and `"null"`/`"undefined"` values treated as absent
fn field<'a>(fields: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && *v != "null" && *v != "undefined")
}

fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AccountError::ValidationError(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn owner_form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("id", "7"),
            ("name", "Asha"),
            ("mobile", "9999999999"),
            ("email", "asha@example.com"),
            ("password", "secret"),
            ("gender", "Female"),
            ("no_of_pg_hold", "2"),
            ("aadhar_card", "123412341234"),
            ("city", "Pune"),
        ]
    }

    #[test]
    fn test_owner_update_from_form() {
        let update = owner_update_from_form(&form(&owner_form())).unwrap();
        assert_eq!(update.owner_id, 7);
        assert_eq!(update.no_of_pg_hold, Some(2));
        assert_eq!(update.aadhar_card, Some(123412341234));
        assert_eq!(update.address.city, "Pune");
        assert_eq!(update.address.zip, "");
    }

    #[test]
    fn test_owner_update_null_aadhar() {
        let mut pairs = owner_form();
        pairs.retain(|(k, _)| *k != "aadhar_card");
        pairs.push(("aadhar_card", "null"));
        let update = owner_update_from_form(&form(&pairs)).unwrap();
        assert_eq!(update.aadhar_card, None);

        pairs.retain(|(k, _)| *k != "aadhar_card");
        pairs.push(("aadhar_card", ""));
        let update = owner_update_from_form(&form(&pairs)).unwrap();
        assert_eq!(update.aadhar_card, None);
    }

    #[test]
    fn test_owner_update_rejects_bad_aadhar() {
        let mut pairs = owner_form();
        pairs.retain(|(k, _)| *k != "aadhar_card");
        pairs.push(("aadhar_card", "12ab"));
        assert!(matches!(
            owner_update_from_form(&form(&pairs)),
            Err(AccountError::ValidationError(msg)) if msg == "Invalid aadhar_card"
        ));
    }

    #[test]
    fn test_owner_update_requires_fields() {
        let mut pairs = owner_form();
        pairs.retain(|(k, _)| *k != "gender");
        assert!(matches!(
            owner_update_from_form(&form(&pairs)),
            Err(AccountError::ValidationError(_))
        ));
    }

    #[test]
    fn test_user_update_from_form() {
        let fields = form(&[
            ("id", "4"),
            ("name", "Ravi"),
            ("phone", "9876543210"),
            ("email", "ravi@example.com"),
            ("password", "pw"),
            ("gender", "Male"),
        ]);
        let update = user_update_from_form(&fields).unwrap();
        assert_eq!(update.user_id, 4);
        assert_eq!(update.phone, "9876543210");

        let fields = form(&[("id", "4"), ("name", "Ravi")]);
        assert!(user_update_from_form(&fields).is_err());
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required(&Some(" a@b.c ".to_string()), "m").unwrap(), "a@b.c");
        assert!(required(&Some("  ".to_string()), "m").is_err());
        assert!(required(&None, "m").is_err());
    }

    #[tokio::test]
    async fn test_only_a_taken_email_is_a_duplicate() {
        let Some(pool) = testing::database().await else {
            return;
        };

        let email = testing::unique_email("owner");
        let req = RegisterRequest {
            user_type: "owner".to_string(),
            name: Some("Asha".to_string()),
            email: Some(email.clone()),
            password: Some("secret".to_string()),
            phone: None,
        };
        register(&pool, req.clone()).await.unwrap();
        assert!(matches!(
            register(&pool, req).await,
            Err(AccountError::DuplicateEmail)
        ));

        // A colliding address id is a database failure, not a taken email
        let address_id = address_repository::insert(&pool, None, &Address::default())
            .await
            .unwrap();
        let err = address_repository::insert(&pool, Some(address_id), &Address::default())
            .await
            .unwrap_err();
        assert!(matches!(
            AccountError::from(err),
            AccountError::DatabaseError(_)
        ));
        address_repository::delete(&pool, address_id).await.unwrap();
    }
}
