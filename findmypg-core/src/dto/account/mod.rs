//! Account DTOs

use serde::{Deserialize, Serialize};

use crate::domain::account::{Address, Owner, User};
use crate::dto::SUCCESS;

/// Sign-up request for either account kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "userType", default)]
    pub user_type: String,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userType", default)]
    pub user_type: String,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
}

impl LoginResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            owner_id: None,
            user_id: None,
        }
    }
}

/// Owner profile as shown on the owner's account page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub id: i32,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
    pub no_of_pg_hold: Option<i32>,
    pub gender: Option<String>,
    pub aadhar_card: Option<i64>,
    pub address: Address,
}

impl OwnerProfile {
    pub fn new(owner: Owner, address: Address) -> Self {
        Self {
            id: owner.owner_id,
            name: owner.name,
            mobile: owner.mobile,
            email: owner.email,
            password: owner.password,
            image: owner.image,
            no_of_pg_hold: owner.no_of_pg_hold,
            gender: owner.gender,
            aadhar_card: owner.aadhar_card,
            address,
        }
    }
}

/// Validated owner profile update
#[derive(Debug, Clone)]
pub struct OwnerUpdate {
    pub owner_id: i32,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub password: String,
    pub no_of_pg_hold: Option<i32>,
    pub gender: String,
    pub aadhar_card: Option<i64>,
    pub address: Address,
}

/// Validated user profile update
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub user_id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub owner: OwnerProfile,
}

impl OwnerResponse {
    pub fn new(owner: OwnerProfile, message: Option<&str>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: message.map(str::to_string),
            owner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: User,
}

impl UserResponse {
    pub fn new(user: User, message: Option<&str>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: message.map(str::to_string),
            user,
        }
    }
}
