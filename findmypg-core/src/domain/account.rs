//! Account domain types
//!
//! Owners list PGs; users (renters) save and book them. Both sign in with
//! an email and a plaintext password.

use serde::{Deserialize, Serialize};

/// Postal address of a PG or an owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub residence_name: String,
    pub street: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// `"residence, street, area, city, state, zip"`
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}, {}",
            self.residence_name, self.street, self.area, self.city, self.state, self.zip
        )
    }

    /// `"residence, street, area, city, state - zip"`
    pub fn postal_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {} - {}",
            self.residence_name, self.street, self.area, self.city, self.state, self.zip
        )
    }
}

/// A PG owner account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub owner_id: i32,
    pub name: String,
    pub email: String,
    pub mobile: String,

    /// Never serialised; profile responses expose it explicitly.
    #[serde(skip_serializing, default)]
    pub password: String,

    pub image: Option<String>,
    pub no_of_pg_hold: Option<i32>,
    pub gender: Option<String>,
    pub aadhar_card: Option<i64>,
    pub address_id: Option<i32>,
}

/// A renter account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub gender: Option<String>,
    pub profile_image: Option<String>,
}

/// Which account table a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Owner,
    User,
}

impl AccountKind {
    /// The web client sends `userType: "owner"` for owners and anything
    /// else (usually `"user"`) for renters.
    pub fn from_user_type(user_type: &str) -> Self {
        if user_type.eq_ignore_ascii_case("owner") {
            AccountKind::Owner
        } else {
            AccountKind::User
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::Owner => write!(f, "owner"),
            AccountKind::User => write!(f, "user"),
        }
    }
}
