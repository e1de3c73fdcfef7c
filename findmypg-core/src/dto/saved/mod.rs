//! Saved PG DTOs

use serde::{Deserialize, Serialize};

use crate::dto::SUCCESS;

/// Save or unsave request, `{user_id, pg_id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedPgRequest {
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub user_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub pg_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPgIds {
    pub status: String,
    pub saved_pgs: Vec<i32>,
}

impl SavedPgIds {
    pub fn new(saved_pgs: Vec<i32>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            saved_pgs,
        }
    }
}

/// Card shown in a renter's shortlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPgSummary {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub image: String,
    pub price: String,
    #[serde(rename = "savedOn")]
    pub saved_on: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPgDetails {
    pub status: String,
    #[serde(rename = "savedPGs")]
    pub saved_pgs: Vec<SavedPgSummary>,
}

impl SavedPgDetails {
    pub fn new(saved_pgs: Vec<SavedPgSummary>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            saved_pgs,
        }
    }
}
