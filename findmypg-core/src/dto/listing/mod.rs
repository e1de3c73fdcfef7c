//! Listing DTOs
//!
//! Bodies for adding and updating PGs and rooms, and the assembled
//! listing returned to renters and owners.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::account::{Address, Owner};
use crate::domain::facility::{
    PgFacilities, PgFacilitiesPatch, RoomFacilities, RoomFacilitiesPatch,
};
use crate::domain::listing::{OtherCharges, Pg, PgRules, Room, price_label};
use crate::dto::SUCCESS;

/// PG details sent as the `data` form field of add/update PG requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PgDraft {
    /// Client-chosen id; the database assigns one when absent
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub pg_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub owner_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub pg_name: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub address_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub residence_name: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub zip: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub map_location: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::date_or_none")]
    pub operating_since: Option<NaiveDate>,
    #[serde(default)]
    pub pg_facilities: Option<PgFacilitiesPatch>,
    #[serde(default)]
    pub rules_in_pg: Option<PgRules>,
    #[serde(default)]
    pub other_charges: Option<OtherCharges>,
}

impl PgDraft {
    pub fn address(&self) -> Address {
        let part = |p: &Option<String>| p.clone().unwrap_or_default();
        Address {
            residence_name: part(&self.residence_name),
            street: part(&self.street),
            area: part(&self.area),
            city: part(&self.city),
            state: part(&self.state),
            zip: part(&self.zip),
        }
    }
}

/// Room details sent as the `data` form field of add/update room requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomDraft {
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub room_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub pg_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub room_type: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub available_room: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub room_size: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub person_type: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub no_of_rooms: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub rent: Option<i32>,
    #[serde(default)]
    pub room_facilities: Option<RoomFacilitiesPatch>,
}

/// A room with its images and facilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomListing {
    #[serde(flatten)]
    pub room: Room,
    pub images: Vec<String>,
    pub room_facilities: Option<RoomFacilities>,
}

/// A PG assembled with everything a listing page shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PgListing {
    #[serde(flatten)]
    pub pg: Pg,

    /// Present on the public catalogue only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner: Option<Owner>,

    /// Single-line address
    pub address: String,

    /// Address parts, serialised as top-level fields
    #[serde(flatten)]
    pub location: Address,

    pub amenities: Vec<String>,
    pub price: String,
    pub availability: i64,
    pub images: Vec<String>,
    pub pg_facilities: Option<PgFacilities>,
    pub rules_in_pg: Option<PgRules>,
    pub other_charges: Option<OtherCharges>,
    pub rooms: Vec<RoomListing>,
}

/// The attribute rows of one PG, as loaded from the database
#[derive(Debug, Clone, Default)]
pub struct PgAttributes {
    pub facilities: Option<PgFacilities>,
    pub rules: Option<PgRules>,
    pub charges: Option<OtherCharges>,
}

impl PgListing {
    /// Assemble a listing; amenities, price and availability are derived
    /// from the facilities and rooms.
    pub fn assemble(
        pg: Pg,
        location: Option<Address>,
        images: Vec<String>,
        attributes: PgAttributes,
        rooms: Vec<RoomListing>,
    ) -> Self {
        let address = location.as_ref().map(Address::one_line).unwrap_or_default();
        let amenities = attributes
            .facilities
            .as_ref()
            .map(PgFacilities::highlights)
            .unwrap_or_default();

        let min_rent = rooms.iter().map(|r| r.room.rent).min();
        let max_rent = rooms.iter().map(|r| r.room.rent).max();
        let availability = rooms.iter().map(|r| i64::from(r.room.available_room)).sum();

        let mut unique_images: Vec<String> = Vec::with_capacity(images.len());
        for image in images {
            if !unique_images.contains(&image) {
                unique_images.push(image);
            }
        }

        PgListing {
            pg,
            owner: None,
            address,
            location: location.unwrap_or_default(),
            amenities,
            price: price_label(min_rent, max_rent),
            availability,
            images: unique_images,
            pg_facilities: attributes.facilities,
            rules_in_pg: attributes.rules,
            other_charges: attributes.charges,
            rooms,
        }
    }

    pub fn with_owner(mut self, owner: Option<Owner>) -> Self {
        self.owner = owner;
        self
    }
}

/// `{status, owner: [listing…]}`; the key name is part of the client contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingsResponse {
    pub status: String,
    pub owner: Vec<PgListing>,
}

impl ListingsResponse {
    pub fn new(listings: Vec<PgListing>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            owner: listings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PgCreated {
    pub status: String,
    pub message: String,
    pub pg_id: i32,
    pub uploaded_images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreated {
    pub status: String,
    pub message: String,
    pub room_id: i32,
    pub uploaded_images: Vec<String>,
}

/// Result of a PG or room update; keys appear only for work that happened
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingUpdated {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDeleted {
    pub status: String,
    pub message: String,
    pub images_deleted: usize,
    pub failed_image_deletions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pg() -> Pg {
        Pg {
            pg_id: 1,
            owner_id: 2,
            pg_name: "Sunrise".to_string(),
            address_id: Some(9),
            map_location: None,
            description: Some("Near metro".to_string()),
            operating_since: NaiveDate::from_ymd_opt(2019, 6, 1),
        }
    }

    fn room(room_id: i32, rent: i32, available: i32) -> RoomListing {
        RoomListing {
            room: Room {
                room_id,
                pg_id: 1,
                room_type: "Double".to_string(),
                available_room: available,
                room_size: "120 sqft".to_string(),
                person_type: "Student".to_string(),
                gender: "Female".to_string(),
                no_of_rooms: 4,
                rent,
            },
            images: vec![],
            room_facilities: None,
        }
    }

    #[test]
    fn test_assemble_derives_price_and_availability() {
        let listing = PgListing::assemble(
            pg(),
            None,
            vec!["a.jpg".to_string(), "b.jpg".to_string(), "a.jpg".to_string()],
            PgAttributes::default(),
            vec![room(1, 6000, 2), room(2, 4500, 3)],
        );

        assert_eq!(listing.price, "₹4500 - ₹6000");
        assert_eq!(listing.availability, 5);
        assert_eq!(listing.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(listing.address, "");
        assert!(listing.amenities.is_empty());
    }

    #[test]
    fn test_assemble_without_rooms() {
        let listing = PgListing::assemble(pg(), None, vec![], PgAttributes::default(), vec![]);
        assert_eq!(listing.price, "");
        assert_eq!(listing.availability, 0);
    }

    #[test]
    fn test_listing_serialises_flat() {
        let location = Address {
            residence_name: "Sunrise".to_string(),
            city: "Pune".to_string(),
            ..Default::default()
        };
        let listing = PgListing::assemble(
            pg(),
            Some(location),
            vec![],
            PgAttributes::default(),
            vec![room(1, 5000, 1)],
        );
        let value = serde_json::to_value(&listing).unwrap();

        assert_eq!(value["pg_id"], 1);
        assert_eq!(value["city"], "Pune");
        assert_eq!(value["address"], "Sunrise, , , Pune, , ");
        assert_eq!(value["operating_since"], "2019-06-01");
        assert_eq!(value["rooms"][0]["rent"], 5000);
        assert!(value.get("owner").is_none());
    }

    #[test]
    fn test_pg_draft_accepts_client_payload() {
        let draft: PgDraft = serde_json::from_value(json!({
            "owner_id": "2",
            "pg_name": "Sunrise",
            "city": "Pune",
            "operating_since": "not a date",
            "pg_facilities": { "food": 1 },
            "other_charges": { "electricity": "" }
        }))
        .unwrap();

        assert_eq!(draft.owner_id, Some(2));
        assert_eq!(draft.pg_id, None);
        assert_eq!(draft.operating_since, None);
        assert_eq!(draft.address().city, "Pune");
        assert_eq!(draft.pg_facilities.unwrap().food, Some(true));
        assert_eq!(draft.other_charges.unwrap().electricity, None);
    }
}
