//! Listing domain types
//!
//! A PG is a property with an address and an owner. It has rooms (one row
//! per room type), images, and three attribute tables: facilities, house
//! rules, and extra charges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A listed PG property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pg {
    pub pg_id: i32,
    pub owner_id: i32,
    pub pg_name: String,
    pub address_id: Option<i32>,
    pub map_location: Option<String>,
    pub description: Option<String>,
    pub operating_since: Option<NaiveDate>,
}

/// A room type offered by a PG
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: i32,
    pub pg_id: i32,
    pub room_type: String,
    pub available_room: i32,
    pub room_size: String,
    pub person_type: String,
    pub gender: String,
    pub no_of_rooms: i32,
    pub rent: i32,
}

/// House rules of a PG
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgRules {
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub visitor_allowed: bool,
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub non_veg: bool,
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub other_gender: bool,
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub smoking: bool,
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub drinking: bool,
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub party: bool,
    #[serde(default, deserialize_with = "crate::lenient::optional_text")]
    pub gate_close_time: Option<String>,
}

/// Charges on top of the rent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherCharges {
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub electricity: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub laundry: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub food: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub deposit_amount: Option<i32>,
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub refundable: bool,
    #[serde(default, deserialize_with = "crate::lenient::optional_int")]
    pub notice_period: Option<i32>,
}

impl OtherCharges {
    /// Unset amounts become zero (used when a PG is first listed).
    pub fn zero_filled(&self) -> Self {
        Self {
            electricity: Some(self.electricity.unwrap_or(0)),
            laundry: Some(self.laundry.unwrap_or(0)),
            food: Some(self.food.unwrap_or(0)),
            deposit_amount: Some(self.deposit_amount.unwrap_or(0)),
            refundable: self.refundable,
            notice_period: Some(self.notice_period.unwrap_or(0)),
        }
    }
}

/// Rent label shown on listings, `"₹min - ₹max"`, or empty without rooms.
pub fn price_label(min_rent: Option<i32>, max_rent: Option<i32>) -> String {
    match (min_rent, max_rent) {
        (Some(min), Some(max)) => format!("₹{} - ₹{}", min, max),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_label() {
        assert_eq!(price_label(Some(4000), Some(9000)), "₹4000 - ₹9000");
        assert_eq!(price_label(None, None), "");
    }

    #[test]
    fn test_charges_zero_filled() {
        let charges: OtherCharges = serde_json::from_value(json!({
            "electricity": "",
            "food": "1500",
            "refundable": 1
        }))
        .unwrap();
        assert_eq!(charges.electricity, None);

        let filled = charges.zero_filled();
        assert_eq!(filled.electricity, Some(0));
        assert_eq!(filled.food, Some(1500));
        assert_eq!(filled.notice_period, Some(0));
        assert!(filled.refundable);
    }

    #[test]
    fn test_rules_from_client_shapes() {
        let rules: PgRules = serde_json::from_value(json!({
            "visitor_allowed": true,
            "smoking": 0,
            "party": "1",
            "gate_close_time": "22:30"
        }))
        .unwrap();
        assert!(rules.visitor_allowed);
        assert!(!rules.smoking);
        assert!(rules.party);
        assert_eq!(rules.gate_close_time.as_deref(), Some("22:30"));
    }
}
