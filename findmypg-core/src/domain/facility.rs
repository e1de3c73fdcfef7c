//! Facility flag sets
//!
//! PG facilities and room facilities are flat rows of boolean columns.
//! Each set knows its column list so the server can build its SQL from a
//! fixed vocabulary instead of from client-supplied keys.

use serde::{Deserialize, Serialize};

macro_rules! facility_flags {
    (
        $(#[$meta:meta])*
        pub struct $name:ident / $patch:ident {
            $( $(#[$field_meta:meta])* $field:ident, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(default, deserialize_with = "crate::lenient::flag")]
                pub $field: bool,
            )+
        }

        impl $name {
            /// Column names, in amenity order
            pub const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Flag values, aligned with `COLUMNS`
            pub fn values(&self) -> Vec<bool> {
                vec![$(self.$field),+]
            }

            /// Names of the enabled flags, in amenity order
            pub fn enabled(&self) -> Vec<&'static str> {
                Self::COLUMNS
                    .iter()
                    .zip(self.values())
                    .filter(|(_, on)| *on)
                    .map(|(column, _)| *column)
                    .collect()
            }
        }

        /// Flags as sent by a client; keys it left out are `None`
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $patch {
            $(
                $(#[$field_meta])*
                #[serde(
                    default,
                    deserialize_with = "crate::lenient::optional_flag",
                    skip_serializing_if = "Option::is_none"
                )]
                pub $field: Option<bool>,
            )+
        }

        impl $patch {
            /// Sent values, aligned with `COLUMNS`
            pub fn values(&self) -> Vec<Option<bool>> {
                vec![$(self.$field),+]
            }
        }
    };
}

facility_flags! {
    /// Facilities offered by a PG as a whole
    pub struct PgFacilities / PgFacilitiesPatch {
        food,
        free_wifi,
        library,
        parking,
        lift,
        daily_cleaning,
        tv_lounge,
        laundry,
        ironing,
        kitchen,
        #[serde(rename = "dining_Area", alias = "dining_area")]
        dining_area,
        gym,
        ground,
        cafeteria,
        swimming_pool,
        game_zone,
        cab_facility,
        _24_x_7_water,
        _24_x_7_electricity,
        hot_water,
        ro_purifier,
        water_cooler,
        cctv,
        security_warden,
        medical_services,
    }
}

facility_flags! {
    /// Facilities of a single room type
    pub struct RoomFacilities / RoomFacilitiesPatch {
        ac,
        tv,
        wifi,
        fridge,
        attached_bathroom,
        attached_toilets,
        balcony,
        wardrobe,
        safety_locker,
        study_table,
        mattress,
        bed_sheets,
        pillows,
    }
}

/// Number of amenities shown on a listing card
pub const HIGHLIGHTED_AMENITIES: usize = 4;

impl PgFacilities {
    /// The first few enabled facilities, used as listing highlights
    pub fn highlights(&self) -> Vec<String> {
        self.enabled()
            .into_iter()
            .take(HIGHLIGHTED_AMENITIES)
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_columns_match_values() {
        let facilities = PgFacilities::default();
        assert_eq!(PgFacilities::COLUMNS.len(), 25);
        assert_eq!(facilities.values().len(), PgFacilities::COLUMNS.len());
        assert_eq!(RoomFacilities::COLUMNS.len(), 13);
        assert_eq!(RoomFacilities::COLUMNS[0], "ac");
        assert_eq!(RoomFacilities::COLUMNS[12], "pillows");
    }

    #[test]
    fn test_highlights_keep_amenity_order_and_limit() {
        let facilities: PgFacilities = serde_json::from_value(json!({
            "gym": 1,
            "food": true,
            "cctv": "1",
            "lift": "true",
            "parking": 0,
            "hot_water": true
        }))
        .unwrap();

        assert_eq!(facilities.highlights(), vec!["food", "lift", "gym", "hot_water"]);
        assert!(!facilities.parking);
        assert!(facilities.cctv);
    }

    #[test]
    fn test_dining_area_keys() {
        let from_client: PgFacilities =
            serde_json::from_value(json!({ "dining_Area": 1 })).unwrap();
        let from_row: PgFacilities =
            serde_json::from_value(json!({ "pg_id": 4, "dining_area": true })).unwrap();
        assert!(from_client.dining_area);
        assert_eq!(from_client, from_row);

        let out = serde_json::to_value(&from_row).unwrap();
        assert_eq!(out["dining_Area"], true);
    }

    #[test]
    fn test_patch_keeps_unsent_flags() {
        let patch: PgFacilitiesPatch =
            serde_json::from_value(json!({ "gym": 1, "food": "0", "dining_Area": null })).unwrap();
        assert_eq!(patch.gym, Some(true));
        assert_eq!(patch.food, Some(false));
        assert_eq!(patch.dining_area, Some(false));
        assert_eq!(patch.cctv, None);

        let values = patch.values();
        assert_eq!(values.len(), PgFacilities::COLUMNS.len());
        let gym = PgFacilities::COLUMNS.iter().position(|c| *c == "gym").unwrap();
        assert_eq!(values[gym], Some(true));
        assert_eq!(values.iter().filter(|v| v.is_some()).count(), 3);

        let empty = RoomFacilitiesPatch::default();
        assert!(empty.values().iter().all(Option::is_none));
    }
}
