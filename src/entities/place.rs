use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, Coordinates, PlaceId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub category_id: CategoryId,
    pub location: Coordinates,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    pub fn new(
        id: PlaceId,
        name: impl Into<String>,
        category_id: CategoryId,
        location: Coordinates,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: name.into(),
            category_id,
            location,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A place expanded with its category's name, as shown in favorite listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    #[serde(flatten)]
    pub place: Place,
    pub category_name: String,
}
