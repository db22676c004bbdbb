use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FavoriteId, PlaceId, PlaceSummary, UserId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub place_id: PlaceId,
    pub created_at: DateTime<Utc>,
}

/// Outcome of an insert-if-absent: a fresh row, or the row that was
/// already there. Both are successes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FavoriteAdded {
    Created(Favorite),
    Existing(Favorite),
}

impl FavoriteAdded {
    pub fn favorite(&self) -> &Favorite {
        match self {
            Self::Created(favorite) | Self::Existing(favorite) => favorite,
        }
    }

    pub fn into_favorite(self) -> Favorite {
        match self {
            Self::Created(favorite) | Self::Existing(favorite) => favorite,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: FavoriteId,
    pub place_id: PlaceId,
    pub place: PlaceSummary,
    pub created_at: DateTime<Utc>,
}
