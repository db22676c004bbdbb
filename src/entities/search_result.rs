use serde::{Deserialize, Serialize};

use super::{CategoryId, Coordinates, PlaceId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: PlaceId,
    pub name: String,
    pub category_id: CategoryId,
    pub location: Coordinates,
    pub distance_meters: f64,
    pub category_name: String,
    /// `None` means favorites were not evaluated (anonymous search), which
    /// is different from `Some(false)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorited: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(is_favorited: Option<bool>) -> SearchResult {
        SearchResult {
            id: 9,
            name: "Premium Coffee House".into(),
            category_id: 3,
            location: Coordinates::new(40.7428, -73.9760),
            distance_meters: 4_000.0,
            category_name: "Coffee".into(),
            is_favorited,
        }
    }

    #[test]
    fn unevaluated_favorite_flag_is_omitted() {
        let value = serde_json::to_value(result(None)).unwrap();

        assert!(value.get("isFavorited").is_none());
        assert_eq!(value["categoryName"], json!("Coffee"));
    }

    #[test]
    fn evaluated_favorite_flag_is_serialized_even_when_false() {
        let value = serde_json::to_value(result(Some(false))).unwrap();

        assert_eq!(value["isFavorited"], json!(false));
    }
}
