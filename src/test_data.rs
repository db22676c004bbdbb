//! Shared fixture: three categories and ten places around lower Manhattan.

use crate::entities::{Category, Coordinates, Place};
use crate::store::MemoryStore;

pub const NYC_CENTER: Coordinates = Coordinates {
    lat: 40.7128,
    lng: -74.0060,
};

pub const TEST_USER: i64 = 999;
pub const OTHER_USER: i64 = 1000;

pub fn categories() -> Vec<Category> {
    vec![
        Category::new(1, "Store", "store"),
        Category::new(2, "Gas Stations", "gas-stations"),
        Category::new(3, "Coffee", "coffee"),
    ]
}

pub fn places() -> Vec<Place> {
    [
        (1, "Downtown Grocery", 1, 40.7228, -74.0160),
        (2, "City Mart", 1, 40.7328, -74.0260),
        (3, "Suburban Shop", 1, 40.8128, -74.1060),
        (4, "Quick Fill Gas", 2, 40.7178, -74.0100),
        (5, "Urban Gas Station", 2, 40.7328, -73.9760),
        (6, "Highway Fuel Stop", 2, 40.6128, -73.8060),
        (7, "Morning Brew Café", 3, 40.7158, -74.0020),
        (8, "Espresso Corner", 3, 40.7278, -73.9960),
        (9, "Premium Coffee House", 3, 40.7428, -73.9760),
        (10, "Suburban Coffee Shop", 3, 40.5128, -73.9060),
    ]
    .into_iter()
    .map(|(id, name, category_id, lat, lng)| {
        Place::new(id, name, category_id, Coordinates::new(lat, lng))
    })
    .collect()
}

/// Ids of the places within 5km of `NYC_CENTER`, nearest first.
pub const WITHIN_5KM: [i64; 7] = [7, 4, 1, 8, 2, 5, 9];

pub async fn nyc_store() -> MemoryStore {
    let store = MemoryStore::new();

    for category in categories() {
        store.insert_category(category).await;
    }

    for place in places() {
        store
            .insert_place(place)
            .await
            .expect("fixture place is valid");
    }

    store
}
