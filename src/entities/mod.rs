mod category;
mod coordinates;
mod favorite;
mod place;
mod search_result;

pub use category::Category;
pub use coordinates::{BoundingBox, Coordinates, EARTH_RADIUS_METERS, METERS_PER_DEGREE};
pub use favorite::{Favorite, FavoriteAdded, FavoriteEntry};
pub use place::{Place, PlaceSummary};
pub use search_result::SearchResult;

pub type PlaceId = i64;
pub type CategoryId = i64;
pub type FavoriteId = i64;
pub type UserId = i64;
