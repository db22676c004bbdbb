use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::User;
use crate::entities::{Category, FavoriteAdded, FavoriteEntry, FavoriteId, PlaceId, SearchResult};
use crate::error::Error;
use crate::search::{Paginated, SearchQuery};

#[async_trait]
pub trait PlaceSearchAPI {
    /// Places within `query.radius_meters` of `query.center`, nearest first.
    /// Results carry `is_favorited` only when `user` is present.
    async fn search_places(
        &self,
        user: Option<User>,
        query: SearchQuery,
    ) -> Result<Paginated<SearchResult>, Error>;
}

#[async_trait]
pub trait FavoriteAPI {
    /// Idempotent: adding an existing favorite returns the stored row.
    async fn add_favorite(&self, user: User, place_id: PlaceId) -> Result<FavoriteAdded, Error>;

    async fn remove_favorite(&self, user: User, favorite_id: FavoriteId) -> Result<(), Error>;

    async fn is_favorited(&self, user: User, place_id: PlaceId) -> Result<bool, Error>;

    async fn list_favorites(
        &self,
        user: User,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Paginated<FavoriteEntry>, Error>;
}

#[async_trait]
pub trait CategoryAPI {
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;
}

pub trait API: PlaceSearchAPI + FavoriteAPI + CategoryAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
