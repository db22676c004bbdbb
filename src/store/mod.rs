mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::{
    entities::{Category, FavoriteAdded, FavoriteEntry, FavoriteId, PlaceId, SearchResult, UserId},
    error::Error,
    search::{PageWindow, SearchFilter},
};

/// Spatial side of the store: counting and fetching places that satisfy a
/// filter, plus the bulk favorite lookup used to annotate a fetched page.
#[async_trait]
pub trait GeoIndexStore: Send + Sync {
    async fn count_places(&self, filter: &SearchFilter) -> Result<u64, Error>;

    /// Matching places ordered by ascending distance from the filter's
    /// center, restricted to `window`. `is_favorited` is left unset.
    async fn fetch_places(
        &self,
        filter: &SearchFilter,
        window: PageWindow,
    ) -> Result<Vec<SearchResult>, Error>;

    async fn favorited_place_ids(
        &self,
        user_id: UserId,
        place_ids: &[PlaceId],
    ) -> Result<HashSet<PlaceId>, Error>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Atomic insert-if-absent. `None` when the place does not exist.
    async fn add_favorite(
        &self,
        user_id: UserId,
        place_id: PlaceId,
    ) -> Result<Option<FavoriteAdded>, Error>;

    /// Deletes the favorite only if `user_id` owns it.
    async fn remove_favorite(&self, user_id: UserId, favorite_id: FavoriteId)
        -> Result<bool, Error>;

    async fn favorite_exists(&self, user_id: UserId, place_id: PlaceId) -> Result<bool, Error>;

    async fn count_favorites(&self, user_id: UserId) -> Result<u64, Error>;

    /// Newest first.
    async fn list_favorites(
        &self,
        user_id: UserId,
        window: PageWindow,
    ) -> Result<Vec<FavoriteEntry>, Error>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;
}

pub trait Store: GeoIndexStore + FavoriteStore + CategoryStore {}

impl<T: GeoIndexStore + FavoriteStore + CategoryStore> Store for T {}
