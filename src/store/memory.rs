use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{CategoryStore, FavoriteStore, GeoIndexStore};
use crate::{
    entities::{
        Category, CategoryId, Favorite, FavoriteAdded, FavoriteEntry, FavoriteId, Place, PlaceId,
        PlaceSummary, SearchResult, UserId,
    },
    error::{invalid_input_error, store_unavailable_error, Error},
    search::{PageWindow, SearchFilter},
};

#[derive(Default)]
struct State {
    categories: BTreeMap<CategoryId, Category>,
    places: BTreeMap<PlaceId, Place>,
    favorites: BTreeMap<FavoriteId, Favorite>,
    next_favorite_id: FavoriteId,
}

impl State {
    /// Places matching `filter` whose category resolves, with their distance
    /// from the center, nearest first.
    fn candidates(&self, filter: &SearchFilter) -> Vec<(&Place, &Category, f64)> {
        let center = filter.center();

        let mut candidates: Vec<_> = self
            .places
            .values()
            .filter(|place| filter.matches(place))
            .filter_map(|place| {
                let category = self.categories.get(&place.category_id)?;
                Some((place, category, center.distance_to(&place.location)))
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.2.partial_cmp(&b.2)
                .unwrap_or(CmpOrdering::Equal)
                .then(a.0.id.cmp(&b.0.id))
        });

        candidates
    }

    fn find_favorite(&self, user_id: UserId, place_id: PlaceId) -> Option<&Favorite> {
        self.favorites
            .values()
            .find(|favorite| favorite.user_id == user_id && favorite.place_id == place_id)
    }
}

/// In-process store with the same contracts as the PostGIS adapter.
/// Uniqueness of `(user_id, place_id)` is enforced under the write lock.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_category(&self, category: Category) {
        self.state
            .write()
            .await
            .categories
            .insert(category.id, category);
    }

    pub async fn insert_place(&self, place: Place) -> Result<(), Error> {
        place.location.validate()?;

        let mut state = self.state.write().await;

        if !state.categories.contains_key(&place.category_id) {
            return Err(invalid_input_error("place references an unknown category"));
        }

        state.places.insert(place.id, place);

        Ok(())
    }

    /// Makes every subsequent call fail as if the store were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn favorite_count(&self) -> usize {
        self.state.read().await.favorites.len()
    }

    fn ensure_online(&self) -> Result<(), Error> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(store_unavailable_error());
        }

        Ok(())
    }
}

#[async_trait]
impl GeoIndexStore for MemoryStore {
    async fn count_places(&self, filter: &SearchFilter) -> Result<u64, Error> {
        self.ensure_online()?;

        let state = self.state.read().await;

        Ok(state.candidates(filter).len() as u64)
    }

    async fn fetch_places(
        &self,
        filter: &SearchFilter,
        window: PageWindow,
    ) -> Result<Vec<SearchResult>, Error> {
        self.ensure_online()?;

        let state = self.state.read().await;

        let results = window
            .apply(state.candidates(filter))
            .into_iter()
            .map(|(place, category, distance)| SearchResult {
                id: place.id,
                name: place.name.clone(),
                category_id: place.category_id,
                location: place.location,
                distance_meters: distance,
                category_name: category.name.clone(),
                is_favorited: None,
            })
            .collect();

        Ok(results)
    }

    async fn favorited_place_ids(
        &self,
        user_id: UserId,
        place_ids: &[PlaceId],
    ) -> Result<HashSet<PlaceId>, Error> {
        self.ensure_online()?;

        let state = self.state.read().await;

        Ok(state
            .favorites
            .values()
            .filter(|favorite| favorite.user_id == user_id && place_ids.contains(&favorite.place_id))
            .map(|favorite| favorite.place_id)
            .collect())
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn add_favorite(
        &self,
        user_id: UserId,
        place_id: PlaceId,
    ) -> Result<Option<FavoriteAdded>, Error> {
        self.ensure_online()?;

        let mut state = self.state.write().await;

        if !state.places.contains_key(&place_id) {
            return Ok(None);
        }

        if let Some(existing) = state.find_favorite(user_id, place_id) {
            return Ok(Some(FavoriteAdded::Existing(existing.clone())));
        }

        state.next_favorite_id += 1;
        let favorite = Favorite {
            id: state.next_favorite_id,
            user_id,
            place_id,
            created_at: Utc::now(),
        };
        state.favorites.insert(favorite.id, favorite.clone());

        Ok(Some(FavoriteAdded::Created(favorite)))
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        favorite_id: FavoriteId,
    ) -> Result<bool, Error> {
        self.ensure_online()?;

        let mut state = self.state.write().await;

        let owned = state
            .favorites
            .get(&favorite_id)
            .map_or(false, |favorite| favorite.user_id == user_id);

        if owned {
            state.favorites.remove(&favorite_id);
        }

        Ok(owned)
    }

    async fn favorite_exists(&self, user_id: UserId, place_id: PlaceId) -> Result<bool, Error> {
        self.ensure_online()?;

        Ok(self
            .state
            .read()
            .await
            .find_favorite(user_id, place_id)
            .is_some())
    }

    async fn count_favorites(&self, user_id: UserId) -> Result<u64, Error> {
        self.ensure_online()?;

        let state = self.state.read().await;

        Ok(state
            .favorites
            .values()
            .filter(|favorite| favorite.user_id == user_id)
            .count() as u64)
    }

    async fn list_favorites(
        &self,
        user_id: UserId,
        window: PageWindow,
    ) -> Result<Vec<FavoriteEntry>, Error> {
        self.ensure_online()?;

        let state = self.state.read().await;

        let mut favorites: Vec<&Favorite> = state
            .favorites
            .values()
            .filter(|favorite| favorite.user_id == user_id)
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let entries = window
            .apply(favorites)
            .into_iter()
            .filter_map(|favorite| {
                let place = state.places.get(&favorite.place_id)?;
                let category = state.categories.get(&place.category_id)?;

                Some(FavoriteEntry {
                    id: favorite.id,
                    place_id: favorite.place_id,
                    place: PlaceSummary {
                        place: place.clone(),
                        category_name: category.name.clone(),
                    },
                    created_at: favorite.created_at,
                })
            })
            .collect();

        Ok(entries)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.ensure_online()?;

        let mut categories: Vec<Category> =
            self.state.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinates;
    use assert_matches::assert_matches;
    use tokio_test::block_on;

    fn store_with_place() -> MemoryStore {
        let store = MemoryStore::new();

        block_on(async {
            store.insert_category(Category::new(1, "Store", "store")).await;
            store
                .insert_place(Place::new(
                    1,
                    "Downtown Grocery",
                    1,
                    Coordinates::new(40.7228, -74.0160),
                ))
                .await
                .unwrap();
        });

        store
    }

    #[test]
    fn insert_place_enforces_invariants() {
        let store = store_with_place();

        let unknown_category = Place::new(2, "Orphan", 42, Coordinates::new(0.0, 0.0));
        assert!(block_on(store.insert_place(unknown_category)).is_err());

        let bad_location = Place::new(3, "Nowhere", 1, Coordinates::new(100.0, 0.0));
        assert!(block_on(store.insert_place(bad_location)).is_err());
    }

    #[test]
    fn concurrent_duplicate_adds_converge_to_one_row() {
        let store = store_with_place();

        let (a, b) = block_on(async {
            futures::join!(store.add_favorite(7, 1), store.add_favorite(7, 1))
        });

        let (a, b) = (a.unwrap().unwrap(), b.unwrap().unwrap());
        assert_eq!(a.favorite(), b.favorite());
        assert!(a.is_created() != b.is_created());
        assert_eq!(block_on(store.favorite_count()), 1);
    }

    #[test]
    fn add_favorite_for_missing_place_returns_none() {
        let store = store_with_place();

        assert_matches!(block_on(store.add_favorite(7, 404)), Ok(None));
    }

    #[test]
    fn offline_store_fails_every_call() {
        let store = store_with_place();
        store.set_offline(true);

        let err = block_on(store.list_categories()).unwrap_err();
        assert!(err.is_service_unavailable_error());

        store.set_offline(false);
        assert_eq!(block_on(store.list_categories()).unwrap().len(), 1);
    }
}
