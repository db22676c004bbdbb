use super::{Engine, FAVORITES_PAGE_SIZE};

use async_trait::async_trait;

use crate::{
    api::FavoriteAPI,
    auth::User,
    entities::{FavoriteAdded, FavoriteEntry, FavoriteId, PlaceId},
    error::{favorite_not_found_error, place_not_found_error, Error},
    search::{PageRequest, Paginated, Pagination},
    store::{FavoriteStore, Store},
};

#[async_trait]
impl<S: Store> FavoriteAPI for Engine<S> {
    #[tracing::instrument(skip(self))]
    async fn add_favorite(&self, user: User, place_id: PlaceId) -> Result<FavoriteAdded, Error> {
        let added = self
            .store
            .add_favorite(user.id, place_id)
            .await?
            .ok_or_else(place_not_found_error)?;

        tracing::info!(
            favorite_id = added.favorite().id,
            created = added.is_created(),
            "favorite added"
        );

        Ok(added)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_favorite(&self, user: User, favorite_id: FavoriteId) -> Result<(), Error> {
        if !self.store.remove_favorite(user.id, favorite_id).await? {
            return Err(favorite_not_found_error());
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn is_favorited(&self, user: User, place_id: PlaceId) -> Result<bool, Error> {
        self.store.favorite_exists(user.id, place_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_favorites(
        &self,
        user: User,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Paginated<FavoriteEntry>, Error> {
        let request = PageRequest::resolve(page, page_size, FAVORITES_PAGE_SIZE);

        let total_records = self.store.count_favorites(user.id).await?;
        let data = self
            .store
            .list_favorites(user.id, request.window())
            .await?;

        Ok(Paginated {
            data,
            pagination: Pagination::new(request, total_records),
        })
    }
}
