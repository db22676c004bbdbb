use std::collections::HashSet;

use crate::{
    entities::{PlaceId, SearchResult, UserId},
    error::Error,
    store::GeoIndexStore,
};

/// Marks each result on an already fetched page with whether `user_id` has
/// favorited it, using one bulk lookup limited to the page's ids.
#[tracing::instrument(skip(store, results), fields(page_len = results.len()))]
pub async fn overlay_favorites<S>(
    store: &S,
    user_id: UserId,
    results: &mut [SearchResult],
) -> Result<(), Error>
where
    S: GeoIndexStore + ?Sized,
{
    let place_ids: Vec<PlaceId> = results.iter().map(|result| result.id).collect();

    let favorited: HashSet<PlaceId> = if place_ids.is_empty() {
        HashSet::new()
    } else {
        store.favorited_place_ids(user_id, &place_ids).await?
    };

    for result in results.iter_mut() {
        result.is_favorited = Some(favorited.contains(&result.id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinates;
    use crate::store::FavoriteStore;
    use crate::test_data::{nyc_store, TEST_USER};
    use tokio_test::block_on;

    fn result(id: PlaceId) -> SearchResult {
        SearchResult {
            id,
            name: format!("place {}", id),
            category_id: 1,
            location: Coordinates::new(0.0, 0.0),
            distance_meters: 0.0,
            category_name: "Store".into(),
            is_favorited: None,
        }
    }

    #[test]
    fn marks_every_result_on_the_page() {
        block_on(async {
            let store = nyc_store().await;
            store.add_favorite(TEST_USER, 4).await.unwrap();

            let mut page = vec![result(7), result(4), result(1)];
            overlay_favorites(&store, TEST_USER, &mut page).await.unwrap();

            let flags: Vec<_> = page.iter().map(|r| r.is_favorited).collect();
            assert_eq!(flags, vec![Some(false), Some(true), Some(false)]);
        });
    }

    #[test]
    fn favorites_off_the_page_are_ignored() {
        block_on(async {
            let store = nyc_store().await;
            store.add_favorite(TEST_USER, 9).await.unwrap();

            let mut page = vec![result(7)];
            overlay_favorites(&store, TEST_USER, &mut page).await.unwrap();

            assert_eq!(page[0].is_favorited, Some(false));
        });
    }

    #[test]
    fn empty_page_skips_the_lookup() {
        let store = block_on(nyc_store());
        store.set_offline(true);

        let mut page: Vec<SearchResult> = vec![];
        assert!(block_on(overlay_favorites(&store, TEST_USER, &mut page)).is_ok());
    }
}
