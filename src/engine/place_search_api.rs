use super::{overlay_favorites, Engine};

use async_trait::async_trait;

use crate::{
    api::PlaceSearchAPI,
    auth::User,
    entities::SearchResult,
    error::Error,
    search::{Paginated, Pagination, SearchQuery},
    store::{GeoIndexStore, Store},
};

#[async_trait]
impl<S: Store> PlaceSearchAPI for Engine<S> {
    #[tracing::instrument(skip(self))]
    async fn search_places(
        &self,
        user: Option<User>,
        query: SearchQuery,
    ) -> Result<Paginated<SearchResult>, Error> {
        query.validate()?;

        let filter = query.filter();
        let request = query.page_request();

        let total_records = self.store.count_places(&filter).await?;
        let pagination = Pagination::new(request, total_records);

        // past the last page there is nothing to fetch
        let mut data = if (request.page as u64) > pagination.total_pages {
            vec![]
        } else {
            self.store.fetch_places(&filter, request.window()).await?
        };

        if let Some(user) = user {
            overlay_favorites(&self.store, user.id, &mut data).await?;
        }

        tracing::info!(
            total_records,
            returned = data.len(),
            page = request.page,
            "place search complete"
        );

        Ok(Paginated { data, pagination })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinates;
    use crate::error::ErrorKind;
    use crate::store::{FavoriteStore, MemoryStore};
    use crate::test_data::{nyc_store, NYC_CENTER, TEST_USER, WITHIN_5KM};
    use assert_matches::assert_matches;
    use tokio_test::block_on;

    fn engine() -> Engine<MemoryStore> {
        Engine::new(block_on(nyc_store()))
    }

    fn ids(results: &[SearchResult]) -> Vec<i64> {
        results.iter().map(|result| result.id).collect()
    }

    #[test]
    fn finds_places_within_radius_nearest_first() {
        let engine = engine();

        let result = block_on(engine.search_places(None, SearchQuery::new(NYC_CENTER, 5_000.0)))
            .unwrap();

        assert_eq!(result.data.len(), 7);
        assert_eq!(result.pagination.total_records, 7);
        assert_eq!(ids(&result.data), WITHIN_5KM.to_vec());
        assert!(result.data.iter().all(|r| r.distance_meters <= 5_000.0));
        assert!(result
            .data
            .windows(2)
            .all(|pair| pair[0].distance_meters <= pair[1].distance_meters));
    }

    #[test]
    fn every_result_stays_inside_the_radius() {
        let engine = engine();

        for radius in [100.0, 500.0, 1_000.0, 2_500.0, 14_000.0, 50_000.0] {
            let result = block_on(engine.search_places(None, SearchQuery::new(NYC_CENTER, radius)))
                .unwrap();

            for place in result.data.iter() {
                assert!(place.distance_meters >= 0.0);
                assert!(place.distance_meters <= radius, "{} > {}", place.distance_meters, radius);
            }
        }
    }

    #[test]
    fn combines_category_and_keyword() {
        let engine = engine();
        let query = SearchQuery::new(NYC_CENTER, 5_000.0)
            .category(3)
            .keyword("Coffee");

        let result = block_on(engine.search_places(None, query)).unwrap();

        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].name, "Premium Coffee House");
        assert_eq!(result.data[0].category_name, "Coffee");
    }

    #[test]
    fn keyword_match_ignores_case_and_padding() {
        let engine = engine();
        let query = SearchQuery::new(NYC_CENTER, 30_000.0).keyword("  coffee ");

        let result = block_on(engine.search_places(None, query)).unwrap();

        assert_eq!(ids(&result.data), vec![9, 10]);
    }

    #[test]
    fn pages_through_seven_matches() {
        let engine = engine();
        let page = |n| {
            block_on(engine.search_places(None, SearchQuery::new(NYC_CENTER, 5_000.0).page(n, 2)))
                .unwrap()
        };

        let first = page(1);
        assert_eq!(ids(&first.data), vec![7, 4]);
        assert_eq!(first.pagination.total_pages, 4);
        assert!(first.pagination.has_next_page);
        assert!(!first.pagination.has_previous_page);

        let last = page(4);
        assert_eq!(ids(&last.data), vec![9]);
        assert!(!last.pagination.has_next_page);

        let beyond = page(5);
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.pagination.total_records, 7);
        assert_eq!(beyond.pagination.total_pages, 4);
        assert!(!beyond.pagination.has_next_page);
        assert!(beyond.pagination.has_previous_page);
    }

    #[test]
    fn total_records_ignores_paging() {
        let engine = engine();

        for (page, page_size) in [(1, 1), (2, 3), (3, 20), (9, 2)] {
            let query = SearchQuery::new(NYC_CENTER, 5_000.0).page(page, page_size);
            let result = block_on(engine.search_places(None, query)).unwrap();

            assert_eq!(result.pagination.total_records, 7);
        }
    }

    #[test]
    fn non_positive_paging_uses_defaults() {
        let engine = engine();
        let query = SearchQuery::new(NYC_CENTER, 5_000.0).page(0, 0);

        let result = block_on(engine.search_places(None, query)).unwrap();

        assert_eq!(result.pagination.page, 1);
        assert_eq!(result.pagination.page_size, 20);
        assert_eq!(result.data.len(), 7);
    }

    #[test]
    fn anonymous_search_leaves_favorites_unevaluated() {
        let engine = engine();

        let result = block_on(engine.search_places(None, SearchQuery::new(NYC_CENTER, 5_000.0)))
            .unwrap();

        assert!(result.data.iter().all(|r| r.is_favorited.is_none()));
    }

    #[test]
    fn signed_in_search_marks_favorites() {
        let engine = engine();
        block_on(engine.store().add_favorite(TEST_USER, 8)).unwrap();

        let result = block_on(engine.search_places(
            Some(User::new(TEST_USER)),
            SearchQuery::new(NYC_CENTER, 5_000.0),
        ))
        .unwrap();

        for place in result.data.iter() {
            assert_eq!(place.is_favorited, Some(place.id == 8), "place {}", place.id);
        }
    }

    #[test]
    fn malformed_center_is_invalid_argument() {
        let engine = engine();
        let query = SearchQuery::new(Coordinates::new(123.0, 0.0), 5_000.0);

        let err = block_on(engine.search_places(None, query)).unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn store_failure_is_service_unavailable() {
        let engine = engine();
        engine.store().set_offline(true);

        let result = block_on(engine.search_places(None, SearchQuery::new(NYC_CENTER, 5_000.0)));

        assert_matches!(result, Err(err) if err.kind == ErrorKind::ServiceUnavailable);
    }
}
