use super::Engine;

use async_trait::async_trait;

use crate::{
    api::CategoryAPI,
    entities::Category,
    error::Error,
    store::{CategoryStore, Store},
};

#[async_trait]
impl<S: Store> CategoryAPI for Engine<S> {
    #[tracing::instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.store.list_categories().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::nyc_store;
    use tokio_test::block_on;

    #[test]
    fn categories_are_sorted_by_name() {
        let engine = Engine::new(block_on(nyc_store()));

        let names: Vec<String> = block_on(engine.list_categories())
            .unwrap()
            .into_iter()
            .map(|category| category.name)
            .collect();

        assert_eq!(names, vec!["Coffee", "Gas Stations", "Store"]);
    }
}
