mod category_api;
mod favorite_api;
mod favorite_overlay;
mod place_search_api;

pub use favorite_overlay::overlay_favorites;

use crate::{api::API, store::Store};

/// Default page size for the favorites listing.
pub const FAVORITES_PAGE_SIZE: i64 = 10;

/// Stateless orchestrator; all state lives behind `store`.
pub struct Engine<S> {
    store: S,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: Store + 'static> API for Engine<S> {}
