mod filter;
mod pagination;

pub use filter::{Clause, SearchFilter, SearchFilterBuilder};
pub use pagination::{PageRequest, PageWindow, Paginated, Pagination};

use serde::{Deserialize, Serialize};

use crate::entities::{CategoryId, Coordinates};
use crate::error::{invalid_input_error, Error};

/// Default page size for place search.
pub const SEARCH_PAGE_SIZE: i64 = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub center: Coordinates,
    pub radius_meters: f64,
    pub category_id: Option<CategoryId>,
    pub keyword: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl SearchQuery {
    pub fn new(center: Coordinates, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
            category_id: None,
            keyword: None,
            page: None,
            page_size: None,
        }
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn page(mut self, page: i64, page_size: i64) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Rejects inputs that should have been caught upstream but reached the
    /// engine anyway.
    pub fn validate(&self) -> Result<(), Error> {
        self.center.validate()?;

        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(invalid_input_error("radius must be a positive number"));
        }

        Ok(())
    }

    pub fn filter(&self) -> SearchFilter {
        SearchFilterBuilder::new(self.center, self.radius_meters)
            .category(self.category_id)
            .keyword(self.keyword.as_deref())
            .build()
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::resolve(self.page, self.page_size, SEARCH_PAGE_SIZE)
    }
}
