use serde::{Deserialize, Serialize};

/// A page request after defaults have been applied: both fields are >= 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Missing or non-positive values fall back to page 1 and
    /// `default_page_size`. Each call site supplies its own default.
    pub fn resolve(page: Option<i64>, page_size: Option<i64>, default_page_size: i64) -> Self {
        Self {
            page: page.filter(|page| *page >= 1).unwrap_or(1),
            page_size: page_size
                .filter(|page_size| *page_size >= 1)
                .unwrap_or(default_page_size),
        }
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: self.page_size,
            offset: (self.page - 1).saturating_mul(self.page_size),
        }
    }
}

/// LIMIT/OFFSET pair handed to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Applies the window to an already ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(0))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total_records: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total_records: u64) -> Self {
        let page_size = request.page_size.max(1) as u64;
        let total_pages = (total_records + page_size - 1) / page_size;
        let page = request.page as u64;

        Self {
            page: request.page,
            page_size: request.page_size,
            total_records,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
