use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::auth::User;
use crate::entities::{CategoryId, Coordinates, SearchResult};
use crate::error::{invalid_input_error, Error};
use crate::search::{Paginated, SearchQuery};
use crate::server::extract::QueryParams;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    lat: f64,
    lng: f64,
    /// Kilometres.
    radius: f64,
    category_id: Option<CategoryId>,
    keyword: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
}

impl SearchParams {
    pub fn into_query(self) -> Result<SearchQuery, Error> {
        let center = Coordinates::new(self.lat, self.lng);
        center.validate()?;

        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(invalid_input_error("radius must be a positive number"));
        }

        if matches!(self.category_id, Some(id) if id < 1) {
            return Err(invalid_input_error("categoryId must be a positive integer"));
        }

        if matches!(self.page, Some(page) if page < 1) {
            return Err(invalid_input_error("page must be a positive integer"));
        }

        if matches!(self.page_size, Some(page_size) if page_size < 1) {
            return Err(invalid_input_error("pageSize must be a positive integer"));
        }

        Ok(SearchQuery {
            center,
            radius_meters: self.radius * 1000.0,
            category_id: self.category_id,
            keyword: self.keyword,
            page: self.page,
            page_size: self.page_size,
        })
    }
}

pub async fn search(
    Extension(api): Extension<DynAPI>,
    user: Option<User>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Paginated<SearchResult>>, Error> {
    let query = params.into_query()?;

    tracing::info!(
        user_id = user.map(|user| user.id),
        lat = query.center.lat,
        lng = query.center.lng,
        radius_meters = query.radius_meters,
        "search places"
    );

    let results = api.search_places(user, query).await?;

    Ok(results.into())
}
