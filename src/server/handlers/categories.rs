use axum::extract::{Extension, Json};

use crate::api::DynAPI;
use crate::entities::Category;
use crate::error::Error;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Category>>, Error> {
    let categories = api.list_categories().await?;

    Ok(categories.into())
}
