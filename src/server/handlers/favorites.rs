use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::auth::User;
use crate::entities::{Favorite, FavoriteEntry, FavoriteId, PlaceId};
use crate::error::{invalid_input_error, Error};
use crate::search::Paginated;
use crate::server::extract::{JsonBody, QueryParams};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParams {
    place_id: PlaceId,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    page: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct AddResponse {
    message: String,
    favorite: Favorite,
    created: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    is_favorited: bool,
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    message: String,
}

fn positive_id(id: i64, name: &str) -> Result<i64, Error> {
    if id < 1 {
        return Err(invalid_input_error(format!(
            "{} must be a valid positive integer",
            name
        )));
    }

    Ok(id)
}

pub async fn add(
    Extension(api): Extension<DynAPI>,
    user: User,
    JsonBody(params): JsonBody<AddParams>,
) -> Result<Json<AddResponse>, Error> {
    let place_id = positive_id(params.place_id, "placeId")?;

    let added = api.add_favorite(user, place_id).await?;
    let created = added.is_created();

    Ok(AddResponse {
        message: if created {
            "Place added to favorites".into()
        } else {
            "Place already in favorites".into()
        },
        favorite: added.into_favorite(),
        created,
    }
    .into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Paginated<FavoriteEntry>>, Error> {
    let favorites = api
        .list_favorites(user, params.page, params.page_size)
        .await?;

    Ok(favorites.into())
}

pub async fn check(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(place_id): Path<PlaceId>,
) -> Result<Json<CheckResponse>, Error> {
    let place_id = positive_id(place_id, "placeId")?;

    let is_favorited = api.is_favorited(user, place_id).await?;

    Ok(CheckResponse { is_favorited }.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(favorite_id): Path<FavoriteId>,
) -> Result<Json<MessageResponse>, Error> {
    let favorite_id = positive_id(favorite_id, "favoriteId")?;

    api.remove_favorite(user, favorite_id).await?;

    Ok(MessageResponse {
        message: "Favorite removed successfully".into(),
    }
    .into())
}
