use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Json, Query, RequestParts};
use axum::BoxError;
use serde::de::DeserializeOwned;

use crate::error::{invalid_input_error, Error};

/// `Query<T>` whose rejection is the crate's `InvalidArgument` error.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for QueryParams<T>
where
    T: DeserializeOwned,
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request(req)
            .await
            .map_err(|err| invalid_input_error(err.to_string()))?;

        Ok(Self(params))
    }
}

/// `Json<T>` whose rejection is the crate's `InvalidArgument` error.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for JsonBody<T>
where
    T: DeserializeOwned,
    B: HttpBody + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req)
            .await
            .map_err(|err| invalid_input_error(err.to_string()))?;

        Ok(Self(body))
    }
}
