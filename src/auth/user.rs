use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::entities::UserId;
use crate::error::{unauthenticated_error, Error};

/// Set by the authenticating gateway in front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self { id }
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let id: UserId = headers.get(USER_ID_HEADER)?.to_str().ok()?.trim().parse().ok()?;

        (id > 0).then(|| Self::new(id))
    }
}

#[async_trait]
impl<B: Send> FromRequest<B> for User {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        User::from_headers(req.headers()).ok_or_else(unauthenticated_error)
    }
}
