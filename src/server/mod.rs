mod extract;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::{server_error, Error};
use crate::server::handlers::{categories, favorites, places};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/categories", get(categories::list))
        .route("/places/search", get(places::search))
        .route("/favorites", post(favorites::add).get(favorites::list))
        .route("/favorites/check/:place_id", get(favorites::check))
        .route("/favorites/:favorite_id", delete(favorites::remove))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(server_error)
}
