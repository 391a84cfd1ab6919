mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::isochrones;

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    // trailing slash variants are what the browser client requests
    Router::new()
        .route("/isochrone", get(isochrones::compute))
        .route("/isochrone/", get(isochrones::compute))
        .route("/isochrone/save", post(isochrones::save))
        .route("/isochrones", get(isochrones::list))
        .route("/isochrones/", get(isochrones::list))
        .layer(Extension(api))
        .layer(CorsLayer::permissive())
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(unexpected_error)?
        .serve(app.into_make_service())
        .await
        .map_err(unexpected_error)
}
