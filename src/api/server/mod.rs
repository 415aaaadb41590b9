mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};

use crate::api::server::handlers::{draft, favorites, places};
use crate::api::{interface::DynAPI, API};
use crate::error::{unexpected_error, Error};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/draft", get(draft::show))
        .route("/draft/points/:key", put(draft::set_point))
        .route("/draft/addresses/:key", put(draft::set_address))
        .route("/draft/notes/:key", put(draft::set_note))
        .route("/draft/waypoints", post(draft::add_waypoint))
        .route("/draft/waypoints/:key", axum::routing::delete(draft::remove_waypoint))
        .route("/draft/geocode/:key", post(places::geocode_field))
        .route("/draft/places/:key", post(places::select_place))
        .route("/draft/compute", post(draft::compute))
        .route("/draft/clear", post(draft::clear))
        .route("/draft/link", get(draft::link))
        .route("/draft/export", get(draft::export))
        .route("/markers", get(draft::markers))
        .route("/map/click", post(places::map_click))
        .route("/places/suggestions", get(places::suggestions))
        .route("/favorites", get(favorites::list).post(favorites::save))
        .route("/favorites/:id", get(favorites::find).delete(favorites::delete))
        .route("/favorites/:id/load", post(favorites::load))
        .route("/favorites/:id/link", get(favorites::link))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(router(api).into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}
