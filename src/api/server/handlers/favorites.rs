use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    api::interface::DynAPI,
    entities::{SavedRoute, Summary},
    error::{not_found_error, Error},
};

#[derive(Serialize, Deserialize)]
pub struct SaveParams {
    name: String,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<SavedRoute>>, Error> {
    let routes = api.list_favorites().await?;

    Ok(routes.into())
}

pub async fn save(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SaveParams>,
) -> Result<(StatusCode, Json<SavedRoute>), Error> {
    let route = api.save_favorite(params.name).await?;

    Ok((StatusCode::CREATED, route.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<SavedRoute>, Error> {
    let route = api.find_favorite(id).await?.ok_or_else(not_found_error)?;

    Ok(route.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
    api.delete_favorite(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Unknown ids answer `null` rather than an error.
pub async fn load(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Option<Summary>>, Error> {
    let summary = api.load_favorite(id).await?;

    Ok(summary.into())
}

pub async fn link(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, Error> {
    let url = api.favorite_link(id).await?.ok_or_else(not_found_error)?;

    Ok(Json(json!({ "url": url })))
}
