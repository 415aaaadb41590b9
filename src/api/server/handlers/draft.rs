use axum::extract::{Extension, Json, Path};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::field_key;
use crate::{
    api::interface::DynAPI,
    entities::{Coordinates, FieldKey, PlacedMarker, RouteDraft, Summary},
    error::{validation_error, Error},
};

/// Notes longer than this are cut at the input surface.
pub const MAX_NOTE_CHARS: usize = 500;

/// Cuts a note to `MAX_NOTE_CHARS` characters, never inside a character.
fn clip_note(text: String) -> String {
    match text.char_indices().nth(MAX_NOTE_CHARS) {
        Some((end, _)) => text[..end].to_string(),
        None => text,
    }
}

#[derive(Serialize, Deserialize)]
pub struct PointParams {
    address: String,
    coordinates: Coordinates,
}

#[derive(Serialize, Deserialize)]
pub struct AddressParams {
    address: String,
}

#[derive(Serialize, Deserialize)]
pub struct NoteParams {
    text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SlotResponse {
    key: FieldKey,
}

pub async fn show(Extension(api): Extension<DynAPI>) -> Result<Json<RouteDraft>, Error> {
    let draft = api.draft().await?;

    Ok(draft.into())
}

pub async fn markers(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<PlacedMarker>>, Error> {
    let markers = api.markers().await?;

    Ok(markers.into())
}

pub async fn set_point(
    Extension(api): Extension<DynAPI>,
    Path(key): Path<String>,
    Json(params): Json<PointParams>,
) -> Result<Json<RouteDraft>, Error> {
    api.set_point(field_key(&key)?, params.address, params.coordinates)
        .await?;

    Ok(api.draft().await?.into())
}

pub async fn set_address(
    Extension(api): Extension<DynAPI>,
    Path(key): Path<String>,
    Json(params): Json<AddressParams>,
) -> Result<Json<RouteDraft>, Error> {
    api.set_address(field_key(&key)?, params.address).await?;

    Ok(api.draft().await?.into())
}

pub async fn set_note(
    Extension(api): Extension<DynAPI>,
    Path(key): Path<String>,
    Json(params): Json<NoteParams>,
) -> Result<Json<RouteDraft>, Error> {
    api.set_note(field_key(&key)?, clip_note(params.text)).await?;

    Ok(api.draft().await?.into())
}

pub async fn add_waypoint(Extension(api): Extension<DynAPI>) -> Result<Json<SlotResponse>, Error> {
    let key = api.add_waypoint_slot().await?;

    Ok(SlotResponse { key }.into())
}

pub async fn remove_waypoint(
    Extension(api): Extension<DynAPI>,
    Path(key): Path<String>,
) -> Result<Json<RouteDraft>, Error> {
    api.remove_waypoint_slot(field_key(&key)?).await?;

    Ok(api.draft().await?.into())
}

pub async fn compute(Extension(api): Extension<DynAPI>) -> Result<Json<Summary>, Error> {
    let summary = api.compute().await?;

    Ok(summary.into())
}

pub async fn clear(Extension(api): Extension<DynAPI>) -> Result<Json<RouteDraft>, Error> {
    api.clear().await?;

    Ok(api.draft().await?.into())
}

pub async fn link(Extension(api): Extension<DynAPI>) -> Result<Json<serde_json::Value>, Error> {
    let url = api
        .google_maps_link()
        .await?
        .ok_or_else(|| validation_error("compute a route first"))?;

    Ok(Json(json!({ "url": url })))
}

pub async fn export(Extension(api): Extension<DynAPI>) -> Result<Response, Error> {
    let document = api
        .export_document()
        .await?
        .ok_or_else(|| validation_error("compute a route first"))?;

    let disposition = format!("attachment; filename=\"{}\"", document.file_name());
    let body = serde_json::to_string_pretty(&document)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
