use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field_key;
use crate::{
    api::interface::DynAPI,
    entities::{Coordinates, FieldKey, RouteDraft},
    error::Error,
    external::PlaceSuggestion,
};

#[derive(Serialize, Deserialize)]
pub struct SuggestionParams {
    input: String,
    session_token: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SuggestionsResponse {
    session_token: String,
    suggestions: Vec<PlaceSuggestion>,
}

#[derive(Serialize, Deserialize)]
pub struct GeocodeParams {
    address: String,
}

#[derive(Serialize, Deserialize)]
pub struct SelectPlaceParams {
    place_id: String,
    session_token: String,
}

#[derive(Serialize, Deserialize)]
pub struct MapClickResponse {
    key: Option<FieldKey>,
}

/// Starts a new autocomplete session when the caller has none yet.
pub async fn suggestions(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<SuggestionParams>,
) -> Result<Json<SuggestionsResponse>, Error> {
    let session_token = params
        .session_token
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let suggestions = api
        .suggest_places(params.input, session_token.clone())
        .await?;

    Ok(SuggestionsResponse {
        session_token,
        suggestions,
    }
    .into())
}

pub async fn select_place(
    Extension(api): Extension<DynAPI>,
    Path(key): Path<String>,
    Json(params): Json<SelectPlaceParams>,
) -> Result<Json<RouteDraft>, Error> {
    api.select_place(field_key(&key)?, params.place_id, params.session_token)
        .await?;

    Ok(api.draft().await?.into())
}

pub async fn geocode_field(
    Extension(api): Extension<DynAPI>,
    Path(key): Path<String>,
    Json(params): Json<GeocodeParams>,
) -> Result<Json<RouteDraft>, Error> {
    api.geocode_field(field_key(&key)?, params.address).await?;

    Ok(api.draft().await?.into())
}

pub async fn map_click(
    Extension(api): Extension<DynAPI>,
    Json(coordinates): Json<Coordinates>,
) -> Result<Json<MapClickResponse>, Error> {
    let key = api.handle_map_click(coordinates).await?;

    Ok(MapClickResponse { key }.into())
}
