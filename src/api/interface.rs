use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{
    Coordinates, ExportDocument, FieldKey, PlacedMarker, RouteDraft, SavedRoute, Summary,
};
use crate::error::Error;
use crate::external::PlaceSuggestion;

#[async_trait]
pub trait DraftAPI {
    async fn draft(&self) -> Result<RouteDraft, Error>;
    async fn markers(&self) -> Result<Vec<PlacedMarker>, Error>;
    async fn set_point(
        &self,
        key: FieldKey,
        address: String,
        coordinates: Coordinates,
    ) -> Result<(), Error>;
    async fn set_address(&self, key: FieldKey, address: String) -> Result<(), Error>;
    async fn set_note(&self, key: FieldKey, text: String) -> Result<(), Error>;
    async fn add_waypoint_slot(&self) -> Result<FieldKey, Error>;
    async fn remove_waypoint_slot(&self, key: FieldKey) -> Result<(), Error>;
    async fn compute(&self) -> Result<Summary, Error>;
    async fn clear(&self) -> Result<(), Error>;
    async fn google_maps_link(&self) -> Result<Option<String>, Error>;
    async fn export_document(&self) -> Result<Option<ExportDocument>, Error>;
}

#[async_trait]
pub trait LocationAPI {
    async fn geocode_field(&self, key: FieldKey, address: String) -> Result<(), Error>;
    async fn suggest_places(
        &self,
        input: String,
        session_token: String,
    ) -> Result<Vec<PlaceSuggestion>, Error>;
    async fn select_place(
        &self,
        key: FieldKey,
        place_id: String,
        session_token: String,
    ) -> Result<(), Error>;
    async fn handle_map_click(&self, coordinates: Coordinates) -> Result<Option<FieldKey>, Error>;
}

#[async_trait]
pub trait FavoritesAPI {
    async fn list_favorites(&self) -> Result<Vec<SavedRoute>, Error>;
    async fn save_favorite(&self, name: String) -> Result<SavedRoute, Error>;
    async fn find_favorite(&self, id: i64) -> Result<Option<SavedRoute>, Error>;
    async fn delete_favorite(&self, id: i64) -> Result<(), Error>;
    async fn favorite_link(&self, id: i64) -> Result<Option<String>, Error>;
    async fn load_favorite(&self, id: i64) -> Result<Option<Summary>, Error>;
}

pub trait API: DraftAPI + LocationAPI + FavoritesAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
