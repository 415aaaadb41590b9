pub mod backend;
pub mod google_maps;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::{Coordinates, Leg};
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub formatted_address: String,
    pub coordinates: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub place_id: String,
    pub description: String,
}

/// Driving directions between addresses. Stops are visited in the order
/// given, each one as a stopover.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn compute_route(
        &self,
        origin: &str,
        destination: &str,
        stops: &[String],
    ) -> Result<Vec<Leg>, Error>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward_geocode(&self, address: &str) -> Result<GeocodedAddress, Error>;
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error>;
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn suggestions(
        &self,
        input: &str,
        session_token: &str,
    ) -> Result<Vec<PlaceSuggestion>, Error>;

    async fn place(&self, place_id: &str, session_token: &str) -> Result<GeocodedAddress, Error>;
}

/// Everything the engine consumes from the mapping service.
pub trait MapsProvider: RoutingProvider + Geocoder + PlacesProvider {}

impl<T: RoutingProvider + Geocoder + PlacesProvider> MapsProvider for T {}

pub type DynMaps = Arc<dyn MapsProvider>;
