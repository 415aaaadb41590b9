use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{Coordinates, Leg},
    error::{provider_error, Error},
    external::{GeocodedAddress, Geocoder, PlaceSuggestion, PlacesProvider, RoutingProvider},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Place {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Value {
    value: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsLeg {
    distance: Value,
    duration: Value,
    start_location: Coordinates,
    end_location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    result: Option<T>,
    results: Option<T>,
    predictions: Option<T>,
    routes: Option<T>,
}

/// Client for the Google Maps web services (directions, geocoding, places).
#[derive(Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    key: String,
    country: String,
}

impl std::fmt::Debug for GoogleMaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMaps")
            .field("api_base", &self.api_base)
            .field("country", &self.country)
            .finish()
    }
}

impl GoogleMaps {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.google_maps_api_base.clone(),
            key: config.google_maps_api_key.clone(),
            country: config.country.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("https://{}/maps/api/{}/json", self.api_base, path)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response<T>, Error> {
        let res = self
            .client
            .get(self.url(path))
            .query(&[("key", &self.key)])
            .query(query)
            .send()
            .await?;

        check_http_status(res.status().as_u16())?;

        Ok(res.json().await?)
    }
}

/// Transport failures count as provider failures, like a non-OK body status.
fn check_http_status(status_code: u16) -> Result<(), Error> {
    if status_code != 200 {
        tracing::warn!("maps provider failed with http {}", status_code);
        return Err(provider_error(&status_code.to_string()));
    }

    Ok(())
}

fn ensure_ok<T>(data: &Response<T>) -> Result<(), Error> {
    if data.status != "OK" {
        tracing::warn!("maps provider answered {}", data.status);
        return Err(provider_error(&data.status));
    }

    Ok(())
}

#[async_trait]
impl RoutingProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn compute_route(
        &self,
        origin: &str,
        destination: &str,
        stops: &[String],
    ) -> Result<Vec<Leg>, Error> {
        let mut query = vec![
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", "driving".to_string()),
        ];

        if !stops.is_empty() {
            query.push(("waypoints", stops.join("|")));
        }

        let data: Response<Vec<DirectionsRoute>> = self.fetch("directions", &query).await?;

        ensure_ok(&data)?;

        let route = data
            .routes
            .and_then(|routes| routes.into_iter().next())
            .ok_or_else(|| provider_error("ZERO_RESULTS"))?;

        Ok(route
            .legs
            .into_iter()
            .map(|leg| Leg {
                distance_meters: leg.distance.value,
                duration_seconds: leg.duration.value,
                start: leg.start_location,
                end: leg.end_location,
            })
            .collect())
    }
}

#[async_trait]
impl Geocoder for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn forward_geocode(&self, address: &str) -> Result<GeocodedAddress, Error> {
        let data: Response<Vec<Place>> = self
            .fetch("geocode", &[("address", address.to_string())])
            .await?;

        ensure_ok(&data)?;

        let place = data
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| provider_error("ZERO_RESULTS"))?;

        Ok(GeocodedAddress {
            formatted_address: place.formatted_address,
            coordinates: place.geometry.location,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error> {
        let data: Response<Vec<Place>> = self
            .fetch("geocode", &[("latlng", String::from(coordinates))])
            .await?;

        ensure_ok(&data)?;

        data.results
            .and_then(|results| results.into_iter().next())
            .map(|place| place.formatted_address)
            .ok_or_else(|| provider_error("ZERO_RESULTS"))
    }
}

#[async_trait]
impl PlacesProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn suggestions(
        &self,
        input: &str,
        session_token: &str,
    ) -> Result<Vec<PlaceSuggestion>, Error> {
        let query = [
            ("input", input.to_string()),
            ("types", "geocode".to_string()),
            ("components", format!("country:{}", self.country)),
            ("sessiontoken", session_token.to_string()),
        ];

        let data: Response<Vec<PlaceSuggestion>> =
            self.fetch("place/autocomplete", &query).await?;

        if !(data.status == "OK" || data.status == "ZERO_RESULTS") {
            return Err(provider_error(&data.status));
        }

        Ok(data.predictions.unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    async fn place(&self, place_id: &str, session_token: &str) -> Result<GeocodedAddress, Error> {
        let query = [
            ("place_id", place_id.to_string()),
            ("fields", "formatted_address,geometry".to_string()),
            ("sessiontoken", session_token.to_string()),
        ];

        let data: Response<Place> = self.fetch("place/details", &query).await?;

        ensure_ok(&data)?;

        let place = data
            .result
            .ok_or_else(|| provider_error("ZERO_RESULTS"))?;

        Ok(GeocodedAddress {
            formatted_address: place.formatted_address,
            coordinates: place.geometry.location,
        })
    }
}
