use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::markers::MapSurface;
use crate::{
    entities::{Coordinates, FieldKey, Leg, Marker, MarkerHandle},
    error::{provider_error, unexpected_error, Error},
    external::{GeocodedAddress, Geocoder, PlaceSuggestion, PlacesProvider, RoutingProvider},
};

/// Keeps track of live markers and logs every call in order.
#[derive(Default)]
pub struct RecordingSurface {
    next: AtomicU64,
    live: Mutex<HashSet<MarkerHandle>>,
    log: Mutex<Vec<String>>,
    refuse_slots: bool,
}

impl RecordingSurface {
    /// A surface whose waypoint slots never become ready.
    pub fn refusing_slots() -> Self {
        Self {
            refuse_slots: true,
            ..Self::default()
        }
    }

    pub fn live_markers(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl MapSurface for RecordingSurface {
    fn add_marker(&self, marker: &Marker) -> MarkerHandle {
        let handle = MarkerHandle(self.next.fetch_add(1, Ordering::SeqCst));
        self.live.lock().unwrap().insert(handle);
        self.log.lock().unwrap().push(format!(
            "marker:{}:{}",
            marker.key, marker.style.label
        ));

        handle
    }

    fn remove_marker(&self, handle: MarkerHandle) {
        self.live.lock().unwrap().remove(&handle);
    }

    async fn slot_ready(&self, key: &FieldKey) -> Result<(), Error> {
        tokio::task::yield_now().await;

        if self.refuse_slots {
            return Err(unexpected_error());
        }

        self.log.lock().unwrap().push(format!("slot:{}", key));

        Ok(())
    }
}

pub type RouteCall = (String, String, Vec<String>);

/// Scripted maps provider. Route answers are consumed in order; once the
/// script runs out every call fails with `ZERO_RESULTS`.
#[derive(Default)]
pub struct FakeMaps {
    routes: Mutex<VecDeque<Result<Vec<Leg>, Error>>>,
    calls: Mutex<Vec<RouteCall>>,
    places: HashMap<String, GeocodedAddress>,
    reverse: HashMap<String, String>,
}

impl FakeMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(self, legs: Vec<Leg>) -> Self {
        self.routes.lock().unwrap().push_back(Ok(legs));
        self
    }

    pub fn with_route_error(self, status: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push_back(Err(provider_error(status)));
        self
    }

    pub fn with_place(mut self, query: &str, formatted: &str, coordinates: Coordinates) -> Self {
        self.places.insert(
            query.into(),
            GeocodedAddress {
                formatted_address: formatted.into(),
                coordinates,
            },
        );
        self
    }

    pub fn with_reverse(mut self, coordinates: Coordinates, address: &str) -> Self {
        self.reverse.insert(coordinates.into(), address.into());
        self
    }

    pub fn route_calls(&self) -> Vec<RouteCall> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn leg(meters: u64, seconds: u64, start: (f64, f64), end: (f64, f64)) -> Leg {
    Leg {
        distance_meters: meters,
        duration_seconds: seconds,
        start: Coordinates::new(start.0, start.1),
        end: Coordinates::new(end.0, end.1),
    }
}

#[async_trait]
impl RoutingProvider for FakeMaps {
    async fn compute_route(
        &self,
        origin: &str,
        destination: &str,
        stops: &[String],
    ) -> Result<Vec<Leg>, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((origin.into(), destination.into(), stops.to_vec()));

        let next = self.routes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(provider_error("ZERO_RESULTS")))
    }
}

#[async_trait]
impl Geocoder for FakeMaps {
    async fn forward_geocode(&self, address: &str) -> Result<GeocodedAddress, Error> {
        self.places
            .get(address)
            .cloned()
            .ok_or_else(|| provider_error("ZERO_RESULTS"))
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error> {
        let key: String = coordinates.into();

        self.reverse
            .get(&key)
            .cloned()
            .ok_or_else(|| provider_error("ZERO_RESULTS"))
    }
}

#[async_trait]
impl PlacesProvider for FakeMaps {
    async fn suggestions(
        &self,
        input: &str,
        _session_token: &str,
    ) -> Result<Vec<PlaceSuggestion>, Error> {
        let mut suggestions: Vec<PlaceSuggestion> = self
            .places
            .iter()
            .filter(|(id, _)| id.starts_with(input))
            .map(|(id, place)| PlaceSuggestion {
                place_id: id.clone(),
                description: place.formatted_address.clone(),
            })
            .collect();
        suggestions.sort_by(|a, b| a.place_id.cmp(&b.place_id));

        Ok(suggestions)
    }

    async fn place(&self, place_id: &str, _session_token: &str) -> Result<GeocodedAddress, Error> {
        self.forward_geocode(place_id).await
    }
}
