use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Waypoint};

const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// One leg of a computed route, as returned by the routing provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub start: Coordinates,
    pub end: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub distance_text: String,
    pub duration_text: String,
}

impl Summary {
    pub fn from_legs(legs: &[Leg]) -> Self {
        let meters: u64 = legs.iter().map(|leg| leg.distance_meters).sum();
        let seconds: u64 = legs.iter().map(|leg| leg.duration_seconds).sum();

        // tenths of a km, halves rounded up
        let tenths = (meters + 50) / 100;

        Self {
            distance_text: format!("{}.{} km", tenths / 10, tenths % 10),
            duration_text: format!("{}h {}min", seconds / 3600, (seconds % 3600) / 60),
        }
    }
}

/// The result of a successful computation: every stop resolved to
/// coordinates, plus the totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    pub origin: Waypoint,
    pub waypoints: Vec<Waypoint>,
    pub destination: Waypoint,
    pub summary: Summary,
}

impl RouteSnapshot {
    pub fn google_maps_link(&self) -> String {
        let mut url = String::from(MAPS_DIRECTIONS_URL);

        url.push_str("&origin=");
        url.push_str(&String::from(self.origin.coordinates));
        url.push_str("&destination=");
        url.push_str(&String::from(self.destination.coordinates));

        if !self.waypoints.is_empty() {
            let waypoints: Vec<String> = self
                .waypoints
                .iter()
                .map(|waypoint| waypoint.coordinates.into())
                .collect();

            url.push_str("&waypoints=");
            url.push_str(&waypoints.join("|"));
        }

        url.push_str("&travelmode=driving");
        url
    }
}

/// A favorite route as persisted in the key-value store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRoute {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub route: RouteSnapshot,
    pub saved_at: String,
}

impl SavedRoute {
    pub fn new(route: RouteSnapshot, name: String) -> Self {
        let now = Local::now();

        Self {
            id: now.timestamp_millis(),
            name,
            route,
            saved_at: now.format("%d/%m/%Y %H:%M:%S").to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub origin: Waypoint,
    pub waypoints: Vec<Waypoint>,
    pub destination: Waypoint,
    pub summary: Summary,
    pub google_maps_url: String,
    pub exported_at: DateTime<Utc>,
}

impl ExportDocument {
    pub fn new(route: &RouteSnapshot, exported_at: DateTime<Utc>) -> Self {
        Self {
            origin: route.origin.clone(),
            waypoints: route.waypoints.clone(),
            destination: route.destination.clone(),
            summary: route.summary.clone(),
            google_maps_url: route.google_maps_link(),
            exported_at,
        }
    }

    pub fn file_name(&self) -> String {
        format!("rota_{}.json", self.exported_at.timestamp_millis())
    }
}
