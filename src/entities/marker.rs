use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, FieldKey};

pub const ORIGIN_COLOR: &str = "#4caf50";
pub const DESTINATION_COLOR: &str = "#f44336";
pub const WAYPOINT_COLOR: &str = "#ff9800";

/// Opaque reference to a marker living on the map surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerHandle(pub u64);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub label: String,
    pub color: String,
}

impl MarkerStyle {
    /// `position` is the 1-based index of a waypoint among the slots
    /// currently rendered; it is ignored for origin and destination.
    pub fn for_field(key: &FieldKey, position: usize) -> Self {
        match key {
            FieldKey::Origin => Self {
                label: "A".into(),
                color: ORIGIN_COLOR.into(),
            },
            FieldKey::Destination => Self {
                label: "B".into(),
                color: DESTINATION_COLOR.into(),
            },
            FieldKey::Waypoint(_) => Self {
                label: position.to_string(),
                color: WAYPOINT_COLOR.into(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub key: FieldKey,
    pub coordinates: Coordinates,
    pub title: String,
    pub style: MarkerStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    #[serde(flatten)]
    pub marker: Marker,
}
