use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::entities::Coordinates;
use crate::error::{validation_error, Error};

/// Identifies one editable field of a draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Origin,
    Destination,
    Waypoint(usize),
}

impl FieldKey {
    pub fn is_waypoint(&self) -> bool {
        matches!(self, FieldKey::Waypoint(_))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Origin => write!(f, "origin"),
            FieldKey::Destination => write!(f, "destination"),
            FieldKey::Waypoint(index) => write!(f, "waypoint-{}", index),
        }
    }
}

impl FromStr for FieldKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin" => Ok(FieldKey::Origin),
            "destination" => Ok(FieldKey::Destination),
            _ => s
                .strip_prefix("waypoint-")
                .and_then(|index| index.parse().ok())
                .map(FieldKey::Waypoint)
                .ok_or_else(|| validation_error("unknown field key")),
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: Error| serde::de::Error::custom(e.message))
    }
}

/// A resolved stop of a computed route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub address: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The editable state behind one draft field. Coordinates stay empty until a
/// geocode, a place selection, a map click or a computation provides them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointField {
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub note: Option<String>,
}

impl PointField {
    pub fn is_empty(&self) -> bool {
        self.address.trim().is_empty()
    }

    pub fn note(&self) -> Option<String> {
        self.note.clone().filter(|note| !note.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaypointSlot {
    pub key: FieldKey,
    #[serde(flatten)]
    pub field: PointField,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_parse_and_print() {
        for key in [FieldKey::Origin, FieldKey::Destination, FieldKey::Waypoint(7)] {
            assert_eq!(key.to_string().parse::<FieldKey>().unwrap(), key);
        }

        assert_eq!("waypoint-3".parse::<FieldKey>().unwrap(), FieldKey::Waypoint(3));
        assert!("waypoint-".parse::<FieldKey>().unwrap_err().is_validation());
        assert!("stop-1".parse::<FieldKey>().is_err());
    }

    #[test]
    fn waypoint_note_is_omitted_when_absent() {
        let waypoint = Waypoint {
            address: "Registro".into(),
            coordinates: Coordinates::new(-24.49, -47.84),
            note: None,
        };

        let value = serde_json::to_value(&waypoint).unwrap();
        assert!(value.get("note").is_none());
        assert_eq!(value["coordinates"]["lat"], -24.49);
    }
}
