use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    Coordinates, ExportDocument, FieldKey, Leg, PointField, RouteSnapshot, Summary, Waypoint,
    WaypointSlot,
};
use crate::error::{not_found_error, provider_error, validation_error, Error};

/// An intermediate stop sent to the routing provider, remembered together
/// with the slot it came from so results can be written back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub key: FieldKey,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub stops: Vec<Stop>,
}

impl RouteRequest {
    pub fn stop_addresses(&self) -> Vec<String> {
        self.stops.iter().map(|stop| stop.address.clone()).collect()
    }
}

/// The route being edited in a session.
///
/// `computed` holds the last successful computation. Edits made after it do
/// not invalidate it; saving, sharing and exporting always work from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteDraft {
    pub origin: PointField,
    pub destination: PointField,
    pub waypoints: Vec<WaypointSlot>,
    pub computed: Option<RouteSnapshot>,
    #[serde(skip)]
    next_waypoint: usize,
}

impl RouteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, key: &FieldKey) -> Option<&PointField> {
        match key {
            FieldKey::Origin => Some(&self.origin),
            FieldKey::Destination => Some(&self.destination),
            FieldKey::Waypoint(_) => self
                .waypoints
                .iter()
                .find(|slot| &slot.key == key)
                .map(|slot| &slot.field),
        }
    }

    fn field_mut(&mut self, key: &FieldKey) -> Result<&mut PointField, Error> {
        match key {
            FieldKey::Origin => Ok(&mut self.origin),
            FieldKey::Destination => Ok(&mut self.destination),
            FieldKey::Waypoint(_) => self
                .waypoints
                .iter_mut()
                .find(|slot| &slot.key == key)
                .map(|slot| &mut slot.field)
                .ok_or_else(not_found_error),
        }
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.computed.as_ref().map(|route| &route.summary)
    }

    pub fn set_point(
        &mut self,
        key: &FieldKey,
        address: String,
        coordinates: Coordinates,
    ) -> Result<(), Error> {
        let field = self.field_mut(key)?;
        field.address = address;
        field.coordinates = Some(coordinates);

        Ok(())
    }

    /// A typed edit. Coordinates are left as they were until a geocode
    /// catches up with the text.
    pub fn set_address(&mut self, key: &FieldKey, address: String) -> Result<(), Error> {
        self.field_mut(key)?.address = address;

        Ok(())
    }

    pub fn set_note(&mut self, key: &FieldKey, text: String) -> Result<(), Error> {
        let field = self.field_mut(key)?;
        field.note = if text.is_empty() { None } else { Some(text) };

        Ok(())
    }

    pub fn add_waypoint_slot(&mut self) -> FieldKey {
        let key = FieldKey::Waypoint(self.next_waypoint);
        self.next_waypoint += 1;

        self.waypoints.push(WaypointSlot {
            key,
            field: PointField::default(),
        });

        key
    }

    /// Remaining slots keep their keys; nothing is renumbered.
    pub fn remove_waypoint_slot(&mut self, key: &FieldKey) -> Result<WaypointSlot, Error> {
        if !key.is_waypoint() {
            return Err(validation_error("only waypoints can be removed"));
        }

        let index = self
            .waypoints
            .iter()
            .position(|slot| &slot.key == key)
            .ok_or_else(not_found_error)?;

        Ok(self.waypoints.remove(index))
    }

    /// 1-based position of a waypoint among the slots currently present.
    pub fn waypoint_position(&self, key: &FieldKey) -> Option<usize> {
        self.waypoints
            .iter()
            .position(|slot| &slot.key == key)
            .map(|index| index + 1)
    }

    /// The field a map click should fill: origin, then the waypoint slots in
    /// order, then destination.
    pub fn next_empty_field(&self) -> Option<FieldKey> {
        if self.origin.is_empty() {
            return Some(FieldKey::Origin);
        }

        if let Some(slot) = self.waypoints.iter().find(|slot| slot.field.is_empty()) {
            return Some(slot.key);
        }

        if self.destination.is_empty() {
            return Some(FieldKey::Destination);
        }

        None
    }

    pub fn route_request(&self) -> Result<RouteRequest, Error> {
        if self.origin.is_empty() || self.destination.is_empty() {
            return Err(validation_error("origin and destination are required"));
        }

        let stops = self
            .waypoints
            .iter()
            .filter(|slot| !slot.field.is_empty())
            .map(|slot| Stop {
                key: slot.key,
                address: slot.field.address.trim().to_string(),
            })
            .collect();

        Ok(RouteRequest {
            origin: self.origin.address.trim().to_string(),
            destination: self.destination.address.trim().to_string(),
            stops,
        })
    }

    /// Folds the provider's legs into a new computed route.
    ///
    /// Stop `j` takes the end of leg `j`; a stop with no intermediate leg to
    /// match is left out of the result. Origin and destination come from the
    /// first and last legs. The draft's fields receive the same coordinates.
    pub fn apply_route(
        &mut self,
        request: &RouteRequest,
        legs: &[Leg],
    ) -> Result<&RouteSnapshot, Error> {
        let (first, last) = match (legs.first(), legs.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(provider_error("ZERO_RESULTS")),
        };

        let origin = Waypoint {
            address: request.origin.clone(),
            coordinates: first.start,
            note: self.origin.note(),
        };

        let destination = Waypoint {
            address: request.destination.clone(),
            coordinates: last.end,
            note: self.destination.note(),
        };

        let mut waypoints = Vec::with_capacity(request.stops.len());

        for (j, stop) in request.stops.iter().enumerate() {
            if j >= legs.len() - 1 {
                tracing::warn!("no leg for stop {}, dropping it from the route", stop.key);
                continue;
            }

            let coordinates = legs[j].end;
            let note = self.field(&stop.key).and_then(|field| field.note());

            if let Ok(field) = self.field_mut(&stop.key) {
                field.coordinates = Some(coordinates);
            }

            waypoints.push(Waypoint {
                address: stop.address.clone(),
                coordinates,
                note,
            });
        }

        self.origin.coordinates = Some(origin.coordinates);
        self.destination.coordinates = Some(destination.coordinates);

        let summary = Summary::from_legs(legs);

        Ok(&*self.computed.insert(RouteSnapshot {
            origin,
            waypoints,
            destination,
            summary,
        }))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn google_maps_link(&self) -> Option<String> {
        self.computed.as_ref().map(|route| route.google_maps_link())
    }

    pub fn export_document(&self, exported_at: DateTime<Utc>) -> Option<ExportDocument> {
        self.computed
            .as_ref()
            .map(|route| ExportDocument::new(route, exported_at))
    }
}
