mod draft;
mod location;
mod marker;
mod route;
mod waypoint;

pub use draft::{RouteDraft, RouteRequest, Stop};
pub use location::Coordinates;
pub use marker::{Marker, MarkerHandle, MarkerStyle, PlacedMarker};
pub use route::{ExportDocument, Leg, RouteSnapshot, SavedRoute, Summary};
pub use waypoint::{FieldKey, PointField, Waypoint, WaypointSlot};
