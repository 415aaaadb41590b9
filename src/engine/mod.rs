mod draft_api;
mod favorites;
mod favorites_api;
mod location_api;
mod markers;
mod reconstruction;

#[cfg(test)]
pub(crate) mod fakes;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use markers::{DynSurface, HeadlessSurface, MapSurface, MarkerRegistry};

use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

use crate::{
    api::API,
    entities::{Coordinates, FieldKey, RouteDraft, Summary},
    error::{not_found_error, unexpected_error, Error},
    external::DynMaps,
    storage::DynStore,
};

const EVENT_CAPACITY: usize = 256;

/// What changed in a session, in the order it changed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DraftEvent {
    SlotCreated { key: FieldKey },
    SlotRemoved { key: FieldKey },
    PointSet { key: FieldKey, address: String },
    AddressSet { key: FieldKey, address: String },
    NoteSet { key: FieldKey },
    MarkerPlaced { key: FieldKey, label: String },
    MarkerReleased { key: FieldKey },
    Computed { summary: Summary },
    Cleared,
}

struct Session {
    draft: RouteDraft,
    markers: MarkerRegistry,
}

/// One planning session: the draft being edited, its markers and a handle
/// to the saved favorites.
pub struct Engine {
    session: Mutex<Session>,
    surface: DynSurface,
    favorites: FavoritesStore,
    maps: DynMaps,
    events: broadcast::Sender<DraftEvent>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(maps: DynMaps, surface: DynSurface, store: DynStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            session: Mutex::new(Session {
                draft: RouteDraft::new(),
                markers: MarkerRegistry::new(surface.clone()),
            }),
            surface,
            favorites: FavoritesStore::new(store),
            maps,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DraftEvent> {
        self.events.subscribe()
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, Error> {
        self.session.lock().map_err(|_| unexpected_error())
    }

    fn emit(&self, event: DraftEvent) {
        // nobody listening is fine
        let _ = self.events.send(event);
    }

    /// (Re)places the marker for `key` from the field's current address and
    /// coordinates. Fields without coordinates get no marker.
    fn sync_marker(&self, session: &mut Session, key: &FieldKey) {
        let (title, coordinates) = match session.draft.field(key) {
            Some(field) => match field.coordinates {
                Some(coordinates) => (field.address.clone(), coordinates),
                None => return,
            },
            None => return,
        };

        let position = session.draft.waypoint_position(key).unwrap_or(1);
        let placed = session.markers.place(*key, coordinates, title, position);

        self.emit(DraftEvent::MarkerPlaced {
            key: *key,
            label: placed.marker.style.label.clone(),
        });
    }

    fn apply_point(
        &self,
        key: &FieldKey,
        address: String,
        coordinates: Coordinates,
    ) -> Result<(), Error> {
        let mut session = self.session()?;

        session.draft.set_point(key, address.clone(), coordinates)?;
        self.emit(DraftEvent::PointSet { key: *key, address });
        self.sync_marker(&mut session, key);

        Ok(())
    }

    fn apply_note(&self, key: &FieldKey, text: String) -> Result<(), Error> {
        let mut session = self.session()?;

        session.draft.set_note(key, text)?;
        self.emit(DraftEvent::NoteSet { key: *key });

        Ok(())
    }

    fn create_slot(&self) -> Result<FieldKey, Error> {
        let mut session = self.session()?;

        let key = session.draft.add_waypoint_slot();
        self.emit(DraftEvent::SlotCreated { key });

        Ok(key)
    }

    fn reset(&self) -> Result<(), Error> {
        let mut session = self.session()?;

        session.draft.clear();
        session.markers.release_all();
        self.emit(DraftEvent::Cleared);

        Ok(())
    }

    fn ensure_field(&self, key: &FieldKey) -> Result<(), Error> {
        match self.session()?.draft.field(key) {
            Some(_) => Ok(()),
            None => Err(not_found_error()),
        }
    }
}

impl API for Engine {}
