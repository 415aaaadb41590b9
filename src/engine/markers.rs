use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{
    entities::{Coordinates, FieldKey, Marker, MarkerHandle, MarkerStyle, PlacedMarker},
    error::Error,
};

/// Whatever draws the map and the input slots.
#[async_trait]
pub trait MapSurface: Send + Sync {
    fn add_marker(&self, marker: &Marker) -> MarkerHandle;

    fn remove_marker(&self, handle: MarkerHandle);

    /// Resolves once the UI element for a freshly created waypoint slot
    /// exists and can receive an address.
    async fn slot_ready(&self, _key: &FieldKey) -> Result<(), Error> {
        Ok(())
    }
}

pub type DynSurface = Arc<dyn MapSurface>;

/// A surface with nothing to draw on; it only hands out handles. Used when
/// the UI lives on the other side of the HTTP API and reads `/markers`.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    next: AtomicU64,
}

#[async_trait]
impl MapSurface for HeadlessSurface {
    fn add_marker(&self, marker: &Marker) -> MarkerHandle {
        let handle = MarkerHandle(self.next.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(?handle, key = %marker.key, label = %marker.style.label, "marker added");

        handle
    }

    fn remove_marker(&self, handle: MarkerHandle) {
        tracing::debug!(?handle, "marker removed");
    }
}

/// Field key -> marker on the surface, never more than one per key.
pub struct MarkerRegistry {
    surface: DynSurface,
    entries: Vec<PlacedMarker>,
}

impl MarkerRegistry {
    pub fn new(surface: DynSurface) -> Self {
        Self {
            surface,
            entries: Vec::new(),
        }
    }

    /// `position` is the waypoint's 1-based slot position, used for its
    /// label.
    pub fn place(
        &mut self,
        key: FieldKey,
        coordinates: Coordinates,
        title: String,
        position: usize,
    ) -> &PlacedMarker {
        self.release(&key);

        let marker = Marker {
            key,
            coordinates,
            title,
            style: MarkerStyle::for_field(&key, position),
        };
        let handle = self.surface.add_marker(&marker);

        self.entries.push(PlacedMarker { handle, marker });
        &self.entries[self.entries.len() - 1]
    }

    pub fn release(&mut self, key: &FieldKey) -> bool {
        match self.entries.iter().position(|entry| &entry.marker.key == key) {
            Some(index) => {
                let entry = self.entries.remove(index);
                self.surface.remove_marker(entry.handle);
                true
            }
            None => false,
        }
    }

    pub fn release_all(&mut self) {
        for entry in self.entries.drain(..) {
            self.surface.remove_marker(entry.handle);
        }
    }

    pub fn get(&self, key: &FieldKey) -> Option<&PlacedMarker> {
        self.entries.iter().find(|entry| &entry.marker.key == key)
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.entries
    }
}
