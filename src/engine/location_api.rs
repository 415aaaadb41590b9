use super::Engine;

use async_trait::async_trait;

use crate::{
    api::LocationAPI,
    entities::{Coordinates, FieldKey},
    error::Error,
    external::{Geocoder, PlaceSuggestion, PlacesProvider},
};

#[async_trait]
impl LocationAPI for Engine {
    /// Geocodes text typed into a field. The typed text stays the field's
    /// address; only the coordinates and the marker follow the geocoder.
    #[tracing::instrument(skip(self))]
    async fn geocode_field(&self, key: FieldKey, address: String) -> Result<(), Error> {
        if address.trim().is_empty() {
            return Ok(());
        }

        self.ensure_field(&key)?;

        let geocoded = self.maps.forward_geocode(&address).await?;

        self.apply_point(&key, address, geocoded.coordinates)
    }

    #[tracing::instrument(skip(self))]
    async fn suggest_places(
        &self,
        input: String,
        session_token: String,
    ) -> Result<Vec<PlaceSuggestion>, Error> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        self.maps.suggestions(&input, &session_token).await
    }

    #[tracing::instrument(skip(self))]
    async fn select_place(
        &self,
        key: FieldKey,
        place_id: String,
        session_token: String,
    ) -> Result<(), Error> {
        self.ensure_field(&key)?;

        let place = self.maps.place(&place_id, &session_token).await?;

        self.apply_point(&key, place.formatted_address, place.coordinates)
    }

    /// Fills the first empty field with the clicked address. Returns the
    /// field that was filled, or `None` when every field already had one.
    #[tracing::instrument(skip(self))]
    async fn handle_map_click(&self, coordinates: Coordinates) -> Result<Option<FieldKey>, Error> {
        let address = self.maps.reverse_geocode(coordinates).await?;

        // the draft may have changed while the geocoder was busy, so the
        // target field is chosen only now
        let target = self.session()?.draft.next_empty_field();

        match target {
            Some(key) => {
                self.apply_point(&key, address, coordinates)?;
                Ok(Some(key))
            }
            None => {
                tracing::info!("every field is filled, ignoring map click");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        api::{DraftAPI, LocationAPI},
        engine::{
            fakes::{FakeMaps, RecordingSurface},
            Engine,
        },
        entities::{Coordinates, FieldKey},
        storage::MemoryStore,
    };
    use std::sync::Arc;
    use tokio_test::block_on;

    fn engine(maps: FakeMaps) -> Engine {
        Engine::new(
            Arc::new(maps),
            Arc::new(RecordingSurface::default()),
            Arc::new(MemoryStore::new()),
        )
    }

    #[test]
    fn geocoding_keeps_the_typed_address() {
        let engine = engine(FakeMaps::new().with_place(
            "registro sp",
            "Registro, SP, Brasil",
            Coordinates::new(-24.49, -47.84),
        ));

        block_on(async {
            let stop = engine.add_waypoint_slot().await.unwrap();
            engine
                .geocode_field(stop, "registro sp".into())
                .await
                .unwrap();

            let draft = engine.draft().await.unwrap();
            let field = draft.field(&stop).unwrap();
            assert_eq!(field.address, "registro sp");
            assert_eq!(field.coordinates, Some(Coordinates::new(-24.49, -47.84)));

            let markers = engine.markers().await.unwrap();
            assert_eq!(markers[0].marker.key, stop);
        });
    }

    #[test]
    fn failed_geocode_is_reported_and_changes_nothing() {
        let engine = engine(FakeMaps::new());

        block_on(async {
            let err = engine
                .geocode_field(FieldKey::Origin, "???".into())
                .await
                .unwrap_err();
            assert!(err.is_provider());
            assert!(engine.markers().await.unwrap().is_empty());

            let err = engine
                .geocode_field(FieldKey::Waypoint(9), "Santos".into())
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        });
    }

    #[test]
    fn selecting_a_place_uses_the_formatted_address() {
        let engine = engine(FakeMaps::new().with_place(
            "place-santos",
            "Santos, SP, Brasil",
            Coordinates::new(-23.96, -46.33),
        ));

        block_on(async {
            let suggestions = engine
                .suggest_places("place-".into(), "session".into())
                .await
                .unwrap();
            assert_eq!(suggestions.len(), 1);
            assert!(engine
                .suggest_places("  ".into(), "session".into())
                .await
                .unwrap()
                .is_empty());

            engine
                .select_place(
                    FieldKey::Destination,
                    suggestions[0].place_id.clone(),
                    "session".into(),
                )
                .await
                .unwrap();

            let draft = engine.draft().await.unwrap();
            assert_eq!(draft.destination.address, "Santos, SP, Brasil");
        });
    }

    #[test]
    fn map_clicks_fill_origin_then_waypoints_then_destination() {
        let a = Coordinates::new(1.0, 1.0);
        let b = Coordinates::new(2.0, 2.0);
        let c = Coordinates::new(3.0, 3.0);
        let d = Coordinates::new(4.0, 4.0);

        let engine = engine(
            FakeMaps::new()
                .with_reverse(a, "A")
                .with_reverse(b, "B")
                .with_reverse(c, "C")
                .with_reverse(d, "D"),
        );

        block_on(async {
            let stop = engine.add_waypoint_slot().await.unwrap();

            assert_eq!(engine.handle_map_click(a).await.unwrap(), Some(FieldKey::Origin));
            assert_eq!(engine.handle_map_click(b).await.unwrap(), Some(stop));
            assert_eq!(
                engine.handle_map_click(c).await.unwrap(),
                Some(FieldKey::Destination)
            );
            assert_eq!(engine.handle_map_click(d).await.unwrap(), None);

            let draft = engine.draft().await.unwrap();
            assert_eq!(draft.origin.address, "A");
            assert_eq!(draft.waypoints[0].field.address, "B");
            assert_eq!(draft.destination.coordinates, Some(c));
            assert_eq!(engine.markers().await.unwrap().len(), 3);
        });
    }
}
