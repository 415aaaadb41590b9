use super::{DraftEvent, Engine};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    api::DraftAPI,
    entities::{Coordinates, ExportDocument, FieldKey, PlacedMarker, RouteDraft, Summary},
    error::Error,
    external::RoutingProvider,
};

#[async_trait]
impl DraftAPI for Engine {
    async fn draft(&self) -> Result<RouteDraft, Error> {
        Ok(self.session()?.draft.clone())
    }

    async fn markers(&self) -> Result<Vec<PlacedMarker>, Error> {
        Ok(self.session()?.markers.markers().to_vec())
    }

    #[tracing::instrument(skip(self))]
    async fn set_point(
        &self,
        key: FieldKey,
        address: String,
        coordinates: Coordinates,
    ) -> Result<(), Error> {
        self.apply_point(&key, address, coordinates)
    }

    #[tracing::instrument(skip(self))]
    async fn set_address(&self, key: FieldKey, address: String) -> Result<(), Error> {
        let mut session = self.session()?;

        session.draft.set_address(&key, address.clone())?;
        self.emit(DraftEvent::AddressSet { key, address });

        Ok(())
    }

    #[tracing::instrument(skip(self, text))]
    async fn set_note(&self, key: FieldKey, text: String) -> Result<(), Error> {
        self.apply_note(&key, text)
    }

    #[tracing::instrument(skip(self))]
    async fn add_waypoint_slot(&self) -> Result<FieldKey, Error> {
        self.create_slot()
    }

    #[tracing::instrument(skip(self))]
    async fn remove_waypoint_slot(&self, key: FieldKey) -> Result<(), Error> {
        let mut session = self.session()?;

        session.draft.remove_waypoint_slot(&key)?;
        self.emit(DraftEvent::SlotRemoved { key });

        if session.markers.release(&key) {
            self.emit(DraftEvent::MarkerReleased { key });
        }

        Ok(())
    }

    /// Asks the routing provider for the current draft and folds the answer
    /// back in. The session is not locked while the provider works, so a
    /// second call started meanwhile may land after this one and win.
    #[tracing::instrument(skip(self))]
    async fn compute(&self) -> Result<Summary, Error> {
        let request = self.session()?.draft.route_request()?;

        tracing::info!(stops = request.stops.len(), "computing route");

        let legs = self
            .maps
            .compute_route(
                &request.origin,
                &request.destination,
                &request.stop_addresses(),
            )
            .await?;

        let mut session = self.session()?;
        let summary = session.draft.apply_route(&request, &legs)?.summary.clone();

        let resolved = request.stops.len().min(legs.len() - 1);
        self.sync_marker(&mut session, &FieldKey::Origin);
        for stop in &request.stops[..resolved] {
            self.sync_marker(&mut session, &stop.key);
        }
        self.sync_marker(&mut session, &FieldKey::Destination);

        self.emit(DraftEvent::Computed {
            summary: summary.clone(),
        });

        tracing::info!(
            distance = %summary.distance_text,
            duration = %summary.duration_text,
            "route computed"
        );

        Ok(summary)
    }

    #[tracing::instrument(skip(self))]
    async fn clear(&self) -> Result<(), Error> {
        self.reset()
    }

    async fn google_maps_link(&self) -> Result<Option<String>, Error> {
        Ok(self.session()?.draft.google_maps_link())
    }

    async fn export_document(&self) -> Result<Option<ExportDocument>, Error> {
        Ok(self.session()?.draft.export_document(Utc::now()))
    }
}
