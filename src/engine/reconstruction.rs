use super::Engine;

use crate::{
    api::DraftAPI,
    entities::{FieldKey, SavedRoute, Summary, Waypoint},
    error::Error,
};

/// Where a replay currently stands. Each step starts only after the previous
/// one has finished, so slot `i` always exists before its address arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    Origin,
    Waypoint(usize),
    Destination,
    Compute,
}

impl Engine {
    /// Replays a saved route into a cleared draft and recomputes it.
    #[tracing::instrument(skip(self, saved), fields(id = saved.id, name = %saved.name))]
    pub async fn reconstruct(&self, saved: &SavedRoute) -> Result<Summary, Error> {
        let route = &saved.route;

        self.reset()?;

        let after_origin = if route.waypoints.is_empty() {
            Step::Destination
        } else {
            Step::Waypoint(0)
        };

        let mut step = Step::Origin;

        loop {
            tracing::debug!(?step, "reconstruction step");

            step = match step {
                Step::Origin => {
                    self.restore(&FieldKey::Origin, &route.origin)?;
                    after_origin
                }
                Step::Waypoint(index) => {
                    let key = self.create_slot()?;
                    self.surface.slot_ready(&key).await?;
                    self.restore(&key, &route.waypoints[index])?;

                    if index + 1 < route.waypoints.len() {
                        Step::Waypoint(index + 1)
                    } else {
                        Step::Destination
                    }
                }
                Step::Destination => {
                    self.restore(&FieldKey::Destination, &route.destination)?;
                    Step::Compute
                }
                Step::Compute => return self.compute().await,
            };
        }
    }

    fn restore(&self, key: &FieldKey, waypoint: &Waypoint) -> Result<(), Error> {
        self.apply_point(key, waypoint.address.clone(), waypoint.coordinates)?;

        if let Some(note) = &waypoint.note {
            self.apply_note(key, note.clone())?;
        }

        Ok(())
    }
}
