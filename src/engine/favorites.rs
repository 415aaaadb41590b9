use crate::{
    entities::{RouteSnapshot, SavedRoute},
    error::{not_found_error, validation_error, Error},
    storage::DynStore,
};

pub const FAVORITES_KEY: &str = "favoriteRoutes";

/// Saved routes kept as one JSON array under a single storage key. Every
/// operation reads the whole collection and writes it back whole.
pub struct FavoritesStore {
    store: DynStore,
}

impl FavoritesStore {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SavedRoute>, Error> {
        match self.store.get(FAVORITES_KEY).await? {
            Some(data) if !data.trim().is_empty() => Ok(serde_json::from_str(&data)?),
            _ => Ok(Vec::new()),
        }
    }

    async fn persist(&self, routes: &[SavedRoute]) -> Result<(), Error> {
        let data = serde_json::to_string(routes)?;

        self.store.set(FAVORITES_KEY, data).await
    }

    /// Appends a route. `route` is `None` when nothing has been computed
    /// yet, which is rejected just like an empty name.
    #[tracing::instrument(skip(self, route))]
    pub async fn save(&self, route: Option<RouteSnapshot>, name: &str) -> Result<SavedRoute, Error> {
        let route = route.ok_or_else(|| validation_error("compute a route first"))?;

        if name.trim().is_empty() {
            return Err(validation_error("a route needs a name"));
        }

        let mut routes = self.list().await?;
        let mut saved = SavedRoute::new(route, name.to_string());

        // ids are creation timestamps; two saves inside one millisecond must
        // still get distinct ids
        if let Some(latest) = routes.iter().map(|route| route.id).max() {
            saved.id = saved.id.max(latest + 1);
        }

        routes.push(saved.clone());
        self.persist(&routes).await?;

        tracing::info!(id = saved.id, "saved favorite route");

        Ok(saved)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<SavedRoute, Error> {
        self.list()
            .await?
            .into_iter()
            .find(|route| route.id == id)
            .ok_or_else(not_found_error)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i64) -> Result<(), Error> {
        let routes = self.list().await?;
        let remaining: Vec<SavedRoute> = routes.iter().filter(|route| route.id != id).cloned().collect();

        if remaining.len() == routes.len() {
            tracing::debug!("no favorite with id {}", id);
            return Ok(());
        }

        self.persist(&remaining).await
    }

    pub async fn clear(&self) -> Result<(), Error> {
        self.store.remove(FAVORITES_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Coordinates, Summary, Waypoint};
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;
    use tokio_test::block_on;

    fn stop(address: &str, lat: f64) -> Waypoint {
        Waypoint {
            address: address.into(),
            coordinates: Coordinates::new(lat, -45.0),
            note: None,
        }
    }

    fn route() -> RouteSnapshot {
        RouteSnapshot {
            origin: stop("Rio de Janeiro", -22.9),
            waypoints: vec![
                Waypoint {
                    note: Some("abastecer".into()),
                    ..stop("Registro", -24.5)
                },
                stop("Santos", -23.9),
            ],
            destination: stop("São Paulo", -23.5),
            summary: Summary {
                distance_text: "400.0 km".into(),
                duration_text: "5h 0min".into(),
            },
        }
    }

    fn favorites() -> (Arc<MemoryStore>, FavoritesStore) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), FavoritesStore::new(store))
    }

    #[test]
    fn save_then_get_round_trips() {
        let (_, favorites) = favorites();

        block_on(async {
            let saved = favorites.save(Some(route()), "X").await.unwrap();
            let found = favorites.get_by_id(saved.id).await.unwrap();

            assert_eq!(found.name, "X");
            assert_eq!(found.route, route());
            assert_eq!(found, saved);
        });
    }

    #[test]
    fn save_rejects_missing_summary_and_empty_name() {
        let (store, favorites) = favorites();

        block_on(async {
            favorites.save(Some(route()), "first").await.unwrap();
            let before = store.get(FAVORITES_KEY).await.unwrap();

            assert!(favorites.save(None, "X").await.unwrap_err().is_validation());
            assert!(favorites.save(Some(route()), "").await.unwrap_err().is_validation());
            assert!(favorites.save(Some(route()), "  ").await.unwrap_err().is_validation());

            assert_eq!(store.get(FAVORITES_KEY).await.unwrap(), before);
        });
    }

    #[test]
    fn list_keeps_insertion_order_and_unique_ids() {
        let (_, favorites) = favorites();

        block_on(async {
            for name in ["b", "a", "c"] {
                favorites.save(Some(route()), name).await.unwrap();
            }

            let routes = favorites.list().await.unwrap();
            let names: Vec<&str> = routes.iter().map(|route| route.name.as_str()).collect();
            assert_eq!(names, vec!["b", "a", "c"]);
            assert!(routes[0].id < routes[1].id && routes[1].id < routes[2].id);
        });
    }

    #[test]
    fn delete_removes_exactly_one() {
        let (_, favorites) = favorites();

        block_on(async {
            let first = favorites.save(Some(route()), "one").await.unwrap();
            favorites.save(Some(route()), "two").await.unwrap();

            favorites.delete_by_id(first.id).await.unwrap();

            assert!(favorites.get_by_id(first.id).await.unwrap_err().is_not_found());
            assert_eq!(favorites.list().await.unwrap().len(), 1);

            favorites.delete_by_id(first.id).await.unwrap();
            assert_eq!(favorites.list().await.unwrap().len(), 1);
        });
    }

    #[test]
    fn reads_collections_written_by_the_browser_app() {
        let (store, favorites) = favorites();

        let data = r#"[{
            "id": 1717171717171,
            "name": "Praia",
            "origin": {"address": "Rio", "coordinates": {"lat": -22.9, "lng": -43.2}},
            "waypoints": [],
            "destination": {"address": "Búzios", "coordinates": {"lat": -22.7, "lng": -41.9}},
            "summary": {"distanceText": "170.2 km", "durationText": "2h 41min"},
            "savedAt": "31/05/2024, 12:08:37"
        }]"#;

        block_on(async {
            store.set(FAVORITES_KEY, data.into()).await.unwrap();

            let route = favorites.get_by_id(1717171717171).await.unwrap();
            assert_eq!(route.route.destination.address, "Búzios");
            assert_eq!(route.route.summary.duration_text, "2h 41min");
        });
    }

    #[test]
    fn clear_drops_the_collection() {
        let (_, favorites) = favorites();

        block_on(async {
            favorites.save(Some(route()), "one").await.unwrap();
            favorites.clear().await.unwrap();

            assert!(favorites.list().await.unwrap().is_empty());
        });
    }
}
