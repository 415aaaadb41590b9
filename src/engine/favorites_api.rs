use super::Engine;

use async_trait::async_trait;

use crate::{
    api::FavoritesAPI,
    entities::{SavedRoute, Summary},
    error::Error,
};

#[async_trait]
impl FavoritesAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_favorites(&self) -> Result<Vec<SavedRoute>, Error> {
        self.favorites.list().await
    }

    #[tracing::instrument(skip(self))]
    async fn save_favorite(&self, name: String) -> Result<SavedRoute, Error> {
        let route = self.session()?.draft.computed.clone();

        self.favorites.save(route, &name).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_favorite(&self, id: i64) -> Result<Option<SavedRoute>, Error> {
        match self.favorites.get_by_id(id).await {
            Ok(route) => Ok(Some(route)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_favorite(&self, id: i64) -> Result<(), Error> {
        self.favorites.delete_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn favorite_link(&self, id: i64) -> Result<Option<String>, Error> {
        Ok(self
            .find_favorite(id)
            .await?
            .map(|saved| saved.route.google_maps_link()))
    }

    #[tracing::instrument(skip(self))]
    async fn load_favorite(&self, id: i64) -> Result<Option<Summary>, Error> {
        let saved = match self.find_favorite(id).await? {
            Some(saved) => saved,
            None => {
                tracing::debug!("no favorite with id {}, nothing to load", id);
                return Ok(None);
            }
        };

        Ok(Some(self.reconstruct(&saved).await?))
    }
}
