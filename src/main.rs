use std::sync::Arc;

use roteiro::api::serve;
use roteiro::config::{Config, StorageConfig};
use roteiro::db::PgStore;
use roteiro::engine::{Engine, HeadlessSurface};
use roteiro::error::Error;
use roteiro::external::google_maps::GoogleMaps;
use roteiro::storage::{DynStore, FileStore, MemoryStore};

async fn open_store(storage: &StorageConfig) -> Result<DynStore, Error> {
    let store: DynStore = match storage {
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
        StorageConfig::File(path) => Arc::new(FileStore::new(path)),
        StorageConfig::Postgres {
            uri,
            max_connections,
        } => Arc::new(PgStore::new(uri, *max_connections).await?),
    };

    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    tracing::info!(?config, "starting roteiro");

    let store = open_store(&config.storage).await?;

    let engine = Engine::new(
        Arc::new(GoogleMaps::new(&config)),
        Arc::new(HeadlessSurface::default()),
        store,
    );

    serve(engine, config.listen).await
}
