use std::env;
use std::net::SocketAddr;

use crate::error::{validation_error, Error};

pub const DEFAULT_API_BASE: &str = "maps.googleapis.com";
pub const DEFAULT_COUNTRY: &str = "br";
pub const DEFAULT_STORAGE: &str = "roteiro.json";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api";

#[derive(Clone, Debug, PartialEq)]
pub enum StorageConfig {
    Memory,
    File(String),
    Postgres { uri: String, max_connections: u32 },
}

#[derive(Clone, PartialEq)]
pub struct Config {
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    pub country: String,
    pub storage: StorageConfig,
    pub listen: SocketAddr,
    pub backend_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("google_maps_api_base", &self.google_maps_api_base)
            .field("country", &self.country)
            .field("storage", &self.storage)
            .field("listen", &self.listen)
            .field("backend_url", &self.backend_url)
            .finish()
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let or_default = |name: &str, default: &str| -> String {
            lookup(name).unwrap_or_else(|_| default.to_string())
        };

        let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")?;

        let storage = parse_storage(
            &or_default("ROTEIRO_STORAGE", DEFAULT_STORAGE),
            &or_default("ROTEIRO_DB_MAX_CONNECTIONS", "5"),
        )?;

        let listen = or_default("ROTEIRO_LISTEN", DEFAULT_LISTEN)
            .parse()
            .map_err(|_| validation_error("ROTEIRO_LISTEN is not a socket address"))?;

        Ok(Self {
            google_maps_api_base: or_default("GOOGLE_MAPS_API_BASE", DEFAULT_API_BASE),
            google_maps_api_key,
            country: or_default("ROTEIRO_COUNTRY", DEFAULT_COUNTRY).to_lowercase(),
            storage,
            listen,
            backend_url: or_default("ROTEIRO_BACKEND_URL", DEFAULT_BACKEND_URL),
        })
    }
}

fn parse_storage(value: &str, max_connections: &str) -> Result<StorageConfig, Error> {
    if value == "memory" {
        return Ok(StorageConfig::Memory);
    }

    if value.starts_with("postgres://") || value.starts_with("postgresql://") {
        let max_connections = max_connections
            .parse()
            .map_err(|_| validation_error("ROTEIRO_DB_MAX_CONNECTIONS is not a number"))?;

        return Ok(StorageConfig::Postgres {
            uri: value.to_string(),
            max_connections,
        });
    }

    Ok(StorageConfig::File(value.to_string()))
}
