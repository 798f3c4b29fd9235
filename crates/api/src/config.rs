//! Configuration loading.
//!
//! Layers, later wins:
//! 1. Defaults in code
//! 2. Optional `barstock.toml` (path overridable with `BARSTOCK_CONFIG`)
//! 3. Environment variables with the `BARSTOCK__` prefix, e.g.
//!    `BARSTOCK__STORAGE__BACKEND=postgres`,
//!    `BARSTOCK__LOCATIONS__KNOWN=almacen,barra`

use anyhow::Context;
use config::{ConfigError, Environment, File};
use serde::Deserialize;

use barstock_core::{IncomeSourceId, LocationId, Registry};
use barstock_observability::LogFormat;

const DEFAULT_LOCATIONS: [&str; 3] = ["almacen", "barra", "camara"];
const DEFAULT_PRIMARY_LOCATION: &str = "almacen";
const DEFAULT_INCOME_SOURCES: [&str; 3] = ["barra", "terraza", "eventos"];

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub locations: LocationsConfig,
    pub income_sources: IncomeSourcesConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Required when `backend = "postgres"`.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

/// Physical stock locations. Stock is reset into `primary` after an analysis.
#[derive(Debug, Deserialize, Clone)]
pub struct LocationsConfig {
    pub known: Vec<String>,
    pub primary: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IncomeSourcesConfig {
    pub known: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from defaults, the optional file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("BARSTOCK_CONFIG").unwrap_or_else(|_| "barstock".into());

        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.max_connections", 5)?
            .set_default("locations.known", DEFAULT_LOCATIONS.to_vec())?
            .set_default("locations.primary", DEFAULT_PRIMARY_LOCATION)?
            .set_default("income_sources.known", DEFAULT_INCOME_SOURCES.to_vec())?
            .set_default("log.filter", "info")?
            .set_default("log.format", "json")?
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("BARSTOCK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("locations.known")
                    .with_list_parse_key("income_sources.known"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Location registry with the configured primary location marked.
    pub fn location_registry(&self) -> anyhow::Result<Registry<LocationId>> {
        Registry::new(&self.locations.known)
            .and_then(|r| r.with_primary(&self.locations.primary))
            .context("invalid [locations] configuration")
    }

    pub fn income_source_registry(&self) -> anyhow::Result<Registry<IncomeSourceId>> {
        Registry::new(&self.income_sources.known).context("invalid [income_sources] configuration")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database_url: None,
            max_connections: 5,
        }
    }
}

impl Default for LocationsConfig {
    fn default() -> Self {
        Self {
            known: DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            primary: DEFAULT_PRIMARY_LOCATION.to_string(),
        }
    }
}

impl Default for IncomeSourcesConfig {
    fn default() -> Self {
        Self {
            known: DEFAULT_INCOME_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}
