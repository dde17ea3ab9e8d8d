use anyhow::{bail, Context};
use serde::Deserialize;

/// Process settings, read from environment variables
/// (`DATABASE_URL`, `USE_IN_MEMORY_DB`, `HOST`, `PORT`, `EXPORT_TRACES`)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub use_in_memory_db: bool,
    #[serde(default = "Settings::default_host")]
    pub host: String,
    #[serde(default = "Settings::default_port")]
    pub port: u16,
    #[serde(default)]
    pub export_traces: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSettings {
    InMemory,
    Postgres { database_url: String },
}

impl Settings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::from_environment(config::Environment::default().try_parsing(true))
    }

    fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(environment)
            .build()
            .context("Failed to read environment")?
            .try_deserialize()
            .context("Failed to parse settings")
    }

    /// Postgres unless the in-memory store was asked for.
    /// A missing connection string is a startup error, never a per-request one
    pub fn storage(&self) -> anyhow::Result<StorageSettings> {
        if self.use_in_memory_db {
            return Ok(StorageSettings::InMemory);
        }
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(StorageSettings::Postgres {
                database_url: url.to_string(),
            }),
            _ => bail!("DATABASE_URL is not set"),
        }
    }
}
