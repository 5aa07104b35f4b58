//! Connection configuration for the products REST endpoint.
//!
//! Values come from an optional JSON config file and the environment, with
//! the environment taking precedence. A `.env` file in the working directory
//! is loaded first when present.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Collection written to when none is configured.
pub const DEFAULT_COLLECTION: &str = "products";

/// Environment variables consulted for each setting, in priority order.
const ENDPOINT_VARS: &[&str] = &["SEED_ENDPOINT", "SUPABASE_URL"];
const API_KEY_VARS: &[&str] = &["SEED_API_KEY", "SUPABASE_SERVICE_ROLE_KEY"];
const COLLECTION_VARS: &[&str] = &["SEED_COLLECTION"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {setting}: set {vars} or add it to the config file")]
    Missing {
        setting: &'static str,
        vars: String,
    },
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Endpoint must be an http(s) URL, got {0:?}")]
    InvalidEndpoint(String),
}

/// Settings needed to reach the products collection.
#[derive(Clone, PartialEq)]
pub struct SeedConfig {
    /// Base URL of the hosted project, e.g. `https://abc.supabase.co`.
    pub endpoint: String,
    /// Service key, sent both as `apikey` and as the bearer token.
    pub api_key: String,
    /// Table name under `/rest/v1/`.
    pub collection_path: String,
}

/// On-disk shape of the config file. Every field is optional so the
/// environment can fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    endpoint: Option<String>,
    #[serde(alias = "api_key")]
    api_key: Option<String>,
    #[serde(alias = "collection_path")]
    collection_path: Option<String>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SeedConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            collection_path: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Sets the target collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection_path = collection.into();
        self
    }

    /// Loads configuration from `.env`, the optional config file, and the
    /// process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let file = match config_path {
            Some(path) => {
                debug!("Reading config file {}", path.display());
                ConfigFile::read(path)?
            }
            None => ConfigFile::default(),
        };

        Self::resolve(file, |var| std::env::var(var).ok())
    }

    fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |vars: &[&str], fallback: Option<String>| {
            vars.iter()
                .find_map(|&var| env(var))
                .or(fallback)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let endpoint = lookup(ENDPOINT_VARS, file.endpoint).ok_or_else(|| ConfigError::Missing {
            setting: "endpoint",
            vars: ENDPOINT_VARS.join(" or "),
        })?;
        let api_key = lookup(API_KEY_VARS, file.api_key).ok_or_else(|| ConfigError::Missing {
            setting: "API key",
            vars: API_KEY_VARS.join(" or "),
        })?;
        let collection_path = lookup(COLLECTION_VARS, file.collection_path)
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint(endpoint));
        }

        Ok(Self {
            endpoint,
            api_key,
            collection_path,
        })
    }

    /// Full URL of the collection, e.g. `https://abc.supabase.co/rest/v1/products`.
    pub fn collection_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.endpoint.trim_end_matches('/'),
            self.collection_path.trim_matches('/')
        )
    }
}

impl fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("collection_path", &self.collection_path)
            .finish()
    }
}
