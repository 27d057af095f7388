// Configuration structs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use super::constants::*;
use super::provider::ProviderEntry;

/// HTTP server settings (`[server]`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000")
    pub bind_address: String,
    /// Largest accepted request body
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_HTTP_ADDR.to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid server bind address '{}'", self.bind_address))
    }
}

/// Output database settings (`[store]`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: config_dir().join(DEFAULT_DB_FILE_NAME),
        }
    }
}

/// Market research settings (`[research]`)
///
/// Searching is skipped when no API key or engine id is configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResearchConfig {
    pub search_api_key: Option<String>,
    pub search_engine_id: Option<String>,
    pub search_url: String,
    pub results_per_query: u32,
    pub search_pause_ms: u64,
    pub competitor_pause_ms: u64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            search_api_key: None,
            search_engine_id: None,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
            search_pause_ms: DEFAULT_SEARCH_PAUSE_MS,
            competitor_pause_ms: DEFAULT_COMPETITOR_PAUSE_MS,
        }
    }
}

/// Model call settings (`[generation]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Overrides the provider's default model for every stage
    pub model: Option<String>,
    /// Overrides each stage's built-in temperature
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Chat endpoints; the first one is used
    pub providers: Vec<ProviderEntry>,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub research: ResearchConfig,
    pub generation: GenerationConfig,
}

impl Config {
    pub fn with_providers(providers: Vec<ProviderEntry>) -> Self {
        Self {
            providers,
            ..Self::default()
        }
    }

    /// The provider every stage talks to.
    pub fn active_provider(&self) -> Option<&ProviderEntry> {
        self.providers.first()
    }

    pub fn validate(&self) -> Result<()> {
        for (idx, entry) in self.providers.iter().enumerate() {
            if entry.api_key().trim().is_empty() {
                bail!(
                    "Empty API key for {} provider (providers[{}])\n\n\
                     Edit ~/{}/{} or set {}",
                    entry.provider_type(),
                    idx,
                    CONFIG_DIR_NAME,
                    CONFIG_FILE_NAME,
                    ENV_OPENAI_API_KEY
                );
            }
        }

        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            bail!(
                "Invalid server bind address '{}' (expected host:port, e.g. {})",
                self.server.bind_address,
                DEFAULT_HTTP_ADDR
            );
        }

        if self.server.body_limit_bytes == 0 {
            bail!("server.body_limit_bytes must be greater than zero");
        }

        if self.research.results_per_query == 0 || self.research.results_per_query > 10 {
            bail!(
                "research.results_per_query must be between 1 and 10 (got {})",
                self.research.results_per_query
            );
        }

        if let Some(t) = self.generation.temperature {
            if !(0.0..=2.0).contains(&t) {
                bail!("generation.temperature must be between 0.0 and 2.0 (got {})", t);
            }
        }

        Ok(())
    }
}

/// `~/.ideaforge`, or a relative `.ideaforge` when no home directory exists.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.providers.is_empty());
        assert_eq!(config.server.bind_address, "127.0.0.1:8000");
        assert_eq!(config.server.body_limit_bytes, 4 * 1024 * 1024);
        assert_eq!(config.research.results_per_query, 8);
        assert_eq!(config.research.search_pause_ms, 1000);
        assert_eq!(config.research.competitor_pause_ms, 2000);
        assert!(config.store.db_path.ends_with("outputs.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::with_providers(vec![ProviderEntry::Openai {
            api_key: "  ".into(),
            model: None,
            base_url: None,
            name: None,
        }]);
        assert!(config.validate().is_err());

        config.providers.clear();
        config.server.bind_address = "localhost".into();
        assert!(config.validate().is_err());

        config.server.bind_address = "0.0.0.0:9000".into();
        config.generation.temperature = Some(3.5);
        assert!(config.validate().is_err());

        config.generation.temperature = Some(0.2);
        assert!(config.validate().is_ok());
    }
}
