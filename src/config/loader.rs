// Configuration loader
// Reads ~/.ideaforge/config.toml, then fills gaps from environment variables

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::*;
use super::provider::ProviderEntry;
use super::settings::{config_dir, Config};

/// Load configuration from the config file (if present) and the environment.
pub fn load_config() -> Result<Config> {
    let path = config_path();
    let mut config = if path.exists() {
        load_from_path(&path)?
    } else {
        tracing::debug!("No config file at {}, using defaults", path.display());
        Config::default()
    };

    apply_env(&mut config, |key| std::env::var(key).ok());

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Parse a TOML config file. Missing sections take their defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))
}

/// Fill unset values from the environment. `lookup` is `std::env::var` in
/// production; tests pass a closure over a fixed map.
pub fn apply_env(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if config.providers.is_empty() {
        if let Some(api_key) = lookup(ENV_OPENAI_API_KEY) {
            config.providers.push(ProviderEntry::Openai {
                api_key,
                model: None,
                base_url: None,
                name: Some("OpenAI (Environment)".to_string()),
            });
        }
    }

    if config.research.search_api_key.is_none() {
        config.research.search_api_key = lookup(ENV_SEARCH_API_KEY);
    }
    if config.research.search_engine_id.is_none() {
        config.research.search_engine_id = lookup(ENV_SEARCH_ENGINE_ID);
    }

    if let Some(path) = lookup(ENV_DB_PATH) {
        config.store.db_path = PathBuf::from(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_from_path_reads_sections() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"
            [[providers]]
            type = "grok"
            api_key = "xai-test"

            [server]
            bind_address = "0.0.0.0:9000"

            [research]
            search_pause_ms = 0

            [generation]
            model = "grok-2-mini"
            "#
        )?;

        let config = load_from_path(file.path())?;
        assert_eq!(config.providers[0].provider_type(), "grok");
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.server.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
        assert_eq!(config.research.search_pause_ms, 0);
        assert_eq!(config.research.competitor_pause_ms, DEFAULT_COMPETITOR_PAUSE_MS);
        assert_eq!(config.generation.model.as_deref(), Some("grok-2-mini"));
        Ok(())
    }

    #[test]
    fn test_load_from_path_reports_parse_errors() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "[server\nbind_address = ")?;
        let err = load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration file"));
        Ok(())
    }

    #[test]
    fn test_env_fills_missing_values() {
        let mut config = Config::default();
        apply_env(
            &mut config,
            env(&[
                ("OPENAI_API_KEY", "sk-env"),
                ("GOOGLE_SEARCH_API_KEY", "g-key"),
                ("GOOGLE_SEARCH_CX", "cx-1"),
                ("IDEAFORGE_DB_PATH", "/tmp/ideaforge-test.db"),
            ]),
        );

        assert_eq!(config.providers[0].api_key(), "sk-env");
        assert_eq!(config.research.search_api_key.as_deref(), Some("g-key"));
        assert_eq!(config.research.search_engine_id.as_deref(), Some("cx-1"));
        assert_eq!(config.store.db_path, PathBuf::from("/tmp/ideaforge-test.db"));
    }

    #[test]
    fn test_env_does_not_override_file_values() {
        let mut config = Config::with_providers(vec![ProviderEntry::Mistral {
            api_key: "file-key".into(),
            model: None,
            base_url: None,
            name: None,
        }]);
        config.research.search_api_key = Some("file-search".into());

        apply_env(
            &mut config,
            env(&[("OPENAI_API_KEY", "sk-env"), ("GOOGLE_SEARCH_API_KEY", "env-search")]),
        );

        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].api_key(), "file-key");
        assert_eq!(config.research.search_api_key.as_deref(), Some("file-search"));
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        apply_env(&mut config, env(&[("OPENAI_API_KEY", "  ")]));
        assert!(config.providers.is_empty());
    }
}
