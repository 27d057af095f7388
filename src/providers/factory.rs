// Provider factory
//
// Creates the chat provider from configuration

use anyhow::{Context, Result};
use std::sync::Arc;

use super::openai::OpenAIProvider;
use super::LlmProvider;
use crate::config::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_OPENAI_API_KEY};
use crate::config::{Config, ProviderEntry};

/// Build an `LlmProvider` from a `[[providers]]` entry.
pub fn create_provider_from_entry(entry: &ProviderEntry) -> Result<Box<dyn LlmProvider>> {
    let api_key = entry.api_key().to_string();
    let mut provider = match entry {
        ProviderEntry::Openai { .. } => OpenAIProvider::new_openai(api_key)?,
        ProviderEntry::Grok { .. } => OpenAIProvider::new_grok(api_key)?,
        ProviderEntry::Groq { .. } => OpenAIProvider::new_groq(api_key)?,
        ProviderEntry::Mistral { .. } => OpenAIProvider::new_mistral(api_key)?,
    };

    if let Some(model) = entry.model() {
        provider = provider.with_model(model);
    }
    if let Some(base_url) = entry.base_url() {
        provider = provider.with_base_url(base_url);
    }

    Ok(Box::new(provider))
}

/// Build the provider every stage shares: the first configured entry.
pub fn create_provider(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    let entry = config.active_provider().with_context(|| {
        format!(
            "No provider configured.\n\n\
             Set {} or add a [[providers]] entry to ~/{}/{}",
            ENV_OPENAI_API_KEY, CONFIG_DIR_NAME, CONFIG_FILE_NAME
        )
    })?;

    tracing::info!("Using {} provider", entry.display_name());
    Ok(Arc::from(create_provider_from_entry(entry)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_types_map_to_provider_names() {
        let entries = [
            ("openai", ProviderEntry::Openai { api_key: "k".into(), model: None, base_url: None, name: None }),
            ("grok", ProviderEntry::Grok { api_key: "k".into(), model: None, base_url: None, name: None }),
            ("groq", ProviderEntry::Groq { api_key: "k".into(), model: None, base_url: None, name: None }),
            ("mistral", ProviderEntry::Mistral { api_key: "k".into(), model: None, base_url: None, name: None }),
        ];
        for (expected, entry) in entries {
            let provider = create_provider_from_entry(&entry).unwrap();
            assert_eq!(provider.name(), expected);
        }
    }

    #[test]
    fn test_model_override() {
        let entry = ProviderEntry::Openai {
            api_key: "k".into(),
            model: Some("gpt-4o".into()),
            base_url: None,
            name: None,
        };
        let provider = create_provider_from_entry(&entry).unwrap();
        assert_eq!(provider.default_model(), "gpt-4o");
    }

    #[test]
    fn test_missing_provider_is_an_error() {
        let err = create_provider(&Config::default()).err().unwrap();
        assert!(err.to_string().contains("No provider configured"));
    }
}
