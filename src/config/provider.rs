// Provider entry: one OpenAI-compatible chat endpoint

use serde::{Deserialize, Serialize};

/// A single `[[providers]]` entry, tagged by `type`:
///
/// ```toml
/// [[providers]]
/// type = "openai"
/// api_key = "sk-..."
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderEntry {
    Openai {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Grok {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Groq {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Mistral {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl ProviderEntry {
    /// Human-readable name for logs.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Openai { name, .. } => name.as_deref().unwrap_or("OpenAI"),
            Self::Grok { name, .. } => name.as_deref().unwrap_or("Grok"),
            Self::Groq { name, .. } => name.as_deref().unwrap_or("Groq"),
            Self::Mistral { name, .. } => name.as_deref().unwrap_or("Mistral"),
        }
    }

    /// Lowercase type tag, as written in the config file.
    pub fn provider_type(&self) -> &'static str {
        match self {
            Self::Openai { .. } => "openai",
            Self::Grok { .. } => "grok",
            Self::Groq { .. } => "groq",
            Self::Mistral { .. } => "mistral",
        }
    }

    pub fn api_key(&self) -> &str {
        match self {
            Self::Openai { api_key, .. }
            | Self::Grok { api_key, .. }
            | Self::Groq { api_key, .. }
            | Self::Mistral { api_key, .. } => api_key,
        }
    }

    pub fn model(&self) -> Option<&str> {
        match self {
            Self::Openai { model, .. }
            | Self::Grok { model, .. }
            | Self::Groq { model, .. }
            | Self::Mistral { model, .. } => model.as_deref(),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        match self {
            Self::Openai { base_url, .. }
            | Self::Grok { base_url, .. }
            | Self::Groq { base_url, .. }
            | Self::Mistral { base_url, .. } => base_url.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_entries_parse() {
        #[derive(Deserialize)]
        struct Doc {
            providers: Vec<ProviderEntry>,
        }

        let doc: Doc = toml::from_str(
            r#"
            [[providers]]
            type = "openai"
            api_key = "sk-test"

            [[providers]]
            type = "groq"
            api_key = "gsk-test"
            model = "llama-3.3-70b"
            name = "Fast"
            "#,
        )
        .unwrap();

        assert_eq!(doc.providers.len(), 2);
        assert_eq!(doc.providers[0].provider_type(), "openai");
        assert_eq!(doc.providers[0].display_name(), "OpenAI");
        assert_eq!(doc.providers[0].model(), None);
        assert_eq!(doc.providers[1].display_name(), "Fast");
        assert_eq!(doc.providers[1].model(), Some("llama-3.3-70b"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        #[derive(Debug, Deserialize)]
        struct Doc {
            #[allow(dead_code)]
            providers: Vec<ProviderEntry>,
        }

        let result: Result<Doc, _> = toml::from_str(
            r#"
            [[providers]]
            type = "carrier-pigeon"
            api_key = "x"
            "#,
        );
        assert!(result.is_err());
    }
}
