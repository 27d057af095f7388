// Request/response types shared by every text-generation provider

use serde::{Deserialize, Serialize};

/// Default completion budget when a caller does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Provider-agnostic chat request
///
/// Each provider maps this onto its own wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    pub messages: Vec<Message>,

    /// Model name; empty means the provider default
    pub model: String,

    pub max_tokens: u32,

    /// Sent as a leading `system` message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Ask the provider to constrain output to a JSON object
    #[serde(skip)]
    pub json_mode: bool,
}

impl ProviderRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system: None,
            temperature: None,
            json_mode: false,
        }
    }

    /// Single user prompt
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(vec![Message::user(text)])
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }
}

/// Provider-agnostic completion
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub model: String,
    /// Text of the first choice
    pub content: String,
    pub stop_reason: Option<String>,
    /// Which provider produced this ("openai", "grok", ...)
    pub provider: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::prompt("Design a schema")
            .with_system("You are an architect")
            .with_max_tokens(1500)
            .with_temperature(0.7)
            .with_json_mode(true);

        assert_eq!(request.messages, vec![Message::user("Design a schema")]);
        assert_eq!(request.system.as_deref(), Some("You are an architect"));
        assert_eq!(request.max_tokens, 1500);
        assert_eq!(request.temperature, Some(0.7));
        assert!(request.json_mode);
        assert!(request.model.is_empty());
    }

    #[test]
    fn test_request_defaults() {
        let request = ProviderRequest::prompt("hi");
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(!request.json_mode);
        assert_eq!(request.temperature, None);
    }
}
