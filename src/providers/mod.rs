// Text-generation providers
//
// Every stage talks to the model through `LlmProvider`. The only shipped
// implementation speaks the OpenAI chat-completions format, which also covers
// Grok, Groq and Mistral.

use anyhow::Result;
use async_trait::async_trait;

pub mod factory;
pub mod openai;
pub mod types;

pub use factory::{create_provider, create_provider_from_entry};
pub use openai::OpenAIProvider;
pub use types::{Message, ProviderRequest, ProviderResponse};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a request and wait for the full completion. No retry.
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Provider name (e.g. "openai", "grok")
    fn name(&self) -> &str;

    fn default_model(&self) -> &str;

    /// Send a request and return only the reply text.
    ///
    /// An empty reply is an error, so callers can fall back on it like any
    /// other failed call.
    async fn generate(&self, request: &ProviderRequest) -> Result<String> {
        let response = self.send_message(request).await?;
        if response.content.trim().is_empty() {
            anyhow::bail!("{} returned an empty reply", self.name());
        }
        Ok(response.content)
    }
}
