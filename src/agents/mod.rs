// Stage agents
//
// Each agent turns the previous stage's record into its own by prompting the
// model, recovering and normalizing the reply, and falling back to
// hand-authored content for any step that fails.

pub mod market;
pub mod outcome;
pub mod product;
pub mod technical;

pub use market::MarketAnalyst;
pub use outcome::{StageOutcome, StageTracker};
pub use product::{Prioritization, PriorityMatrix, ProductManager};
pub use technical::TechnicalArchitect;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::GenerationConfig;
use crate::providers::ProviderRequest;

/// Per-call model settings an agent asks for.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CallSpec {
    pub system: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_mode: bool,
}

impl CallSpec {
    /// Build the request, letting `[generation]` override model and temperature.
    pub fn request(&self, generation: &GenerationConfig, prompt: String) -> ProviderRequest {
        ProviderRequest::prompt(prompt)
            .with_system(self.system)
            .with_model(generation.model.clone().unwrap_or_default())
            .with_temperature(generation.temperature.unwrap_or(self.temperature))
            .with_max_tokens(self.max_tokens)
            .with_json_mode(self.json_mode)
    }
}

/// Deserialize a normalized value into its record type.
pub(crate) fn into_record<T: DeserializeOwned>(value: Value, record: &str) -> Result<T> {
    serde_json::from_value(value)
        .with_context(|| format!("Normalized {} does not match the record layout", record))
}

/// Pretty JSON for prompt interpolation.
pub(crate) fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}
