// Shared stubs for integration tests

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tempfile::TempDir;

use ideaforge::agents::market::fallback_report;
use ideaforge::config::Config;
use ideaforge::providers::{LlmProvider, ProviderRequest, ProviderResponse};
use ideaforge::research::{MarketResearcher, NoSearch, PageFetcher, ScrapedPage};
use ideaforge::store::SqliteStore;
use ideaforge::Pipeline;

/// Every call fails, so every stage falls back.
pub struct OfflineProvider;

#[async_trait]
impl LlmProvider for OfflineProvider {
    async fn send_message(&self, _request: &ProviderRequest) -> Result<ProviderResponse> {
        anyhow::bail!("provider offline")
    }

    fn name(&self) -> &str {
        "offline"
    }

    fn default_model(&self) -> &str {
        "none"
    }
}

/// Answers every call with the same content.
pub struct CannedProvider(pub String);

#[async_trait]
impl LlmProvider for CannedProvider {
    async fn send_message(&self, _request: &ProviderRequest) -> Result<ProviderResponse> {
        Ok(ProviderResponse {
            id: "canned".into(),
            model: "canned-model".into(),
            content: self.0.clone(),
            stop_reason: Some("stop".into()),
            provider: "canned".into(),
        })
    }

    fn name(&self) -> &str {
        "canned"
    }

    fn default_model(&self) -> &str {
        "canned-model"
    }
}

pub struct UnreachableFetcher;

#[async_trait]
impl PageFetcher for UnreachableFetcher {
    async fn fetch(&self, url: &str) -> ScrapedPage {
        ScrapedPage::failed(url, "unreachable")
    }
}

/// A complete market report as a model would return it.
pub fn market_reply(idea: &str) -> String {
    let report = fallback_report(idea, &IndexMap::new(), &[]);
    let mut value = serde_json::to_value(report).unwrap();
    let map = value.as_object_mut().unwrap();
    map.remove("startup_idea");
    map.remove("analysis_date");
    format!("```json\n{}\n```", value)
}

/// Pipeline over a temp SQLite file with search disabled.
pub fn pipeline(provider: Arc<dyn LlmProvider>, dir: &TempDir) -> Arc<Pipeline> {
    let researcher = Arc::new(MarketResearcher::new(
        Arc::new(NoSearch),
        Arc::new(UnreachableFetcher),
    ));
    let store = Arc::new(SqliteStore::open(&dir.path().join("outputs.db")).unwrap());
    Arc::new(Pipeline::new(provider, researcher, store, &Config::default()))
}
