// Market -> product -> technical pipeline
//
// Stages run strictly one after another. A panic inside a stage is caught
// and reported as a failed stage instead of taking the caller down.

use anyhow::Result;
use futures::FutureExt;
use serde_json::Value;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::agents::{MarketAnalyst, ProductManager, StageOutcome, TechnicalArchitect};
use crate::config::Config;
use crate::providers::{create_provider, LlmProvider};
use crate::records::{MarketAnalysisReport, ProductRoadmap, TechnicalBlueprint};
use crate::research::MarketResearcher;
use crate::store::{AgentOutputs, OutputStore, SqliteStore, StoredOutput};

pub struct Pipeline {
    market: MarketAnalyst,
    product: ProductManager,
    technical: TechnicalArchitect,
    store: Arc<dyn OutputStore>,
}

/// Records from a full CLI run.
#[derive(Debug)]
pub struct PipelineRun {
    pub market: StageOutcome<MarketAnalysisReport>,
    pub product: Option<StageOutcome<ProductRoadmap>>,
    pub technical: Option<StageOutcome<TechnicalBlueprint>>,
    pub stored: Option<StoredOutput>,
}

impl PipelineRun {
    /// Reason of the stage that stopped the run, if any.
    pub fn failure(&self) -> Option<&str> {
        let stages = [
            Some((self.market.is_failed(), self.market.reasons())),
            self.product.as_ref().map(|s| (s.is_failed(), s.reasons())),
            self.technical.as_ref().map(|s| (s.is_failed(), s.reasons())),
        ];
        stages
            .into_iter()
            .flatten()
            .find(|(failed, _)| *failed)
            .and_then(|(_, reasons)| reasons.first().copied())
    }
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        researcher: Arc<MarketResearcher>,
        store: Arc<dyn OutputStore>,
        config: &Config,
    ) -> Self {
        let generation = config.generation.clone();
        Self {
            market: MarketAnalyst::new(provider.clone(), researcher, generation.clone()),
            product: ProductManager::new(provider.clone(), generation.clone()),
            technical: TechnicalArchitect::new(provider, generation),
            store,
        }
    }

    /// Wire up the configured provider, researcher and SQLite store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(config)?;
        let researcher = Arc::new(MarketResearcher::from_config(&config.research)?);
        let store = Arc::new(SqliteStore::open(&config.store.db_path)?);
        tracing::info!(
            provider = provider.name(),
            model = config.generation.model.as_deref().unwrap_or(provider.default_model()),
            "Pipeline ready"
        );
        Ok(Self::new(provider, researcher, store, config))
    }

    pub fn store(&self) -> &Arc<dyn OutputStore> {
        &self.store
    }

    pub async fn market(&self, idea: &str) -> StageOutcome<MarketAnalysisReport> {
        guarded("market", self.market.analyze(idea)).await
    }

    pub async fn product(&self, report: &MarketAnalysisReport) -> StageOutcome<ProductRoadmap> {
        guarded("product", self.product.plan(report)).await
    }

    pub async fn technical(&self, roadmap: &ProductRoadmap) -> StageOutcome<TechnicalBlueprint> {
        guarded("technical", self.technical.design(roadmap)).await
    }

    /// Store one run. Failures are logged, never returned.
    pub async fn persist(
        &self,
        user_id: &str,
        session_id: &str,
        market: Value,
        product: Value,
        technical: Value,
    ) -> Option<StoredOutput> {
        let outputs = AgentOutputs {
            market_analyst_response: market,
            product_manager_response: product,
            tech_architect_response: technical,
        };
        match self.store.put(user_id, session_id, &outputs).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::error!(user_id, session_id, "Error storing agent outputs: {:#}", e);
                None
            }
        }
    }

    /// Chain all three stages and store the result.
    ///
    /// Stops at the first failed stage; nothing is stored in that case.
    pub async fn run(&self, idea: &str, user_id: &str, session_id: &str) -> PipelineRun {
        let mut run = PipelineRun {
            market: self.market(idea).await,
            product: None,
            technical: None,
            stored: None,
        };
        let Some(report) = run.market.record().cloned() else {
            return run;
        };

        let product = self.product(&report).await;
        let roadmap = product.record().cloned();
        run.product = Some(product);
        let Some(roadmap) = roadmap else {
            return run;
        };

        let technical = self.technical(&roadmap).await;
        if let Some(blueprint) = technical.record() {
            run.stored = match (
                serde_json::to_value(&report),
                serde_json::to_value(&roadmap),
                serde_json::to_value(blueprint),
            ) {
                (Ok(market), Ok(product), Ok(technical)) => {
                    self.persist(user_id, session_id, market, product, technical)
                        .await
                }
                _ => {
                    tracing::error!("Could not serialize pipeline records for storage");
                    None
                }
            };
        }
        run.technical = Some(technical);
        run
    }
}

/// Await a stage, turning a panic into `StageOutcome::Failed`.
async fn guarded<T>(stage: &str, fut: impl Future<Output = StageOutcome<T>>) -> StageOutcome<T> {
    tracing::info!("Running {} stage", stage);
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(outcome) => {
            if let StageOutcome::Degraded { reasons, .. } = &outcome {
                tracing::warn!("{} stage degraded: {}", stage, reasons.join("; "));
            }
            outcome
        }
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "stage panicked".to_string());
            tracing::error!("{} stage failed: {}", stage, reason);
            StageOutcome::Failed {
                reason: format!("{} stage failed: {}", stage, reason),
            }
        }
    }
}
