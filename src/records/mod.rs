// Typed domain records produced by each pipeline stage

pub mod market;
pub mod product;
pub mod technical;

pub use market::{
    CompetitorInfo, MarketAnalysisReport, MarketSizing, MarketTrends, OpportunityAnalysis,
    ReviewValue, RiskAnalysis,
};
pub use product::{Feature, ProductRoadmap, UserPersona, ValidationExperiment};
pub use technical::{
    ApiEndpoint, DatabaseTable, DeploymentStrategy, DevelopmentTool, ImplementationPhase,
    PhaseDuration, SecurityConsiderations, TechStackComponent, TechnicalBlueprint,
    ThirdPartyService,
};

use indexmap::IndexMap;

/// String-to-string mapping that keeps the order the model wrote it in.
pub type StringMap = IndexMap<String, String>;

/// Build a [`StringMap`] from literal pairs.
pub fn string_map(pairs: &[(&str, &str)]) -> StringMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Build an owned list from string literals.
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
