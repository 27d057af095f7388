// Product roadmap

use serde::{Deserialize, Serialize};

use super::StringMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPersona {
    pub name: String,
    pub description: String,
    /// age, gender, occupation, ...
    pub demographics: StringMap,
    pub pain_points: Vec<String>,
    pub goals: Vec<String>,
    pub behaviors: Vec<String>,
    pub needs: Vec<String>,
    /// Low, Medium or High
    pub tech_savviness: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
    /// HIGH, MEDIUM or LOW
    pub priority: String,
    /// 1-10
    pub effort: i64,
    /// 1-10
    pub impact: i64,
    pub user_stories: Vec<String>,
    /// Names of the personas this feature serves
    pub target_personas: Vec<String>,
    /// 1-10
    pub technical_complexity: i64,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationExperiment {
    pub name: String,
    pub description: String,
    pub method: String,
    pub success_criteria: String,
}

/// Output of the product stage and input of the technical stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRoadmap {
    pub startup_idea: String,
    pub user_personas: Vec<UserPersona>,
    pub features: Vec<Feature>,
    pub mvp_features: Vec<String>,
    #[serde(default)]
    pub milestone_1_features: Vec<String>,
    #[serde(default)]
    pub milestone_2_features: Vec<String>,
    pub validation_experiments: Vec<ValidationExperiment>,
    pub success_metrics: StringMap,
}
