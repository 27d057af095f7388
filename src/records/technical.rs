// Technical blueprint

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StringMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechStackComponent {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub justification: String,
    pub alternatives_considered: Vec<String>,
    pub learning_curve: String,
    pub community_support: String,
    pub documentation_quality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseTable {
    pub name: String,
    /// table, collection, view, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Columns; each carries at least a `name`
    pub fields: Vec<Map<String, Value>>,
    #[serde(default)]
    pub relationships: Vec<StringMap>,
    #[serde(default)]
    pub indexes: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub path: String,
    pub method: String,
    pub description: String,
    #[serde(default)]
    pub request_body: Option<Map<String, Value>>,
    pub response_structure: Map<String, Value>,
    pub auth_required: bool,
    pub related_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStrategy {
    pub recommended_approach: String,
    pub infrastructure: String,
    pub ci_cd_pipeline: StringMap,
    pub scaling_strategy: String,
    pub estimated_costs: String,
    pub monitoring_tools: Vec<String>,
    pub backup_strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityConsiderations {
    pub authentication_method: String,
    pub authorization_approach: String,
    /// `in_transit` and `at_rest`
    pub data_encryption: StringMap,
    pub security_best_practices: Vec<String>,
    pub compliance_considerations: Vec<String>,
    pub security_testing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdPartyService {
    pub name: String,
    pub description: String,
    pub pricing_tier: String,
    pub integration_complexity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentTool {
    pub name: String,
    pub category: String,
    pub description: String,
    pub pricing: String,
}

/// Weeks as a number, or whatever label the model used ("2-3 weeks").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhaseDuration {
    Weeks(u64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationPhase {
    pub name: String,
    pub description: String,
    pub duration: PhaseDuration,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub technical_deliverables: Vec<String>,
}

/// Output of the technical stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalBlueprint {
    pub startup_idea: String,
    /// Category (Frontend, Backend, ...) to recommended technologies
    pub tech_stack: IndexMap<String, Vec<TechStackComponent>>,
    pub database_schema: Vec<DatabaseTable>,
    pub api_endpoints: Vec<ApiEndpoint>,
    pub deployment_strategy: DeploymentStrategy,
    pub security_considerations: SecurityConsiderations,
    pub third_party_services: IndexMap<String, Vec<ThirdPartyService>>,
    pub development_tools: Vec<DevelopmentTool>,
    pub implementation_roadmap: Vec<ImplementationPhase>,
    /// Mermaid source
    pub architecture_diagram: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_type_field_is_renamed() {
        let table: DatabaseTable = serde_json::from_value(json!({
            "name": "users",
            "type": "table",
            "fields": [{"name": "id", "type": "uuid"}],
            "description": "Accounts"
        }))
        .unwrap();
        assert_eq!(table.kind, "table");
        assert!(table.indexes.is_empty());

        let back = serde_json::to_value(&table).unwrap();
        assert_eq!(back["type"], "table");
    }

    #[test]
    fn test_phase_duration_variants() {
        let weeks: PhaseDuration = serde_json::from_value(json!(4)).unwrap();
        let label: PhaseDuration = serde_json::from_value(json!("2-3 weeks")).unwrap();
        assert_eq!(weeks, PhaseDuration::Weeks(4));
        assert_eq!(label, PhaseDuration::Label("2-3 weeks".into()));
    }
}
