// Deployment strategy: a single object with string, list and mapping fields

use serde_json::{json, Value};

use super::aliases::DEPLOYMENT;
use super::coerce::{coerce_text, list_field, string_map, text_field, TextRule, TextShape};
use super::{expect_object, string_array, NormalizeError};

const DEFAULT_CI_CD: &[(&str, &str)] = &[
    ("Source Control", "GitHub"),
    ("CI", "GitHub Actions"),
    ("CD", "AWS CodeDeploy"),
];

pub fn normalize_deployment_strategy(data: &Value) -> Result<Value, NormalizeError> {
    let obj = expect_object(DEPLOYMENT.record, DEPLOYMENT.unwrap(data))?;

    let flatten = |key: &str, default: &str| {
        coerce_text(TextShape::of(obj.get(key)), TextRule::Flatten, default)
    };

    Ok(json!({
        "recommended_approach": text_field(obj, "recommended_approach", "Cloud-based containerized deployment"),
        "infrastructure": text_field(obj, "infrastructure", "AWS or Azure cloud services"),
        "ci_cd_pipeline": string_map(obj.get("ci_cd_pipeline"), DEFAULT_CI_CD),
        "scaling_strategy": flatten("scaling_strategy", "Auto-scaling based on load"),
        "estimated_costs": flatten(
            "estimated_costs",
            "Infrastructure: $200-400/month; Services: $50-100/month",
        ),
        "monitoring_tools": string_array(list_field(obj, "monitoring_tools", &["CloudWatch", "Prometheus"])),
        "backup_strategy": text_field(obj, "backup_strategy", "Daily automated backups with 30-day retention"),
    }))
}
