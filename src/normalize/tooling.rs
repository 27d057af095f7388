// Development tools and implementation roadmap phases

use serde_json::{json, Map, Value};

use super::aliases::{DEV_TOOLS, ROADMAP};
use super::coerce::{coerce_text, first_present, list_field, text_field, TextShape, RECOMMENDED};
use super::{expect_array, object_items, string_array, NormalizeError};

/// Phase length in weeks when the model gives none.
const DEFAULT_PHASE_WEEKS: u64 = 2;

pub fn normalize_development_tools(data: &Value) -> Result<Value, NormalizeError> {
    let items = expect_array(DEV_TOOLS.record, DEV_TOOLS.unwrap(data))?;
    let tools = object_items(DEV_TOOLS.record, items)?
        .into_iter()
        .map(normalize_tool)
        .collect();
    Ok(Value::Array(tools))
}

fn normalize_tool(tool: &Map<String, Value>) -> Value {
    let pricing = coerce_text(
        TextShape::of(first_present(tool, &["pricing", "pricing_tier"])),
        RECOMMENDED,
        "Free",
    );
    json!({
        "name": text_field(tool, "name", "Unknown"),
        "category": text_field(tool, "category", "General"),
        "description": text_field(tool, "description", "No description provided"),
        "pricing": pricing,
    })
}

pub fn normalize_implementation_roadmap(data: &Value) -> Result<Value, NormalizeError> {
    let items = expect_array(ROADMAP.record, ROADMAP.unwrap(data))?;
    let phases = object_items(ROADMAP.record, items)?
        .into_iter()
        .enumerate()
        .map(|(i, phase)| normalize_phase(i + 1, phase))
        .collect();
    Ok(Value::Array(phases))
}

fn normalize_phase(number: usize, phase: &Map<String, Value>) -> Value {
    let duration = match phase.get("duration") {
        Some(Value::Number(n)) if n.is_u64() => Value::Number(n.clone()),
        Some(Value::Number(n)) => Value::String(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Value::String(s.trim().to_string()),
        _ => json!(DEFAULT_PHASE_WEEKS),
    };

    json!({
        "name": text_field(phase, "name", &format!("Phase {}", number)),
        "description": text_field(phase, "description", "No description provided"),
        "duration": duration,
        "features": string_array(list_field(phase, "features", &[])),
        "technical_deliverables": string_array(list_field(phase, "technical_deliverables", &[])),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_pricing_prefers_pricing_key() {
        let data = json!({"tools": [
            {"name": "GitHub", "pricing_tier": "Freemium"},
            {"name": "Jira", "pricing": "Paid", "pricing_tier": "Freemium"},
            {"category": "IDE"}
        ]});
        let out = normalize_development_tools(&data).unwrap();
        assert_eq!(out[0]["pricing"], "Freemium");
        assert_eq!(out[1]["pricing"], "Paid");
        assert_eq!(
            out[2],
            json!({
                "name": "Unknown",
                "category": "IDE",
                "description": "No description provided",
                "pricing": "Free"
            })
        );
    }

    #[test]
    fn test_roadmap_phase_defaults() {
        let data = json!({"phases": [
            {"name": "Foundation", "duration": 3, "features": "Auth, CI"},
            {"duration": "2-3 weeks"},
            {"duration": -1}
        ]});
        let out = normalize_implementation_roadmap(&data).unwrap();
        assert_eq!(out[0]["duration"], json!(3));
        assert_eq!(out[0]["features"], json!(["Auth", "CI"]));
        assert_eq!(out[0]["technical_deliverables"], json!([]));
        assert_eq!(out[1]["name"], "Phase 2");
        assert_eq!(out[1]["duration"], "2-3 weeks");
        assert_eq!(out[2]["duration"], "-1");
    }

    #[test]
    fn test_roadmap_missing_duration_defaults_to_two_weeks() {
        let out = normalize_implementation_roadmap(&json!([{"name": "Beta"}])).unwrap();
        assert_eq!(out[0]["duration"], json!(2));
    }

    #[test]
    fn test_tools_must_be_objects() {
        assert!(normalize_development_tools(&json!(["VS Code"])).is_err());
    }
}
