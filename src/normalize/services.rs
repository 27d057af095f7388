// Third-party services: category name -> list of services

use serde_json::{json, Map, Value};

use super::aliases::SERVICES;
use super::coerce::{coerce_text, first_present, text_field, TextShape, RECOMMENDED};
use super::{expect_array, expect_object, kind_of, object_items, NormalizeError};

pub fn normalize_third_party_services(data: &Value) -> Result<Value, NormalizeError> {
    let categories = expect_object(SERVICES.record, SERVICES.unwrap(data))?;

    let mut normalized = Map::new();
    for (category, services) in categories {
        let items = expect_array(SERVICES.record, services).map_err(|_| {
            NormalizeError::CategoryNotArray {
                record: SERVICES.record,
                category: category.clone(),
                found: kind_of(services),
            }
        })?;
        let entries = object_items(SERVICES.record, items)?
            .into_iter()
            .map(normalize_service)
            .collect();
        normalized.insert(category.clone(), Value::Array(entries));
    }

    if normalized.is_empty() {
        return Ok(default_services());
    }
    Ok(Value::Object(normalized))
}

fn normalize_service(service: &Map<String, Value>) -> Value {
    let fallback = |keys: &[&str], default: &str| {
        coerce_text(TextShape::of(first_present(service, keys)), RECOMMENDED, default)
    };

    json!({
        "name": text_field(service, "name", "Unknown Service"),
        "description": text_field(service, "description", "No description provided"),
        "pricing_tier": fallback(&["pricing_tier", "pricing"], "Freemium"),
        "integration_complexity": fallback(&["integration_complexity", "complexity"], "Medium"),
    })
}

/// Used when the model names no services at all.
pub fn default_services() -> Value {
    json!({
        "Authentication": [{
            "name": "Auth0",
            "description": "Identity platform for web, mobile, IoT",
            "pricing_tier": "Freemium",
            "integration_complexity": "Low"
        }],
        "Email": [{
            "name": "SendGrid",
            "description": "Email delivery and marketing service",
            "pricing_tier": "Freemium",
            "integration_complexity": "Low"
        }]
    })
}
