// User personas and product features

use serde_json::{json, Map, Value};

use super::aliases::{FEATURES, PERSONAS};
use super::coerce::{coerce_score, list_field, string_map, text_field};
use super::{expect_array, object_items, string_array, NormalizeError};

const DEFAULT_DEMOGRAPHICS: &[(&str, &str)] =
    &[("age", "25-45"), ("gender", "All"), ("occupation", "Various")];

/// Feature scores live on a 1..=10 scale.
const SCORE_MIN: i64 = 1;
const SCORE_MAX: i64 = 10;
const SCORE_DEFAULT: i64 = 5;

pub fn normalize_personas(data: &Value) -> Result<Value, NormalizeError> {
    let items = expect_array(PERSONAS.record, PERSONAS.unwrap(data))?;
    let personas = object_items(PERSONAS.record, items)?
        .into_iter()
        .enumerate()
        .map(|(i, persona)| normalize_persona(i + 1, persona))
        .collect();
    Ok(Value::Array(personas))
}

fn normalize_persona(number: usize, persona: &Map<String, Value>) -> Value {
    json!({
        "name": text_field(persona, "name", &format!("User Persona {}", number)),
        "description": text_field(persona, "description", "No description provided"),
        "demographics": string_map(persona.get("demographics"), DEFAULT_DEMOGRAPHICS),
        "pain_points": string_array(list_field(persona, "pain_points", &[])),
        "goals": string_array(list_field(persona, "goals", &[])),
        "behaviors": string_array(list_field(persona, "behaviors", &[])),
        "needs": string_array(list_field(persona, "needs", &[])),
        "tech_savviness": text_field(persona, "tech_savviness", "Medium"),
    })
}

pub fn normalize_features(data: &Value) -> Result<Value, NormalizeError> {
    let items = expect_array(FEATURES.record, FEATURES.unwrap(data))?;
    let features = object_items(FEATURES.record, items)?
        .into_iter()
        .enumerate()
        .map(|(i, feature)| normalize_feature(i + 1, feature))
        .collect();
    Ok(Value::Array(features))
}

fn normalize_feature(number: usize, feature: &Map<String, Value>) -> Value {
    let score = |key: &str| coerce_score(feature.get(key), SCORE_DEFAULT, SCORE_MIN, SCORE_MAX);

    json!({
        "name": text_field(feature, "name", &format!("Feature {}", number)),
        "description": text_field(feature, "description", "No description provided"),
        "priority": text_field(feature, "priority", "MEDIUM").trim().to_uppercase(),
        "effort": score("effort"),
        "impact": score("impact"),
        "user_stories": string_array(list_field(feature, "user_stories", &[])),
        "target_personas": string_array(list_field(feature, "target_personas", &[])),
        "technical_complexity": score("technical_complexity"),
        "dependencies": string_array(list_field(feature, "dependencies", &[])),
        "metrics": string_array(list_field(feature, "metrics", &[])),
    })
}
