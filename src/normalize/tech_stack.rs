// Tech stack: category name -> list of technology entries

use serde_json::{json, Map, Value};

use super::aliases::TECH_STACK;
use super::coerce::{list_field, text_field};
use super::{expect_array, expect_object, kind_of, object_items, string_array, NormalizeError};

pub fn normalize_tech_stack(data: &Value) -> Result<Value, NormalizeError> {
    let categories = expect_object(TECH_STACK.record, TECH_STACK.unwrap(data))?;

    let mut normalized = Map::new();
    for (category, technologies) in categories {
        let items = expect_array(TECH_STACK.record, technologies).map_err(|_| {
            NormalizeError::CategoryNotArray {
                record: TECH_STACK.record,
                category: category.clone(),
                found: kind_of(technologies),
            }
        })?;

        let entries = object_items(TECH_STACK.record, items)?
            .into_iter()
            .map(normalize_technology)
            .collect();
        normalized.insert(category.clone(), Value::Array(entries));
    }

    Ok(Value::Object(normalized))
}

fn normalize_technology(tech: &Map<String, Value>) -> Value {
    json!({
        "name": text_field(tech, "name", "Unknown"),
        "version": text_field(tech, "version", "Latest"),
        "justification": text_field(tech, "justification", "No justification provided"),
        "alternatives_considered": string_array(list_field(tech, "alternatives_considered", &["None"])),
        "learning_curve": text_field(tech, "learning_curve", "Medium"),
        "community_support": text_field(tech, "community_support", "Medium"),
        "documentation_quality": text_field(tech, "documentation_quality", "Good"),
    })
}
