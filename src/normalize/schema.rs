// Database schema: a list of tables with columns, relationships, indexes
// and constraints in whatever shape the model chose

use serde_json::{json, Map, Value};

use super::aliases::DATABASE_SCHEMA;
use super::coerce::{
    coerce_list_with, display_value, flatten_pairs, item_to_string, text_field, ListShape,
};
use super::{expect_array, object_items, string_array, NormalizeError};

pub fn normalize_database_schema(data: &Value) -> Result<Value, NormalizeError> {
    let items = expect_array(DATABASE_SCHEMA.record, DATABASE_SCHEMA.unwrap(data))?;
    let tables = object_items(DATABASE_SCHEMA.record, items)?
        .into_iter()
        .map(normalize_table)
        .collect();
    Ok(Value::Array(tables))
}

fn normalize_table(table: &Map<String, Value>) -> Value {
    json!({
        "name": text_field(table, "name", "unnamed_table"),
        "type": text_field(table, "type", "table"),
        "fields": Value::Array(fields(table.get("fields"))),
        "relationships": Value::Array(relationships(table.get("relationships"))),
        "indexes": string_array(annotations(table.get("indexes"))),
        "constraints": string_array(annotations(table.get("constraints"))),
        "description": text_field(table, "description", "No description provided"),
    })
}

/// Columns as `[{"name": .., "type": .., ...}]`. The `{column: type}` form
/// is expanded, and object-valued columns keep their extra attributes.
fn fields(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(_) => Some(item.clone()),
                Value::String(name) => Some(json!({"name": name})),
                _ => None,
            })
            .collect(),
        Some(Value::Object(columns)) => columns
            .iter()
            .map(|(name, spec)| match spec {
                Value::Object(attrs) => {
                    let mut column = Map::new();
                    column.insert("name".into(), Value::String(name.clone()));
                    for (k, v) in attrs {
                        column.insert(k.clone(), v.clone());
                    }
                    Value::Object(column)
                }
                other => json!({"name": name, "type": display_value(other)}),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Relationships as a list of string mappings.
fn relationships(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(m) if !m.is_empty() => Some(Value::Object(
                    m.iter()
                        .map(|(k, v)| (k.clone(), Value::String(display_value(v))))
                        .collect(),
                )),
                Value::String(s) => Some(json!({"description": s})),
                _ => None,
            })
            .collect(),
        Some(Value::Object(links)) => links
            .iter()
            .map(|(table, kind)| json!({"table": table, "type": display_value(kind)}))
            .collect(),
        _ => Vec::new(),
    }
}

/// Indexes and constraints: always a list of readable strings.
fn annotations(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Object(named)) if !named.contains_key("columns") => named
            .iter()
            .map(|(name, info)| describe(name, info))
            .collect(),
        Some(single @ Value::Object(_)) => annotation_item(single).into_iter().collect(),
        other => coerce_list_with(ListShape::of(other), None, &[], annotation_item),
    }
}

fn annotation_item(item: &Value) -> Option<String> {
    match item {
        Value::Object(m) if m.contains_key("columns") => {
            let name = m
                .get("name")
                .and_then(Value::as_str)
                .or_else(|| m.get("type").and_then(Value::as_str))
                .unwrap_or("unnamed");
            Some(describe(name, item))
        }
        Value::Object(m) if m.len() == 1 => m.iter().next().map(|(name, info)| describe(name, info)),
        Value::Object(m) if !m.is_empty() => Some(flatten_pairs(m)),
        other => item_to_string(other),
    }
}

/// `"<name> on <cols> (<type>)"` for structured entries, `"<name>: <value>"`
/// otherwise.
fn describe(name: &str, info: &Value) -> String {
    match info {
        Value::Object(attrs) => {
            let columns = match attrs.get("columns") {
                Some(Value::Array(cols)) => cols
                    .iter()
                    .filter_map(item_to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                Some(Value::String(cols)) => cols.clone(),
                _ => "unknown".to_string(),
            };
            match attrs.get("type").map(display_value) {
                Some(kind) if kind != name => format!("{} on {} ({})", name, columns, kind),
                _ => format!("{} on {}", name, columns),
            }
        }
        other => format!("{}: {}", name, display_value(other)),
    }
}
