// Response normalization
//
// Each normalizer takes the loosely-typed JSON a model produced and returns a
// value whose fields match the record schema exactly: every key present,
// lists as arrays of strings, mappings as objects. Missing fields never fail;
// only a fundamentally wrong shape does.

pub mod aliases;
pub mod coerce;
pub mod deployment;
pub mod diagram;
pub mod endpoints;
pub mod product;
pub mod schema;
pub mod security;
pub mod services;
pub mod tech_stack;
pub mod tooling;

pub use deployment::normalize_deployment_strategy;
pub use diagram::normalize_architecture_diagram;
pub use endpoints::normalize_api_endpoints;
pub use product::{normalize_features, normalize_personas};
pub use schema::normalize_database_schema;
pub use security::normalize_security_considerations;
pub use services::normalize_third_party_services;
pub use tech_stack::normalize_tech_stack;
pub use tooling::{normalize_development_tools, normalize_implementation_roadmap};

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{record}: expected an object, found {found}")]
    ExpectedObject {
        record: &'static str,
        found: &'static str,
    },

    #[error("{record}: expected an array, found {found}")]
    ExpectedArray {
        record: &'static str,
        found: &'static str,
    },

    #[error("{record}: category '{category}' must be an array, found {found}")]
    CategoryNotArray {
        record: &'static str,
        category: String,
        found: &'static str,
    },

    #[error("{record}: item {index} must be an object, found {found}")]
    ItemNotObject {
        record: &'static str,
        index: usize,
        found: &'static str,
    },
}

/// JSON type name for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn expect_object<'a>(
    record: &'static str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, NormalizeError> {
    value.as_object().ok_or(NormalizeError::ExpectedObject {
        record,
        found: kind_of(value),
    })
}

/// Array payloads. An empty object counts as an empty array, since that is
/// what extraction yields for a reply with nothing in it.
pub(crate) fn expect_array<'a>(
    record: &'static str,
    value: &'a Value,
) -> Result<&'a [Value], NormalizeError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) if map.is_empty() => Ok(&[]),
        other => Err(NormalizeError::ExpectedArray {
            record,
            found: kind_of(other),
        }),
    }
}

/// Every item must be an object.
pub(crate) fn object_items<'a>(
    record: &'static str,
    items: &'a [Value],
) -> Result<Vec<&'a Map<String, Value>>, NormalizeError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object().ok_or(NormalizeError::ItemNotObject {
                record,
                index,
                found: kind_of(item),
            })
        })
        .collect()
}

/// Build a JSON array of strings.
pub(crate) fn string_array(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}
