// Shape-directed coercion helpers shared by every normalizer
//
// A field is classified once into a shape enum, then a pure function per
// (shape, rule) pair produces the schema type. Every fallback path is a
// match arm, so the full coercion table is visible in one place.

use serde_json::{Map, Value};

/// How a loosely-typed value looks when a string is expected.
#[derive(Debug, Clone, Copy)]
pub enum TextShape<'a> {
    Absent,
    Text(&'a str),
    Scalar(&'a Value),
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
}

impl<'a> TextShape<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(s)) => Self::Text(s),
            Some(Value::Object(m)) => Self::Mapping(m),
            Some(Value::Array(items)) => Self::Sequence(items),
            Some(other) => Self::Scalar(other),
        }
    }
}

/// What to do with a mapping found where a string belongs.
#[derive(Debug, Clone, Copy)]
pub enum TextRule {
    /// Take the string under this conventional key (e.g. `recommended`).
    Nested(&'static str),
    /// Collapse the mapping into `"key: value; key: value"`.
    Flatten,
}

/// Conventional key models use to wrap a single recommendation.
pub const RECOMMENDED: TextRule = TextRule::Nested("recommended");

pub fn coerce_text(shape: TextShape<'_>, rule: TextRule, default: &str) -> String {
    match (shape, rule) {
        (TextShape::Absent, _) => default.to_string(),
        (TextShape::Text(s), _) => s.to_string(),
        (TextShape::Scalar(v), _) => scalar_to_string(v),
        (TextShape::Mapping(m), TextRule::Nested(key)) => m
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string()),
        (TextShape::Mapping(m), TextRule::Flatten) => {
            if m.is_empty() {
                default.to_string()
            } else {
                flatten_pairs(m)
            }
        }
        (TextShape::Sequence(items), _) => {
            let parts: Vec<String> = items.iter().filter_map(item_to_string).collect();
            if parts.is_empty() {
                default.to_string()
            } else {
                parts.join(", ")
            }
        }
    }
}

/// Shorthand for the common case: read `key` from `obj` and coerce it with
/// the `recommended` unwrap rule.
pub fn text_field(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    coerce_text(TextShape::of(obj.get(key)), RECOMMENDED, default)
}

/// How a loosely-typed value looks when a list of strings is expected.
#[derive(Debug, Clone, Copy)]
pub enum ListShape<'a> {
    Absent,
    Sequence(&'a [Value]),
    Text(&'a str),
    Mapping(&'a Map<String, Value>),
    Scalar(&'a Value),
}

impl<'a> ListShape<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Array(items)) => Self::Sequence(items),
            Some(Value::String(s)) => Self::Text(s),
            Some(Value::Object(m)) => Self::Mapping(m),
            Some(other) => Self::Scalar(other),
        }
    }
}

/// Conventional key models use to wrap a list of recommendations.
pub const RECOMMENDATIONS: &str = "recommendations";

pub fn coerce_list(shape: ListShape<'_>, nested_key: Option<&str>, default: &[&str]) -> Vec<String> {
    coerce_list_with(shape, nested_key, default, item_to_string)
}

/// Like [`coerce_list`], with a custom renderer for sequence items.
pub fn coerce_list_with(
    shape: ListShape<'_>,
    nested_key: Option<&str>,
    default: &[&str],
    render_item: fn(&Value) -> Option<String>,
) -> Vec<String> {
    let coerced = match shape {
        ListShape::Absent => Vec::new(),
        ListShape::Sequence(items) => items.iter().filter_map(render_item).collect(),
        ListShape::Text(s) => split_commas(s),
        ListShape::Mapping(m) => match nested_key.and_then(|key| m.get(key)) {
            Some(inner) => {
                return coerce_list_with(ListShape::of(Some(inner)), nested_key, default, render_item)
            }
            None => Vec::new(),
        },
        ListShape::Scalar(v) => vec![scalar_to_string(v)],
    };

    if coerced.is_empty() {
        owned(default)
    } else {
        coerced
    }
}

/// Read `key` from `obj` as a list of strings, unwrapping `recommendations`.
pub fn list_field(obj: &Map<String, Value>, key: &str, default: &[&str]) -> Vec<String> {
    coerce_list(ListShape::of(obj.get(key)), Some(RECOMMENDATIONS), default)
}

/// Split a comma-joined string, trimming entries and dropping empty ones.
pub fn split_commas(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a mapping into `"key: value; key: value"`.
pub fn flatten_pairs(m: &Map<String, Value>) -> String {
    m.iter()
        .map(|(k, v)| format!("{}: {}", k, display_value(v)))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Render one list item as a string. Nulls and blank strings are dropped.
pub fn item_to_string(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Object(m) if m.is_empty() => None,
        Value::Object(m) => Some(flatten_pairs(m)),
        Value::Array(inner) => {
            let parts: Vec<String> = inner.iter().filter_map(item_to_string).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => Some(scalar_to_string(other)),
    }
}

/// Strings print raw; everything else prints as compact JSON.
pub fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Mapping of strings: non-empty objects keep their keys with every value
/// rendered as a string; anything else becomes `default`.
pub fn string_map(value: Option<&Value>, default: &[(&str, &str)]) -> Map<String, Value> {
    match value {
        Some(Value::Object(m)) if !m.is_empty() => m
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(display_value(v))))
            .collect(),
        _ => default
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect(),
    }
}

/// Loose truthiness for flags such as `auth_required`.
pub fn coerce_bool(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "required" | "y" | "1"
        ),
        _ => default,
    }
}

/// Integer score clamped to `min..=max`. Floats round, numeric strings parse.
pub fn coerce_score(value: Option<&Value>, default: i64, min: i64, max: i64) -> i64 {
    let raw = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .map(|f| f.round() as i64),
        _ => None,
    };
    raw.unwrap_or(default).clamp(min, max)
}

/// First of `keys` present in `obj` with a non-null value.
pub fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|v| !v.is_null())
}

pub fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
