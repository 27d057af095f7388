// API endpoints: a flat list of route descriptions

use serde_json::{json, Map, Value};

use super::aliases::API_ENDPOINTS;
use super::coerce::{coerce_bool, list_field, text_field};
use super::{expect_array, object_items, string_array, NormalizeError};

pub fn normalize_api_endpoints(data: &Value) -> Result<Value, NormalizeError> {
    let items = expect_array(API_ENDPOINTS.record, API_ENDPOINTS.unwrap(data))?;
    let endpoints = object_items(API_ENDPOINTS.record, items)?
        .into_iter()
        .map(normalize_endpoint)
        .collect();
    Ok(Value::Array(endpoints))
}

fn normalize_endpoint(endpoint: &Map<String, Value>) -> Value {
    let request_body = match endpoint.get("request_body") {
        Some(body @ Value::Object(_)) => body.clone(),
        _ => Value::Null,
    };
    let response_structure = match endpoint.get("response_structure") {
        Some(shape @ Value::Object(map)) if !map.is_empty() => shape.clone(),
        _ => json!({"message": "Success"}),
    };

    json!({
        "path": text_field(endpoint, "path", "/api/unknown"),
        "method": text_field(endpoint, "method", "GET"),
        "description": text_field(endpoint, "description", "No description provided"),
        "request_body": request_body,
        "response_structure": response_structure,
        "auth_required": coerce_bool(endpoint.get("auth_required"), false),
        "related_features": string_array(list_field(endpoint, "related_features", &["General"])),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_endpoint() {
        let out = normalize_api_endpoints(&json!([{}])).unwrap();
        assert_eq!(
            out,
            json!([{
                "path": "/api/unknown",
                "method": "GET",
                "description": "No description provided",
                "request_body": null,
                "response_structure": {"message": "Success"},
                "auth_required": false,
                "related_features": ["General"]
            }])
        );
    }

    #[test]
    fn test_wrapped_endpoints_keep_values() {
        let data = json!({"endpoints": [{
            "path": "/api/users",
            "method": "POST",
            "request_body": {"email": "string"},
            "response_structure": {"id": "uuid"},
            "auth_required": "yes",
            "related_features": "Signup, Profile"
        }]});
        let out = normalize_api_endpoints(&data).unwrap();
        let ep = &out[0];
        assert_eq!(ep["path"], "/api/users");
        assert_eq!(ep["request_body"], json!({"email": "string"}));
        assert_eq!(ep["response_structure"], json!({"id": "uuid"}));
        assert_eq!(ep["auth_required"], json!(true));
        assert_eq!(ep["related_features"], json!(["Signup", "Profile"]));
    }

    #[test]
    fn test_non_object_request_body_dropped() {
        let out = normalize_api_endpoints(&json!([{"request_body": "none"}])).unwrap();
        assert_eq!(out[0]["request_body"], Value::Null);
    }

    #[test]
    fn test_empty_reply_gives_empty_list() {
        assert_eq!(normalize_api_endpoints(&json!({})).unwrap(), json!([]));
    }

    #[test]
    fn test_wrong_shapes_are_errors() {
        assert!(normalize_api_endpoints(&json!("GET /")).is_err());
        assert!(normalize_api_endpoints(&json!({"path": "/x"})).is_err());
        assert!(normalize_api_endpoints(&json!(["/x"])).is_err());
    }
}
