// Security considerations

use serde_json::{json, Map, Value};

use super::aliases::SECURITY;
use super::coerce::{list_field, text_field};
use super::{expect_object, string_array, NormalizeError};

pub fn normalize_security_considerations(data: &Value) -> Result<Value, NormalizeError> {
    let obj = expect_object(SECURITY.record, SECURITY.unwrap(data))?;

    let data_encryption = match obj.get("data_encryption") {
        Some(Value::Object(enc)) if !enc.is_empty() => encryption(enc),
        _ => json!({"in_transit": "TLS 1.3", "at_rest": "AES-256"}),
    };

    Ok(json!({
        "authentication_method": text_field(obj, "authentication_method", "JWT-based authentication"),
        "authorization_approach": text_field(obj, "authorization_approach", "Role-based access control"),
        "data_encryption": data_encryption,
        "security_best_practices": string_array(list_field(
            obj,
            "security_best_practices",
            &["Input validation", "CSRF protection", "Regular updates"],
        )),
        "compliance_considerations": string_array(list_field(obj, "compliance_considerations", &["GDPR", "CCPA"])),
        "security_testing": string_array(list_field(
            obj,
            "security_testing",
            &["Penetration testing", "Vulnerability scanning"],
        )),
    }))
}

fn encryption(enc: &Map<String, Value>) -> Value {
    json!({
        "in_transit": text_field(enc, "in_transit", "TLS 1.3"),
        "at_rest": text_field(enc, "at_rest", "AES-256"),
    })
}
