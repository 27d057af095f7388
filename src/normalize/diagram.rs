// Mermaid architecture diagram cleanup

use serde_json::Value;

const DIAGRAM_KEYS: &[&str] = &["architecture_diagram", "mermaid", "diagram"];
const DIRECTIVES: &[&str] = &["graph ", "flowchart ", "sequenceDiagram", "classDiagram"];

/// Turn a raw model reply into renderable Mermaid source.
///
/// Keeps only the body of the first fenced block, unwraps a JSON object that carries the code under
/// a known key, and prefixes `flowchart TB` when no diagram directive leads.
pub fn normalize_architecture_diagram(reply: &str) -> String {
    let mut code = reply.trim().to_string();

    if let Some(start) = code.find("```") {
        let after = &code[start + 3..];
        let after = after.strip_prefix("mermaid").unwrap_or(after);
        let body = match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        };
        code = body.trim().to_string();
    }

    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(&code) {
        if let Some(inner) = DIAGRAM_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
        {
            code = inner.trim().to_string();
        }
    }

    if DIRECTIVES.iter().any(|d| code.starts_with(d)) {
        code
    } else {
        format!("flowchart TB\n{}", code)
    }
}
