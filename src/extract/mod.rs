// Tolerant JSON extraction for model replies
//
// Model output often wraps the JSON payload in prose, markdown fences,
// JS-style comments or trailing commas. `extract_json` recovers the payload
// or degrades to an empty container; it never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Characters of the raw reply kept in the failure log line.
const LOG_PREVIEW_CHARS: usize = 500;

/// First fenced block, optionally tagged `json`.
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fenced block pattern is valid")
});

/// First greedy object or array span.
static JSON_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\{[\s\S]*\}|\[[\s\S]*\])").expect("json span pattern is valid"));

/// Recover a JSON value from free-form model output.
///
/// Tries, in order: the first fenced code block, the first `{...}`/`[...]`
/// span, then the whole trimmed text. Returns `[]` when nothing parses and the
/// text starts with `[`, otherwise `{}`.
pub fn extract_json(text: &str) -> Value {
    let cleaned = strip_line_comments(text);

    match parse_candidates(&cleaned) {
        Ok(value) => value,
        Err(err) => {
            let preview: String = cleaned.chars().take(LOG_PREVIEW_CHARS).collect();
            tracing::warn!(error = %err, raw = %preview, "Could not extract JSON from model reply");
            empty_for(&cleaned)
        }
    }
}

fn parse_candidates(text: &str) -> Result<Value, serde_json::Error> {
    if let Some(block) = FENCED_BLOCK.captures(text).and_then(|caps| caps.get(1)) {
        match serde_json::from_str(&strip_trailing_commas(block.as_str())) {
            Ok(value) => return Ok(value),
            Err(e) => tracing::debug!("Fenced block is not valid JSON: {}", e),
        }
    }

    if let Some(span) = JSON_SPAN.find(text) {
        match serde_json::from_str(&strip_trailing_commas(span.as_str())) {
            Ok(value) => return Ok(value),
            Err(e) => tracing::debug!("Bracketed span is not valid JSON: {}", e),
        }
    }

    serde_json::from_str(text.trim())
}

fn empty_for(text: &str) -> Value {
    if text.trim_start().starts_with('[') {
        Value::Array(Vec::new())
    } else {
        Value::Object(serde_json::Map::new())
    }
}

/// Remove `//` comments line by line, leaving `//` inside string literals
/// (URLs, mostly) untouched.
pub fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let end = comment_start(line).unwrap_or(line.len());
        out.push_str(&line[..end]);
    }
    out
}

/// Byte offset of the first `//` outside a string literal.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            return Some(i);
        }
    }
    None
}

/// Drop commas that directly precede a closing `}` or `]`, ignoring any
/// whitespace between them. String literals are left as-is.
pub fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
