//! Display text extraction from a relay success body.

use serde_json::Value;

pub const NO_RESPONSE: &str = "No response received";

/// Text to show for a successful generation.
///
/// Checked in order: `choices[0].message.content`, then a plain `response`
/// field, then [`NO_RESPONSE`]. Empty strings are skipped.
pub fn extract_content(body: &Value) -> String {
    choice_content(body)
        .or_else(|| plain_response(body))
        .unwrap_or(NO_RESPONSE)
        .to_string()
}

fn choice_content(body: &Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .filter(|s| !s.is_empty())
}

fn plain_response(body: &Value) -> Option<&str> {
    body.get("response")?.as_str().filter(|s| !s.is_empty())
}
