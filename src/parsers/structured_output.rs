// Structured output normalizer - extracts the section array from backend replies
//
// Hosted backends usually answer with the bare JSON array. Local models tend
// to wrap it in prose ("Here you go: [ ... ] Hope this helps!"), so when the
// strict parse fails we fall back to the first `[` .. last `]` span.

use crate::errors::GenerationError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Which normalization step produced the candidate array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeStrategy {
    /// The whole reply parsed as a JSON array
    Strict,
    /// A bracketed array embedded in surrounding text
    Embedded,
}

/// Greedy: first `[` through the last `]`, across newlines
fn embedded_array_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[[\s\S]*\]").expect("embedded array pattern is valid"))
}

/// Parse text as a JSON array, returning its elements
fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Strategy 1: treat the entire reply as a serialized array
pub fn parse_strict(raw: &str) -> Option<Vec<Value>> {
    parse_array(raw.trim())
}

/// Strategy 2: find the bracketed array inside surrounding text
pub fn extract_embedded_array(raw: &str) -> Option<Vec<Value>> {
    let found = embedded_array_pattern().find(raw)?;
    parse_array(found.as_str())
}

/// Extract a candidate section array from a raw backend reply.
///
/// Strategies are tried in order and the first success wins. If neither
/// yields a parseable array the error carries the original text.
pub fn normalize(raw: &str) -> Result<(Value, NormalizeStrategy), GenerationError> {
    if let Some(items) = parse_strict(raw) {
        return Ok((Value::Array(items), NormalizeStrategy::Strict));
    }

    if let Some(items) = extract_embedded_array(raw) {
        log::debug!(
            "[structured_output] Strict parse failed, extracted embedded array ({} items)",
            items.len()
        );
        return Ok((Value::Array(items), NormalizeStrategy::Embedded));
    }

    log::warn!(
        "[structured_output] No JSON array found in reply: {}",
        crate::utils::preview(raw, 200)
    );
    Err(GenerationError::malformed(raw))
}
