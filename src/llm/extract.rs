//! Defensive JSON extraction from model output
//!
//! Local models wrap JSON in prose, fenced code blocks, or emit
//! trailing commentary. This module concentrates all of that shape
//! handling in one place so business logic only ever sees a parsed
//! object: raw parse first, then a fenced ```json block, then the
//! first balanced object found by a single-pass bracket scan.

use regex::Regex;
use std::sync::OnceLock;

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fence regex is valid")
    })
}

/// Extract the first JSON object from arbitrary model output
///
/// Returns None only when no parseable object exists anywhere in the
/// text.
pub fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if value.is_object() {
            return Some(value);
        }
    }

    if let Some(captures) = fence_regex().captures(trimmed) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&captures[1]) {
            if value.is_object() {
                return Some(value);
            }
        }
    }

    let candidate = first_balanced_object(trimmed)?;
    match serde_json::from_str::<serde_json::Value>(candidate) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Find the first balanced `{...}` span using bracket matching
///
/// Single pass, string- and escape-aware so braces inside string
/// literals do not confuse the depth counter.
fn first_balanced_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &byte) in bytes.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if !in_string => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                if depth == 0 {
                    let begin = start?;
                    return Some(&text[begin..=i]);
                }
            }
            _ => {}
        }
    }

    None
}
