//! Field sanitization.
//!
//! Every inbound field goes through the same pipeline: coerce to a string
//! (anything that is not a JSON string becomes empty), normalize line
//! endings to `\n`, trim, truncate to a per-field character budget, then
//! trim the tail again. The second trim keeps the pipeline idempotent when
//! truncation lands right after whitespace.

use serde_json::Value;

pub const MAX_NAME: usize = 100;
pub const MAX_COMPANY: usize = 120;
pub const MAX_EMAIL: usize = 254;
pub const MAX_PHONE: usize = 32;
pub const MAX_INQUIRY_TYPE: usize = 100;
pub const MAX_MESSAGE: usize = 3000;
pub const MAX_SERVICE: usize = 64;
pub const MAX_SERVICES: usize = 20;
/// Budget for the honeypot; only emptiness matters.
pub const MAX_HONEYPOT: usize = 256;

/// Borrow the string inside `value`, or `""` for any other JSON type.
#[must_use]
pub fn coerce(value: &Value) -> &str {
    match value {
        Value::String(s) => s,
        _ => "",
    }
}

/// Sanitize free text to at most `max_chars` characters.
#[must_use]
pub fn sanitize_text(value: &str, max_chars: usize) -> String {
    let normalized = value.replace("\r\n", "\n").replace('\r', "\n");
    let truncated: String = normalized.trim().chars().take(max_chars).collect();
    truncated.trim_end().to_owned()
}

/// Sanitize a JSON field to at most `max_chars` characters.
#[must_use]
pub fn sanitize_value(value: &Value, max_chars: usize) -> String {
    sanitize_text(coerce(value), max_chars)
}

/// Sanitize an email address: lower-cased, then capped at [`MAX_EMAIL`].
#[must_use]
pub fn sanitize_email(value: &Value) -> String {
    sanitize_text(&coerce(value).to_lowercase(), MAX_EMAIL)
}

/// Sanitize the services list.
///
/// Non-array input yields an empty list. Each entry is sanitized to
/// [`MAX_SERVICE`] characters, empty entries are dropped, and at most
/// [`MAX_SERVICES`] survive.
#[must_use]
pub fn sanitize_services(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| sanitize_value(item, MAX_SERVICE))
        .filter(|s| !s.is_empty())
        .take(MAX_SERVICES)
        .collect()
}
