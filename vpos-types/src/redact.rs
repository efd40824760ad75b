//! Redaction of sensitive data before anything reaches a log sink.
//!
//! Key matching is case-insensitive and exact. Credentials and card data
//! are replaced entirely; order identifiers keep their last six characters.

use serde_json::{Map, Value};
use url::Url;

/// Placeholder substituted for sensitive values.
pub const REDACTED: &str = "[REDACTED]";

/// Returned by [`redact_url`] when the input cannot be parsed.
pub const INVALID_URL: &str = "[INVALID_URL]";

const VISIBLE_SUFFIX: usize = 6;

const FULLY_REDACTED_KEYS: &[&str] = &[
    "password",
    "secret",
    "username",
    "login",
    "token",
    "apikey",
    "api_key",
    "terminalid",
    "terminal_id",
    "pan",
    "cardnumber",
    "card_number",
    "cvv",
    "cvv2",
    "cvc",
    "expiry",
    "expiration",
    "expirationdate",
    "exp_date",
    "cardholdername",
];

const PARTIALLY_REDACTED_KEYS: &[&str] = &["orderid", "order_id", "mdorder", "ordernumber"];

/// Fields copied verbatim by [`create_safe_log_data`].
const LOG_FIELDS: &[&str] = &["endpoint", "method", "durationMs", "statusCode", "errorCode"];

/// Identifier fields [`create_safe_log_data`] copies partially redacted.
const LOG_IDENTIFIERS: &[&str] = &["orderId", "orderNumber"];

fn matches_any(key: &str, keys: &[&str]) -> bool {
    keys.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Returns true if values under `key` must never be logged.
pub fn is_fully_redacted(key: &str) -> bool {
    matches_any(key, FULLY_REDACTED_KEYS)
}

/// Returns true if values under `key` are logged with only a visible suffix.
pub fn is_partially_redacted(key: &str) -> bool {
    matches_any(key, PARTIALLY_REDACTED_KEYS)
}

/// Keeps only the trailing six characters; shorter values are hidden entirely.
pub fn mask_identifier(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_SUFFIX {
        return REDACTED.to_string();
    }
    let suffix: String = value.chars().skip(len - VISIBLE_SUFFIX).collect();
    format!("{REDACTED}...{suffix}")
}

/// Returns a safe-to-log version of `value` stored under `key`.
///
/// Nested objects and arrays under non-sensitive keys are walked
/// recursively. Nulls pass through unchanged.
pub fn redact_value(key: &str, value: &Value) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    if is_fully_redacted(key) {
        return Value::String(REDACTED.to_string());
    }
    if is_partially_redacted(key) {
        match value {
            Value::String(s) => return Value::String(mask_identifier(s)),
            Value::Number(n) => return Value::String(mask_identifier(&n.to_string())),
            _ => {}
        }
    }
    redact_object(value)
}

/// Walks any JSON structure and redacts matching keys at every depth.
pub fn redact_object(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_value(k, v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_object).collect()),
        other => other.clone(),
    }
}

/// Rewrites credential query parameters of `raw` to the redaction marker.
///
/// Never fails: unparseable input yields [`INVALID_URL`].
pub fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return INVALID_URL.to_string();
    };

    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(name, value)| {
                let value = if is_fully_redacted(&name) {
                    REDACTED.to_string()
                } else {
                    value.into_owned()
                };
                (name.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}

/// Builds the whitelisted payload the transport logs.
///
/// Only operational fields and partially redacted identifiers survive.
/// Absent fields are omitted rather than emitted as null.
pub fn create_safe_log_data(fields: &Map<String, Value>) -> Map<String, Value> {
    let mut safe = Map::new();
    for key in LOG_FIELDS {
        if let Some(value) = fields.get(*key) {
            safe.insert((*key).to_string(), value.clone());
        }
    }
    for key in LOG_IDENTIFIERS {
        if let Some(value) = fields.get(*key) {
            safe.insert((*key).to_string(), redact_value(key, value));
        }
    }
    safe
}
