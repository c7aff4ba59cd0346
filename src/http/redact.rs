use serde_json::{Map, Value};
use url::form_urlencoded;

const REDACTED: &str = "[REDACTED]";
const ERROR_FIELDS: [&str; 3] = ["code", "message", "status"];

/// Turns an upstream error body into the `details` value relayed to callers.
///
/// Provider error objects (`{"error": {...}}`) are reduced to `code`, `message`
/// and `status`. Any occurrence of `secret` in a string is replaced.
#[must_use]
pub fn upstream_details(body: &[u8], secret: &str) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("error") {
            Some(Value::Object(error)) => {
                let kept: Map<String, Value> = ERROR_FIELDS
                    .iter()
                    .filter_map(|field| error.get(*field).map(|v| ((*field).to_string(), v.clone())))
                    .collect();
                let mut wrapped = Map::new();
                wrapped.insert("error".to_string(), Value::Object(kept));
                scrub(Value::Object(wrapped), secret)
            }
            _ => scrub(Value::Object(map), secret),
        },
        Ok(other) => scrub(other, secret),
        Err(_) => scrub(
            Value::String(String::from_utf8_lossy(body).into_owned()),
            secret,
        ),
    }
}

/// Replaces every occurrence of `secret` inside string values and object keys.
#[must_use]
pub fn scrub(value: Value, secret: &str) -> Value {
    if secret.is_empty() {
        return value;
    }
    match value {
        Value::String(s) => Value::String(scrub_str(&s, secret)),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| scrub(v, secret)).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (scrub_str(&k, secret), scrub(v, secret)))
                .collect(),
        ),
        other => other,
    }
}

/// Replaces the secret, and its form-encoded spelling as it appears in the
/// outbound query string.
#[must_use]
pub fn scrub_str(s: &str, secret: &str) -> String {
    if secret.is_empty() {
        return s.to_string();
    }
    let scrubbed = s.replace(secret, REDACTED);
    let encoded: String = form_urlencoded::byte_serialize(secret.as_bytes()).collect();
    if encoded == secret {
        scrubbed
    } else {
        scrubbed.replace(&encoded, REDACTED)
    }
}
