//! GraphSON v2 value handling.
//!
//! GraphSON wraps non-native values as `{"@type": "g:Int64", "@value": 3}`,
//! and vertex properties arrive as arrays of `{"id", "value"}` envelopes.
//! Callers of the client only ever see bare values.

use serde_json::{Map, Value};

fn typed_inner(value: &Value) -> Option<&Value> {
    let obj = value.as_object()?;
    if obj.len() == 2 && obj.get("@type").is_some_and(Value::is_string) {
        obj.get("@value")
    } else {
        None
    }
}

/// Remove typed wrappers from the top of `value`, by reference.
pub fn peel(mut value: &Value) -> &Value {
    while let Some(inner) = typed_inner(value) {
        value = inner;
    }
    value
}

/// Recursively remove every typed wrapper from `value`.
pub fn strip_types(value: Value) -> Value {
    match value {
        Value::Object(mut obj) => {
            let is_typed = obj.len() == 2 && obj.get("@type").is_some_and(Value::is_string);
            match obj.remove("@value") {
                Some(inner) if is_typed => strip_types(inner),
                Some(inner) => {
                    obj.insert("@value".to_string(), inner);
                    Value::Object(strip_object(obj))
                }
                None => Value::Object(strip_object(obj)),
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(strip_types).collect()),
        other => other,
    }
}

fn strip_object(obj: Map<String, Value>) -> Map<String, Value> {
    obj.into_iter().map(|(k, v)| (k, strip_types(v))).collect()
}

/// Read a count-like scalar.
pub fn as_i64(value: &Value) -> Option<i64> {
    match peel(value) {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}

/// Render a scalar as a string: strings verbatim, numbers and booleans
/// formatted. Objects, arrays and null yield `None`.
pub fn as_plain_string(value: &Value) -> Option<String> {
    match peel(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Unwrap a vertex property to its bare value.
///
/// Accepts the envelope forms engines use: `[{"id": .., "value": x}]`
/// (first entry wins), a single `{"value": x}` object, or a bare value.
pub fn property_value(value: &Value) -> Value {
    let value = peel(value);
    let first = match value {
        Value::Array(items) => match items.first() {
            Some(first) => peel(first),
            None => return Value::Null,
        },
        other => other,
    };
    match first.as_object().and_then(|o| o.get("value")) {
        Some(inner) => peel(inner).clone(),
        None => first.clone(),
    }
}
