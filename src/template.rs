//! Template reconciliation.
//!
//! A template is a JSON object describing the expected top-level shape of the
//! document along with default values. Reconciliation is deliberately shallow:
//! nested objects are taken wholesale from whichever side wins.

use serde_json::{Map, Value};

fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

/// Fills every template key from `candidate` when present and non-null,
/// falling back to the template's value otherwise.
///
/// Keys of `candidate` that the template does not name are dropped. A
/// non-object candidate is treated as empty; a non-object template yields an
/// empty object.
#[must_use]
pub fn reconcile(candidate: &Value, template: &Value) -> Value {
    let Some(template) = template.as_object() else {
        return Value::Object(Map::new());
    };
    let candidate = candidate.as_object();

    let mut out = Map::with_capacity(template.len());
    for (key, default) in template {
        let value = match candidate.and_then(|c| c.get(key)) {
            Some(v) if !v.is_null() => v.clone(),
            _ => default.clone(),
        };
        out.insert(key.clone(), value);
    }
    Value::Object(out)
}

/// Returns the top-level template keys that are absent or null in `candidate`.
#[must_use]
pub fn missing_keys(candidate: &Value, template: &Value) -> Vec<String> {
    let Some(template) = template.as_object() else {
        return Vec::new();
    };
    let candidate = candidate.as_object();
    template
        .keys()
        .filter(|key| !is_present(candidate.and_then(|c| c.get(key.as_str()))))
        .cloned()
        .collect()
}

/// True iff every top-level key of `template` is present and non-null in
/// `candidate`. Nested shape is not inspected.
#[must_use]
pub fn is_same(candidate: &Value, template: &Value) -> bool {
    missing_keys(candidate, template).is_empty()
}
