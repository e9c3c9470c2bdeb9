//! Dedup-aware insertion into array-valued fields.
//!
//! Object values are matched by partial containment: an existing element is a
//! duplicate if it carries every key of the inserted object with an equal
//! value. Arrays are matched the same way by index. Scalars use plain
//! membership. The scan is linear; documents are expected to be small.

use serde_json::Value;

/// Structural equality where numbers compare by numeric value, so `1` equals `1.0`.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                return true;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => a == b,
    }
}

/// True if `element` holds an equal value for every key (or index) of `probe`.
fn contains_partial(element: &Value, probe: &Value) -> bool {
    match (element, probe) {
        (Value::Object(element), Value::Object(probe)) => probe
            .iter()
            .all(|(k, v)| element.get(k).is_some_and(|e| values_equal(e, v))),
        (Value::Array(element), Value::Array(probe)) => {
            probe.len() <= element.len()
                && probe.iter().zip(element).all(|(p, e)| values_equal(e, p))
        }
        _ => false,
    }
}

/// Returns true if `value` already has a matching element in `seq`.
#[must_use]
pub fn is_duplicate(seq: &[Value], value: &Value) -> bool {
    match value {
        Value::Object(_) | Value::Array(_) => seq.iter().any(|e| contains_partial(e, value)),
        _ => seq.iter().any(|e| values_equal(e, value)),
    }
}

/// Appends `value` to `seq` unless it is a duplicate. `force` skips the check.
///
/// Returns whether the value was appended.
pub fn put_into(seq: &mut Vec<Value>, value: Value, force: bool) -> bool {
    if !force && is_duplicate(seq, &value) {
        return false;
    }
    seq.push(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_dedup() {
        let mut seq = vec![json!("note 1")];
        assert!(!put_into(&mut seq, json!("note 1"), false));
        assert!(put_into(&mut seq, json!("note 2"), false));
        assert_eq!(seq, vec![json!("note 1"), json!("note 2")]);
    }

    #[test]
    fn test_force_appends_duplicate() {
        let mut seq = vec![json!("a")];
        assert!(put_into(&mut seq, json!("a"), true));
        assert!(put_into(&mut seq, json!("a"), true));
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_partial_object_dedup() {
        let seq = vec![json!({ "a": 1, "b": 2 })];
        assert!(is_duplicate(&seq, &json!({ "a": 1 })));
        assert!(is_duplicate(&seq, &json!({ "a": 1, "b": 2 })));
        assert!(!is_duplicate(&seq, &json!({ "a": 2 })));
        assert!(!is_duplicate(&seq, &json!({ "a": 1, "c": 3 })));
    }

    #[test]
    fn test_empty_object_matches_any_object() {
        let seq = vec![json!({ "a": 1 })];
        assert!(is_duplicate(&seq, &json!({})));
        assert!(!is_duplicate(&[json!(1)], &json!({})));
        assert!(!is_duplicate(&[], &json!({})));
    }

    #[test]
    fn test_object_does_not_match_scalar_elements() {
        let seq = vec![json!("a"), json!(1), Value::Null];
        assert!(!is_duplicate(&seq, &json!({ "a": 1 })));
    }

    #[test]
    fn test_nested_values_compare_structurally() {
        let seq = vec![json!({ "user": { "id": 7 }, "tags": ["x"] })];
        assert!(is_duplicate(&seq, &json!({ "user": { "id": 7 } })));
        assert!(!is_duplicate(&seq, &json!({ "user": { "id": 8 } })));
        assert!(is_duplicate(&seq, &json!({ "tags": ["x"] })));
    }

    #[test]
    fn test_array_values_match_by_index() {
        let seq = vec![json!([1, 2, 3])];
        assert!(is_duplicate(&seq, &json!([1, 2])));
        assert!(!is_duplicate(&seq, &json!([2])));
        assert!(!is_duplicate(&seq, &json!([1, 2, 3, 4])));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!("1")));
        let mut seq = vec![json!(2.0)];
        assert!(!put_into(&mut seq, json!(2), false));
    }

    #[test]
    fn test_null_is_scalar() {
        let mut seq = vec![json!("a")];
        assert!(put_into(&mut seq, Value::Null, false));
        assert!(!put_into(&mut seq, Value::Null, false));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut seq = Vec::new();
        for v in ["c", "a", "b", "a"] {
            put_into(&mut seq, json!(v), false);
        }
        assert_eq!(seq, vec![json!("c"), json!("a"), json!("b")]);
    }
}
