//! Property tests for reconciliation, codecs and array merging.

use proptest::prelude::*;
use serde_json::{Map, Number, Value};
use shelfdb::merge::put_into;
use shelfdb::{is_same, reconcile, BinaryCodec, Codec, PlainCodec};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9f64).prop_map(|f| Number::from_f64(f).map_or(Value::Null, Value::Number)),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..8)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>()))
}

proptest! {
    #[test]
    fn reconcile_has_exactly_template_keys(candidate in json_object(), template in json_object()) {
        let out = reconcile(&candidate, &template);
        let out = out.as_object().unwrap();
        let template_map = template.as_object().unwrap();

        prop_assert_eq!(out.len(), template_map.len());
        for (key, default) in template_map {
            let expected = match candidate.get(key) {
                Some(v) if !v.is_null() => v,
                _ => default,
            };
            prop_assert_eq!(out.get(key), Some(expected));
        }
    }

    #[test]
    fn reconciled_candidate_is_same_shape(candidate in json_object(), template in json_object()) {
        let out = reconcile(&candidate, &template);
        let has_null_default = template
            .as_object()
            .unwrap()
            .iter()
            .any(|(k, v)| v.is_null() && candidate.get(k).map_or(true, Value::is_null));
        if !has_null_default {
            prop_assert!(is_same(&out, &template));
        }
    }

    #[test]
    fn plain_round_trip(doc in json_value()) {
        let bytes = PlainCodec.encode(&doc).unwrap();
        prop_assert_eq!(PlainCodec.decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn binary_round_trip(doc in json_value()) {
        let bytes = BinaryCodec.encode(&doc).unwrap();
        prop_assert_eq!(BinaryCodec.decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn put_is_idempotent(seq in prop::collection::vec(json_value(), 0..8), value in json_value()) {
        let mut once = seq.clone();
        put_into(&mut once, value.clone(), false);
        let mut twice = once.clone();
        put_into(&mut twice, value, false);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn forced_put_appends_every_time(seq in prop::collection::vec(json_value(), 0..8), value in json_value()) {
        let mut out = seq.clone();
        prop_assert!(put_into(&mut out, value.clone(), true));
        prop_assert!(put_into(&mut out, value.clone(), true));
        prop_assert_eq!(out.len(), seq.len() + 2);
        prop_assert_eq!(&out[seq.len()], &value);
        prop_assert_eq!(&out[seq.len() + 1], &value);
    }

    #[test]
    fn partial_object_is_duplicate(a in any::<i64>(), b in any::<i64>()) {
        let mut seq = vec![serde_json::json!({ "a": a, "b": b })];
        let partial = serde_json::json!({ "a": a });
        prop_assert!(!put_into(&mut seq, partial, false));
        let different = serde_json::json!({ "a": a.wrapping_add(1) });
        prop_assert!(put_into(&mut seq, different, false));
    }
}
