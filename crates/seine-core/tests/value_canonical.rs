use std::collections::BTreeMap;

use seine_core::Value;

#[test]
fn float_equality_is_bit_exact() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    assert_eq!(
        Value::Float(f64::NAN).canonical_key(),
        Value::Float(f64::NAN).canonical_key()
    );
    assert_ne!(
        Value::Float(0.0).canonical_key(),
        Value::Float(-0.0).canonical_key()
    );
}

#[test]
fn numeric_variants_do_not_collide() {
    assert_ne!(Value::Int(2), Value::Float(2.0));
    assert_ne!(
        Value::Int(2).canonical_key(),
        Value::Float(2.0).canonical_key()
    );
}

#[test]
fn map_keys_canonicalize_independently_of_insertion_order() {
    let mut forward = BTreeMap::new();
    forward.insert("alpha".to_string(), Value::Int(1));
    forward.insert("beta".to_string(), Value::Bool(true));

    let mut backward = BTreeMap::new();
    backward.insert("beta".to_string(), Value::Bool(true));
    backward.insert("alpha".to_string(), Value::Int(1));

    let a = Value::Map(forward);
    let b = Value::Map(backward);
    assert_eq!(a, b);
    assert_eq!(a.canonical_key(), b.canonical_key());
}

#[test]
fn tricky_strings_stay_distinct() {
    let joined = Value::Str("a,b".to_string());
    let split = Value::List(vec![
        Value::Str("a".to_string()),
        Value::Str("b".to_string()),
    ]);
    assert_ne!(joined.canonical_key(), split.canonical_key());

    let nested = Value::List(vec![Value::List(vec![Value::Int(1)]), Value::Int(2)]);
    let flat = Value::List(vec![Value::Int(1), Value::Int(2)]);
    assert_ne!(nested.canonical_key(), flat.canonical_key());
}

#[test]
fn values_roundtrip_through_json() {
    let mut map = BTreeMap::new();
    map.insert("weights".to_string(), Value::List(vec![Value::Float(0.25)]));
    map.insert("label".to_string(), Value::Str("bin".to_string()));
    let value = Value::List(vec![
        Value::Unit,
        Value::Bool(false),
        Value::Int(-3),
        Value::Float(-0.0),
        Value::Map(map),
    ]);

    let encoded = serde_json::to_string(&value).unwrap();
    let decoded: Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(value, decoded);
    assert_eq!(value.canonical_key(), decoded.canonical_key());
}
