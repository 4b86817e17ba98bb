//! Integration tests for Record
//!
//! Tests named and anonymous records, key order, removal, and copy-on-write.

use quill_foundation::{ANONYMOUS_TYPE, Interner, Record, RecordConfig, SymbolTable, Value};

#[test]
fn anonymous_records_use_the_hash_type_name() {
    let rec = Record::anonymous();
    assert_eq!(rec.type_name(), ANONYMOUS_TYPE);
    assert!(rec.is_anonymous());
    assert!(Record::new("hash").is_anonymous());
    assert!(!Record::named("Point").is_anonymous());
}

#[test]
fn key_order_tracks_first_insertion() {
    let mut rec = Record::named("Point");
    rec.insert(Value::from("y"), Value::Int(2));
    rec.insert(Value::from("x"), Value::Int(1));
    rec.insert(Value::from("y"), Value::Int(20));

    assert_eq!(rec.len(), 2);
    assert_eq!(rec.keys(), &[Value::from("y"), Value::from("x")]);
    let values: Vec<_> = rec.iter().map(|(_, v)| v.clone()).collect();
    assert_eq!(values, vec![Value::Int(20), Value::Int(1)]);
}

#[test]
fn insert_returns_the_replaced_value() {
    let mut rec = Record::anonymous();
    assert_eq!(rec.insert(Value::Int(1), Value::from("a")), None);
    assert_eq!(
        rec.insert(Value::Int(1), Value::from("b")),
        Some(Value::from("a"))
    );
}

#[test]
fn missing_key_is_an_error() {
    let rec = Record::named("Point");
    let err = rec.get(&Value::from("z")).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("\"z\""));
}

#[test]
fn remove_drops_key_from_order() {
    let mut rec = Record::named("T");
    for i in 0..5 {
        rec.insert(Value::Int(i), Value::Int(i * 10));
    }
    assert_eq!(rec.remove(&Value::Int(2)).unwrap(), Value::Int(20));
    assert!(!rec.contains_key(&Value::Int(2)));
    assert_eq!(rec.len(), 4);
    assert_eq!(
        rec.keys(),
        &[Value::Int(0), Value::Int(1), Value::Int(3), Value::Int(4)]
    );
    assert!(rec.remove(&Value::Int(2)).is_err());
}

#[test]
fn symbol_and_string_keys_are_distinct() {
    let mut symbols = Interner::new();
    let mut rec = Record::named("T");
    rec.insert(Value::from("a"), Value::Int(1));
    rec.insert(Value::Symbol(symbols.intern("a")), Value::Int(2));
    assert_eq!(rec.len(), 2);
}

#[test]
fn equality_ignores_key_order() {
    let mut a = Record::named("P");
    a.insert(Value::from("x"), Value::Int(1));
    a.insert(Value::from("y"), Value::Int(2));
    let mut b = Record::named("P");
    b.insert(Value::from("y"), Value::Int(2));
    b.insert(Value::from("x"), Value::Int(1));
    assert_eq!(a, b);

    let mut c = Record::named("Q");
    c.insert(Value::from("x"), Value::Int(1));
    c.insert(Value::from("y"), Value::Int(2));
    assert_ne!(a, c);
}

#[test]
fn shared_records_copy_on_write() {
    let mut rec = Record::named("P");
    rec.insert(Value::from("x"), Value::Int(1));
    let original = Value::record(rec);
    let mut copy = original.clone();

    copy.as_record_mut()
        .unwrap()
        .insert(Value::from("x"), Value::Int(99));

    let read = |v: &Value| v.as_record().unwrap().get(&Value::from("x")).unwrap().clone();
    assert_eq!(read(&original), Value::Int(1));
    assert_eq!(read(&copy), Value::Int(99));
}

#[test]
fn configured_capacity_does_not_change_behavior() {
    let config = RecordConfig::default().with_initial_capacity(64);
    let mut rec = Record::with_config("Big", &config);
    assert!(rec.is_empty());
    rec.insert(Value::Int(1), Value::Int(1));
    assert_eq!(rec.len(), 1);
}

#[test]
fn buckets_hold_every_entry() {
    let mut rec = Record::anonymous();
    for i in 0..100 {
        rec.insert(Value::Int(i), Value::Bool(i % 2 == 0));
    }
    assert_eq!(rec.iter_buckets().count(), 100);
    assert_eq!(rec.iter().len(), 100);
}
