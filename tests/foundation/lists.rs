//! Integration tests for pairs and lists
//!
//! Tests cons construction, proper and dotted chains, and list walks.

use quill_foundation::{ErrorKind, Value, cons};

#[test]
fn cons_onto_null_is_a_one_element_list() {
    let list = cons(Value::Int(1), Value::NULL);
    assert!(list.is_proper_list());
    assert_eq!(list.list_to_vec().unwrap(), vec![Value::Int(1)]);
}

#[test]
fn null_is_the_empty_list() {
    assert!(Value::NULL.is_proper_list());
    assert_eq!(Value::NULL.list_len(), 0);
    assert!(Value::NULL.list_to_vec().unwrap().is_empty());
}

#[test]
fn non_pair_is_not_a_list() {
    assert!(!Value::Int(1).is_proper_list());
    let err = Value::Int(1).list_to_vec().unwrap_err();
    assert_eq!(err.kind, ErrorKind::ImproperList);
}

#[test]
fn dotted_chain_walks_heads_only() {
    let dotted = cons(Value::Int(1), cons(Value::Int(2), Value::from("end")));
    let pair = dotted.as_pair().unwrap();
    let heads: Vec<_> = pair.iter().cloned().collect();
    assert_eq!(heads, vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(pair.terminal_tail(), &Value::from("end"));
    assert!(!pair.is_proper());
}

#[test]
fn end_sentinel_tail_is_dotted() {
    let list = cons(Value::Int(1), Value::END);
    assert!(!list.is_proper_list());
    assert_eq!(list.list_len(), 1);
}

#[test]
fn shared_tails() {
    let tail = Value::list(vec![Value::Int(2), Value::Int(3)]);
    let a = cons(Value::Int(1), tail.clone());
    let b = cons(Value::Int(0), tail);
    assert_eq!(a.list_len(), 3);
    assert_eq!(b.list_len(), 3);
    assert_eq!(a.as_pair().unwrap().tail, b.as_pair().unwrap().tail);
}

#[test]
fn deep_lists_compare_and_drop() {
    let a = Value::list((0..100_000).map(Value::Int).collect::<Vec<_>>());
    let b = Value::list((0..100_000).map(Value::Int).collect::<Vec<_>>());
    assert_eq!(a, b);
    drop(a);
    drop(b);
}

#[test]
fn deep_head_nesting_compares_and_drops() {
    let nest = || {
        let mut v = Value::Int(7);
        for _ in 0..100_000 {
            v = cons(v, Value::NULL);
        }
        v
    };
    let a = nest();
    let b = nest();
    assert!(a == b);
    drop(a);
    drop(b);
}
