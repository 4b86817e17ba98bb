//! Integration tests for Value types
//!
//! Tests Value variants, truthiness, equality, hashing, and accessors.

use quill_foundation::{
    Array, Error, Foreign, Function, Interner, Record, ScopeHandle, SymbolTable, Type, Value,
    cons,
};
use std::collections::HashSet;

// =============================================================================
// Truthiness
// =============================================================================

#[test]
fn null_is_falsy() {
    assert!(!Value::NULL.is_truthy());
    assert!(Value::NULL.is_null());
}

#[test]
fn other_sentinels_are_truthy() {
    assert!(Value::END.is_truthy());
    assert!(Value::MARKER.is_truthy());
    assert!(!Value::END.is_null());
}

#[test]
fn int_zero_is_falsy() {
    assert!(!Value::Int(0).is_truthy());
    assert!(Value::Int(1).is_truthy());
    assert!(Value::Int(i64::MIN).is_truthy());
}

#[test]
fn nul_char_is_falsy() {
    assert!(!Value::Char('\0').is_truthy());
    assert!(Value::Char('0').is_truthy());
}

#[test]
fn bool_is_its_own_truth() {
    assert!(Value::Bool(true).is_truthy());
    assert!(!Value::Bool(false).is_truthy());
}

#[test]
fn empty_containers_are_truthy() {
    assert!(Value::Float(0.0).is_truthy());
    assert!(Value::from("").is_truthy());
    assert!(Value::Array(Array::new()).is_truthy());
    assert!(Value::record(Record::anonymous()).is_truthy());
    assert!(Value::raw(Vec::<u8>::new()).is_truthy());
    assert!(Value::error(Error::msg("boom")).is_truthy());
}

// =============================================================================
// Equality and hashing
// =============================================================================

#[test]
fn float_equality_is_bitwise() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
}

#[test]
fn no_cross_kind_equality() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::Int(0), Value::Bool(false));
    assert_ne!(Value::from("a"), Value::Char('a'));
}

#[test]
fn structural_list_equality() {
    let a = Value::list(vec![Value::Int(1), Value::from("x")]);
    let b = cons(Value::Int(1), cons(Value::from("x"), Value::NULL));
    assert_eq!(a, b);
}

#[test]
fn equal_values_share_a_hash_slot() {
    let mut set = HashSet::new();
    set.insert(Value::list(vec![Value::Int(1), Value::Int(2)]));
    set.insert(Value::list(vec![Value::Int(1), Value::Int(2)]));
    set.insert(Value::Array(vec![Value::Int(1), Value::Int(2)].into()));
    assert_eq!(set.len(), 2);
}

#[test]
fn functions_compare_by_identity() {
    let f = Function::native("id", |args| Ok(args[0].clone()));
    let g = Function::native("id", |args| Ok(args[0].clone()));
    assert_eq!(Value::Function(f.clone()), Value::Function(f));
    assert_ne!(
        Value::Function(Function::native("k", |_| Ok(Value::NULL))),
        Value::Function(g)
    );
}

#[test]
fn foreign_values_compare_by_identity() {
    let a = Foreign::new(5u32);
    assert_eq!(Value::Foreign(a.clone()), Value::Foreign(a.clone()));
    assert_ne!(Value::Foreign(a), Value::Foreign(Foreign::new(5u32)));
}

// =============================================================================
// Accessors and types
// =============================================================================

#[test]
fn accessors_match_variant() {
    assert_eq!(Value::Int(3).as_int(), Some(3));
    assert_eq!(Value::Int(3).as_float(), None);
    assert_eq!(Value::from("s").as_str(), Some("s"));
    assert_eq!(Value::raw(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
    assert!(Value::NULL.as_pair().is_none());
    assert!(Value::error(Error::msg("x")).as_error().is_some());
}

#[test]
fn value_types() {
    let mut symbols = Interner::new();
    let sym = symbols.intern("x");
    assert_eq!(Value::Int(1).value_type(), Type::Int);
    assert_eq!(Value::Symbol(sym).value_type(), Type::Symbol);
    assert_eq!(Value::NULL.value_type(), Type::Null);
    assert!(Type::List.accepts(&Value::NULL.value_type()));
    assert!(!Type::Float.accepts(&Type::Int));
}

#[test]
fn foreign_downcasts_to_host_type() {
    #[derive(Debug)]
    struct Handle(u16);

    let v = Value::Foreign(Foreign::new(Handle(9)));
    let Value::Foreign(foreign) = &v else {
        panic!("expected foreign");
    };
    assert_eq!(foreign.downcast_ref::<Handle>().map(|h| h.0), Some(9));
    assert!(foreign.downcast_ref::<u16>().is_none());
}

#[test]
fn closures_keep_scope_alive() {
    let scope = ScopeHandle::new(vec![1, 2, 3]);
    let f = Function::interpreted("f", 0, false, scope.clone(), None);
    assert_eq!(scope.holders(), 2);
    assert!(f.scope().unwrap().ptr_eq(&scope));
    drop(f);
    assert_eq!(scope.holders(), 1);
}

#[test]
fn native_functions_are_callable() {
    let add = Function::native("+", |args| {
        let total = args.iter().filter_map(Value::as_int).sum::<i64>();
        Ok(Value::Int(total))
    });
    assert_eq!(
        add.call(&[Value::Int(2), Value::Int(3)]).unwrap(),
        Value::Int(5)
    );
    assert_eq!(add.arity(), None);
}
