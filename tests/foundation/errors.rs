//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error values.

use quill_foundation::{Error, ErrorContext, ErrorKind, Type, Value};

#[test]
fn error_type_mismatch() {
    let err = Error::type_mismatch(Type::Int, Type::String);
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("int") && msg.contains("string"));
}

#[test]
fn error_key_not_found() {
    let err = Error::key_not_found("\"k\"");
    assert!(err.is_not_found());
    assert!(err.to_string().contains("\"k\""));
}

#[test]
fn error_embed_path_names_step() {
    let err = Error::embed_path("Outer:Inner", "Inner");
    let msg = err.to_string();
    assert!(msg.contains("Outer:Inner"));
    assert!(msg.contains("Inner"));
}

#[test]
fn error_arity_mismatch() {
    let err = Error::arity_mismatch("2".to_string(), 3);
    assert_eq!(
        err.kind,
        ErrorKind::ArityMismatch {
            expected: "2".to_string(),
            actual: 3
        }
    );
}

#[test]
fn error_with_context() {
    let err = Error::msg("bad form").with_context(
        ErrorContext::new()
            .with_source("init.ql")
            .with_position(3, 7),
    );
    assert!(err.context.is_some());
    assert_eq!(err.to_string(), "bad form");
}

#[test]
fn errors_are_values() {
    let v = Value::error(Error::msg("nope"));
    assert_eq!(v.as_error().map(ToString::to_string), Some("nope".to_string()));
    assert_eq!(v, Value::error(Error::msg("nope")));
    assert_ne!(v, Value::error(Error::internal("nope")));
}
