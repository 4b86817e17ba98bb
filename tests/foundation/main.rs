//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Pair lists, Record, canonical printing,
//! struct binding, and errors.

mod binding;
mod errors;
mod lists;
mod records;
mod values;
