//! Core values, canonical printing and struct-bound records for Quill.
//!
//! This crate provides:
//! - [`Value`] - The tagged value every evaluator operation passes around
//! - [`Pair`] and [`cons`] - Cons cells and the lists built from them
//! - [`Record`] - Hash-bucketed maps with insertion-ordered keys, optionally
//!   bound to a native struct through a [`StructBinding`]
//! - [`Sexp`] - The canonical text form of every value
//! - [`FactoryRegistry`] - Injected table of struct factories
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod array;
pub mod binding;
pub mod config;
pub mod error;
pub mod function;
pub mod host;
pub mod pair;
pub mod record;
pub mod sexp;
pub mod symbol;
pub mod types;
pub mod value;

pub use array::Array;
pub use binding::{
    EmbedPath, EmbedStep, FactoryRegistry, FieldDescriptor, NativeStruct, RegistryBuilder,
    StructBinding, StructFactory,
};
pub use config::{FLOAT_BITS, FloatBits, FormatConfig, INT_BITS, RecordConfig};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use function::{Closure, Function, NativeFn, NativeFnInner};
pub use host::{Foreign, HostValue, ScopeHandle};
pub use pair::{ListIter, Pair, cons};
pub use record::{ANONYMOUS_TYPE, OrderedIter, Record, key_hash};
pub use sexp::Sexp;
pub use symbol::{Interner, Symbol, SymbolTable};
pub use types::Type;
pub use value::{Sentinel, Value};
