//! Quill - a small Lisp value core
//!
//! This crate re-exports the layers of the Quill system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 0: quill_foundation — Values, canonical printing, records, struct binding
//! ```
//!
//! The reader, evaluator and symbol table live outside this workspace and
//! talk to the foundation through the interfaces it exposes
//! ([`foundation::SymbolTable`], [`foundation::NativeStruct`],
//! [`foundation::FactoryRegistry`]).

pub use quill_foundation as foundation;
