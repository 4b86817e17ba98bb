//! Type descriptors for struct-bound record fields.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type descriptor for a native struct field or a dynamic value.
///
/// Field descriptors declare one of these; [`Value::value_type`](crate::Value::value_type)
/// reports the dynamic side so materialization can check the two agree.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The empty list `()`.
    Null,
    /// The `End` or `Marker` sentinel.
    Sentinel,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Single code point.
    Char,
    /// Immutable text.
    String,
    /// Immutable byte sequence.
    Raw,
    /// Interned symbol.
    Symbol,
    /// Cons-cell list (a pair chain or `()`).
    List,
    /// Array with the given element type.
    Array(Box<Type>),
    /// Record; `None` accepts any record, `Some` a specific type name.
    Record(Option<String>),
    /// Callable.
    Function,
    /// First-class error value.
    Error,
    /// Wrapped host value.
    Foreign,
    /// Evaluator stack marker.
    StackMark,
    /// Optional type (value or `()`).
    Option(Box<Type>),
    /// Any type (accepts any value).
    Any,
}

impl Type {
    /// Creates an array type with the given element type.
    #[must_use]
    pub fn array(element: Type) -> Self {
        Self::Array(Box::new(element))
    }

    /// Creates a record type bound to a specific type name.
    #[must_use]
    pub fn record(name: impl Into<String>) -> Self {
        Self::Record(Some(name.into()))
    }

    /// Creates an optional type.
    #[must_use]
    pub fn option(inner: Type) -> Self {
        Self::Option(Box::new(inner))
    }

    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns true if this type can be `()`.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Null | Self::Option(_) | Self::Any | Self::List)
    }

    /// Checks if a value type is accepted by this type.
    ///
    /// - `Any` accepts all types
    /// - `Option(T)` accepts `Null` and anything `T` accepts
    /// - `List` accepts `Null` (the empty list)
    /// - an untyped record accepts every record, a named one only its name
    /// - primitive types must match exactly
    #[must_use]
    pub fn accepts(&self, value_type: &Type) -> bool {
        if matches!(self, Self::Any) {
            return true;
        }

        if let Self::Option(inner) = self {
            return matches!(value_type, Self::Null) || inner.accepts(value_type);
        }

        match (self, value_type) {
            (Self::Null, Self::Null)
            | (Self::Sentinel, Self::Sentinel)
            | (Self::Bool, Self::Bool)
            | (Self::Int, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::Char, Self::Char)
            | (Self::String, Self::String)
            | (Self::Raw, Self::Raw)
            | (Self::Symbol, Self::Symbol)
            | (Self::List, Self::List | Self::Null)
            | (Self::Function, Self::Function)
            | (Self::Error, Self::Error)
            | (Self::Foreign, Self::Foreign)
            | (Self::StackMark, Self::StackMark)
            | (Self::Record(None), Self::Record(_)) => true,

            (Self::Record(Some(expected)), Self::Record(Some(actual))) => expected == actual,

            // Runtime arrays report Array(Any); element kinds are not inspected.
            (Self::Array(expected), Self::Array(actual)) => {
                actual.is_any() || expected.accepts(actual)
            }

            _ => false,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Sentinel => write!(f, "sentinel"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Char => write!(f, "char"),
            Self::String => write!(f, "string"),
            Self::Raw => write!(f, "raw"),
            Self::Symbol => write!(f, "symbol"),
            Self::List => write!(f, "list"),
            Self::Array(t) => write!(f, "array<{t:?}>"),
            Self::Record(None) => write!(f, "record"),
            Self::Record(Some(name)) => write!(f, "record<{name}>"),
            Self::Function => write!(f, "fn"),
            Self::Error => write!(f, "error"),
            Self::Foreign => write!(f, "foreign"),
            Self::StackMark => write!(f, "stackmark"),
            Self::Option(t) => write!(f, "option<{t:?}>"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
