//! Core value type for all Quill data.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::array::Array;
use crate::error::Error;
use crate::function::Function;
use crate::host::Foreign;
use crate::pair::Pair;
use crate::record::{Record, key_hash};
use crate::symbol::Symbol;
use crate::types::Type;

/// Control values used by the reader and evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// The empty list, `()`. The only falsy sentinel.
    Null,
    /// End of input.
    End,
    /// Generic marker.
    Marker,
}

/// Core value type for all Quill data.
///
/// Values are cheaply cloneable: composite variants share their payload
/// behind an `Arc` or a persistent vector.
#[derive(Clone)]
pub enum Value {
    /// One of the three control sentinels.
    Sentinel(Sentinel),
    /// 64-bit signed integer.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// 64-bit floating point.
    Float(f64),
    /// A single code point.
    Char(char),
    /// Immutable text.
    String(Arc<str>),
    /// Immutable byte sequence.
    Raw(Arc<[u8]>),
    /// Cons cell.
    Pair(Arc<Pair>),
    /// Ordered sequence of values.
    Array(Array),
    /// Anonymous map or named record.
    Record(Arc<Record>),
    /// Interned symbol.
    Symbol(Symbol),
    /// Callable.
    Function(Function),
    /// Failure carried as a value.
    Error(Arc<Error>),
    /// Opaque host value.
    Foreign(Foreign),
    /// Evaluator stack marker tagged with a symbol.
    StackMark(Symbol),
}

impl Value {
    /// The empty list.
    pub const NULL: Value = Value::Sentinel(Sentinel::Null);
    /// End-of-input sentinel.
    pub const END: Value = Value::Sentinel(Sentinel::End);
    /// Marker sentinel.
    pub const MARKER: Value = Value::Sentinel(Sentinel::Marker);

    /// Returns the type of this value.
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::Sentinel(Sentinel::Null) => Type::Null,
            Self::Sentinel(_) => Type::Sentinel,
            Self::Int(_) => Type::Int,
            Self::Bool(_) => Type::Bool,
            Self::Float(_) => Type::Float,
            Self::Char(_) => Type::Char,
            Self::String(_) => Type::String,
            Self::Raw(_) => Type::Raw,
            Self::Pair(_) => Type::List,
            Self::Array(_) => Type::array(Type::Any),
            Self::Record(r) if r.is_anonymous() => Type::Record(None),
            Self::Record(r) => Type::record(r.type_name()),
            Self::Symbol(_) => Type::Symbol,
            Self::Function(_) => Type::Function,
            Self::Error(_) => Type::Error,
            Self::Foreign(_) => Type::Foreign,
            Self::StackMark(_) => Type::StackMark,
        }
    }

    /// Short name of the variant, for messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Sentinel(_) => "sentinel",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Raw(_) => "raw",
            Self::Pair(_) => "pair",
            Self::Array(_) => "array",
            Self::Record(_) => "record",
            Self::Symbol(_) => "symbol",
            Self::Function(_) => "function",
            Self::Error(_) => "error",
            Self::Foreign(_) => "foreign",
            Self::StackMark(_) => "stackmark",
        }
    }

    /// Returns true for pairs and arrays, the containers that can nest deeply.
    pub(crate) const fn nests(&self) -> bool {
        matches!(self, Self::Pair(_) | Self::Array(_))
    }

    /// Returns true if this value is the `()` sentinel.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Sentinel(Sentinel::Null))
    }

    /// Returns true if this value is truthy.
    ///
    /// Booleans are their own truth. Integers and characters are falsy only
    /// at zero. Sentinels are truthy except `()`. Everything else is truthy,
    /// however empty: `0.0`, `""`, `[]` and `{}` all count as true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Char(c) => *c != '\0',
            Self::Sentinel(s) => *s != Sentinel::Null,
            _ => true,
        }
    }

    /// Wraps a failure as a first-class value.
    #[must_use]
    pub fn error(err: Error) -> Self {
        Self::Error(Arc::new(err))
    }

    /// Wraps a record.
    #[must_use]
    pub fn record(record: Record) -> Self {
        Self::Record(Arc::new(record))
    }

    /// Wraps raw bytes.
    #[must_use]
    pub fn raw(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Raw(bytes.into())
    }

    /// Builds a stack mark for a symbol.
    #[must_use]
    pub fn stack_mark(sym: Symbol) -> Self {
        Self::StackMark(sym)
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a character.
    #[must_use]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to extract a pair.
    #[must_use]
    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Self::Pair(p) => Some(p),
            _ => None,
        }
    }

    /// Attempts to extract an array.
    #[must_use]
    pub const fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Attempts to extract a record.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Mutable access to a record, cloning it first if it is shared.
    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Record(r) => Some(Arc::make_mut(r)),
            _ => None,
        }
    }

    /// Attempts to extract a symbol.
    #[must_use]
    pub const fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a function.
    #[must_use]
    pub const fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Attempts to extract a wrapped error.
    #[must_use]
    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Drops values on a worklist, unlinking uniquely owned pairs and arrays so
/// that no nesting depth reaches the call stack.
pub(crate) fn dismantle(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Pair(pair) => {
                if let Ok(mut pair) = Arc::try_unwrap(pair) {
                    let head = std::mem::replace(&mut pair.head, Value::NULL);
                    let tail = std::mem::replace(&mut pair.tail, Value::NULL);
                    pending.extend([head, tail].into_iter().filter(Value::nests));
                }
            }
            Value::Array(mut arr) => {
                pending.extend(arr.take_items().into_iter().filter(Value::nests));
            }
            _ => {}
        }
    }
}

// Floats compare by bit pattern so Eq stays reflexive and agrees with Hash.
// Functions and foreign values compare by identity, records by content.
// Pairs and arrays are compared on a worklist.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            let same = match (a, b) {
                (Self::Pair(x), Self::Pair(y)) => {
                    if !Arc::ptr_eq(x, y) {
                        pending.push((&x.tail, &y.tail));
                        pending.push((&x.head, &y.head));
                    }
                    true
                }
                (Self::Array(x), Self::Array(y)) => {
                    pending.extend(x.iter().zip(y.iter()));
                    x.len() == y.len()
                }
                _ => a.shallow_eq(b),
            };
            if !same {
                return false;
            }
        }
        true
    }
}

impl Value {
    fn shallow_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sentinel(a), Self::Sentinel(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Symbol(a), Self::Symbol(b)) | (Self::StackMark(a), Self::StackMark(b)) => {
                a == b
            }
            (Self::Function(a), Self::Function(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => Arc::ptr_eq(a, b) || a.kind == b.kind,
            (Self::Foreign(a), Self::Foreign(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pending = vec![self];
        while let Some(value) = pending.pop() {
            std::mem::discriminant(value).hash(state);
            match value {
                Self::Sentinel(s) => s.hash(state),
                Self::Int(n) => n.hash(state),
                Self::Bool(b) => b.hash(state),
                Self::Float(n) => n.to_bits().hash(state),
                Self::Char(c) => c.hash(state),
                Self::String(s) => s.hash(state),
                Self::Raw(b) => b.hash(state),
                Self::Pair(p) => {
                    pending.push(&p.tail);
                    pending.push(&p.head);
                }
                Self::Array(a) => {
                    a.len().hash(state);
                    pending.extend(a.iter().rev());
                }
                Self::Record(r) => {
                    r.type_name().hash(state);
                    r.len().hash(state);
                    entries_hash(r).hash(state);
                }
                Self::Symbol(s) | Self::StackMark(s) => s.hash(state),
                Self::Function(f) => f.hash(state),
                Self::Error(e) => e.to_string().hash(state),
                Self::Foreign(f) => f.addr().hash(state),
            }
        }
    }
}

// Content equality ignores key order, so entry hashes are summed.
fn entries_hash(record: &Record) -> u64 {
    record.iter_buckets().fold(0u64, |sum, (key, value)| {
        sum.wrapping_add(key_hash(key).rotate_left(17) ^ key_hash(value))
    })
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(func) => write!(f, "{func:?}"),
            Self::Foreign(foreign) => write!(f, "Foreign({foreign:?})"),
            other => fmt::Display::fmt(other, f),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<Array> for Value {
    fn from(arr: Array) -> Self {
        Self::Array(arr)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::record(record)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Self::Function(func)
    }
}

impl From<Error> for Value {
    fn from(err: Error) -> Self {
        Self::error(err)
    }
}

impl From<Foreign> for Value {
    fn from(foreign: Foreign) -> Self {
        Self::Foreign(foreign)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}
