//! Error types for the Quill value core.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// The main error type for Quill operations.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a free-form error carrying only a message.
    ///
    /// This is the usual payload of a first-class [`Value::Error`](crate::Value::Error).
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message(message.into()))
    }

    /// Creates a key lookup failure. `key` is the canonical form of the key.
    #[must_use]
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyNotFound(key.into()))
    }

    /// Creates an error for binding metadata attached to an anonymous map.
    #[must_use]
    pub fn anonymous_binding() -> Self {
        Self::new(ErrorKind::AnonymousBinding)
    }

    /// Creates an error for a record key with no matching native field.
    #[must_use]
    pub fn unknown_tag(type_name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownTag {
            type_name: type_name.into(),
            tag: tag.into(),
        })
    }

    /// Creates an error for a record key that cannot name a field.
    #[must_use]
    pub fn invalid_tag(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTag(key.into()))
    }

    /// Creates an error for a type name missing from the factory registry.
    #[must_use]
    pub fn unknown_struct_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownStructType(name.into()))
    }

    /// Creates an error for a type name registered twice.
    #[must_use]
    pub fn duplicate_struct_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateStructType(name.into()))
    }

    /// Creates an error for an embed path step that does not resolve.
    #[must_use]
    pub fn embed_path(path: impl Into<String>, step: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmbedPath {
            path: path.into(),
            step: step.into(),
        })
    }

    /// Creates an error for a field ordinal rejected by a native struct.
    #[must_use]
    pub fn field_access(type_name: impl Into<String>, ordinal: usize) -> Self {
        Self::new(ErrorKind::FieldAccess {
            type_name: type_name.into(),
            ordinal,
        })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an error for a list walk that hit a dotted tail.
    #[must_use]
    pub fn improper_list() -> Self {
        Self::new(ErrorKind::ImproperList)
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(expected: String, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch { expected, actual })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this is a key lookup failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::KeyNotFound(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A requested key is absent from a record.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Struct-binding metadata cannot be attached to an anonymous map.
    #[error("cannot bind a struct factory to an anonymous hash")]
    AnonymousBinding,

    /// A record key has no matching field on the native struct.
    #[error("no field tagged {tag} on struct {type_name}")]
    UnknownTag {
        /// The record's type name.
        type_name: String,
        /// The tag that was not found.
        tag: String,
    },

    /// A record key is neither a string nor a symbol.
    #[error("record key {0} cannot name a struct field")]
    InvalidTag(String),

    /// No factory is registered for a type name.
    #[error("no struct factory registered for {0}")]
    UnknownStructType(String),

    /// A factory was registered twice under the same name.
    #[error("struct factory already registered for {0}")]
    DuplicateStructType(String),

    /// An embed path step did not lead to an embedded struct.
    #[error("embed path {path} broken at {step}")]
    EmbedPath {
        /// The full embed path, rendered.
        path: String,
        /// The step that failed to resolve.
        step: String,
    },

    /// A native struct rejected a field ordinal.
    #[error("struct {type_name} has no accessible field #{ordinal}")]
    FieldAccess {
        /// The native type name.
        type_name: String,
        /// The field ordinal that was rejected.
        ordinal: usize,
    },

    /// Value kind does not fit the declared field type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// A list walk reached a tail that is neither a pair nor `()`.
    #[error("improper list")]
    ImproperList,

    /// Wrong number of arguments to a function.
    #[error("arity mismatch: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Description of expected arity.
        expected: String,
        /// Actual number of arguments.
        actual: usize,
    },

    /// Free-form failure message.
    #[error("{0}")]
    Message(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or function name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Stack of function names, innermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias for Quill operations.
pub type Result<T> = std::result::Result<T, Error>;
