//! Callable descriptors.
//!
//! A function is either an interpreted closure (run by the evaluator) or a
//! native Rust callable. Both carry a display name.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::host::ScopeHandle;
use crate::value::Value;

/// Calling convention for native functions: evaluated arguments in, a value
/// or an error out.
pub type NativeFnInner = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A callable value.
#[derive(Clone)]
pub enum Function {
    /// Closure defined in the language; its body belongs to the evaluator.
    Interpreted(Arc<Closure>),
    /// Function implemented in Rust.
    Native(Arc<NativeFn>),
}

/// An interpreted closure.
pub struct Closure {
    /// Name used when printing.
    pub name: Arc<str>,
    /// Number of declared parameters (the required ones, if variadic).
    pub arity: usize,
    /// Whether extra arguments are collected into a rest parameter.
    pub variadic: bool,
    /// Scope the closure was defined in.
    pub scope: ScopeHandle,
    /// Defining expression, kept only for printing.
    pub original: Option<Value>,
}

/// A native function.
pub struct NativeFn {
    /// Name used when printing.
    pub name: Arc<str>,
    /// The callable.
    pub func: Box<NativeFnInner>,
}

impl Function {
    /// Creates an interpreted closure.
    #[must_use]
    pub fn interpreted(
        name: impl Into<Arc<str>>,
        arity: usize,
        variadic: bool,
        scope: ScopeHandle,
        original: Option<Value>,
    ) -> Self {
        Self::Interpreted(Arc::new(Closure {
            name: name.into(),
            arity,
            variadic,
            scope,
            original,
        }))
    }

    /// Wraps a Rust callable.
    pub fn native(
        name: impl Into<Arc<str>>,
        func: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::Native(Arc::new(NativeFn {
            name: name.into(),
            func: Box::new(func),
        }))
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Interpreted(c) => &c.name,
            Self::Native(n) => &n.name,
        }
    }

    /// Declared arity of a closure; `None` for native functions, which check
    /// their own arguments.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Interpreted(c) => Some(c.arity),
            Self::Native(_) => None,
        }
    }

    /// Returns true for closures with a rest parameter.
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        matches!(self, Self::Interpreted(c) if c.variadic)
    }

    /// Captured scope of a closure.
    #[must_use]
    pub fn scope(&self) -> Option<&ScopeHandle> {
        match self {
            Self::Interpreted(c) => Some(&c.scope),
            Self::Native(_) => None,
        }
    }

    /// The expression a closure was defined by, if kept.
    #[must_use]
    pub fn original(&self) -> Option<&Value> {
        match self {
            Self::Interpreted(c) => c.original.as_ref(),
            Self::Native(_) => None,
        }
    }

    /// Calls a native function with already evaluated arguments.
    ///
    /// # Errors
    ///
    /// Propagates the native function's error. Interpreted closures can only
    /// be run by the evaluator and yield an internal error here.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match self {
            Self::Native(n) => (n.func)(args),
            Self::Interpreted(c) => Err(Error::internal(format!(
                "closure {} must be applied by the evaluator",
                c.name
            ))),
        }
    }

    /// Returns true if both values refer to the same callable.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Interpreted(a), Self::Interpreted(b)) => Arc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn addr(&self) -> usize {
        match self {
            Self::Interpreted(c) => Arc::as_ptr(c) as usize,
            Self::Native(n) => Arc::as_ptr(n) as usize,
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Function {}

impl Hash for Function {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interpreted(c) => write!(
                f,
                "<fn {} arity={}{}>",
                c.name,
                c.arity,
                if c.variadic { "+" } else { "" }
            ),
            Self::Native(n) => write!(f, "<native fn {}>", n.name),
        }
    }
}
