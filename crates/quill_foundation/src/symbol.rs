//! Symbols and the interface to the symbol table that numbers them.
//!
//! The symbol table proper belongs to the evaluator. The core only needs a
//! way to turn names into [`Symbol`]s, which [`SymbolTable`] describes.
//! [`Interner`] is a plain in-process implementation for hosts and tests
//! that do not bring their own.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An interned name paired with the id the symbol table assigned to it.
///
/// The id is opaque to the core; it is never recomputed or validated.
#[derive(Clone)]
pub struct Symbol {
    name: Arc<str>,
    number: u32,
}

impl Symbol {
    /// Creates a symbol from a name and a table-assigned id.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, number: u32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }

    /// Returns the symbol's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the id assigned by the symbol table.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && self.name == other.name
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({}#{})", self.name, self.number)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The narrow interface the core needs from a symbol table.
pub trait SymbolTable {
    /// Returns the symbol for `name`, assigning a fresh id on first sight.
    fn intern(&mut self, name: &str) -> Symbol;

    /// Returns the symbol for `name` if it was interned before.
    fn lookup(&self, name: &str) -> Option<Symbol>;

    /// Returns the name behind an id.
    fn name_of(&self, number: u32) -> Option<&str>;
}

/// Simple symbol table: ids are handed out in order of first occurrence.
///
/// Not thread-safe; use external synchronization if needed.
#[derive(Clone, Debug, Default)]
pub struct Interner {
    names: Vec<Arc<str>>,
    ids: HashMap<Arc<str>, u32>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of interned symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SymbolTable for Interner {
    /// # Panics
    ///
    /// Panics if the number of interned symbols exceeds `u32::MAX`.
    fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&number) = self.ids.get(name) {
            return Symbol::new(self.names[number as usize].clone(), number);
        }

        let number = u32::try_from(self.names.len()).expect("too many interned symbols");
        let arc: Arc<str> = name.into();
        self.names.push(arc.clone());
        self.ids.insert(arc.clone(), number);
        Symbol::new(arc, number)
    }

    fn lookup(&self, name: &str) -> Option<Symbol> {
        let &number = self.ids.get(name)?;
        Some(Symbol::new(self.names[number as usize].clone(), number))
    }

    fn name_of(&self, number: u32) -> Option<&str> {
        self.names.get(number as usize).map(AsRef::as_ref)
    }
}
