//! Arrays: ordered sequences of values.
//!
//! A thin wrapper around `im::Vector` so clones share structure.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use crate::value::{Value, dismantle};

/// Ordered sequence of values.
///
/// Cloning is O(1). Equality and hashing are element-wise.
#[derive(Clone, Default)]
pub struct Array(im::Vector<Value>);

impl Array {
    /// Creates an empty array.
    #[must_use]
    pub fn new() -> Self {
        Self(im::Vector::new())
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets an element by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Appends an element.
    pub fn push(&mut self, value: Value) {
        self.0.push_back(value);
    }

    /// Replaces the element at `index`, returning the old one.
    ///
    /// Returns `None` and leaves the array untouched if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: Value) -> Option<Value> {
        if index >= self.len() {
            return None;
        }
        Some(self.0.set(index, value))
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> im::vector::Iter<'_, Value> {
        self.0.iter()
    }

    /// Empties the array, handing back its elements.
    pub(crate) fn take_items(&mut self) -> im::Vector<Value> {
        std::mem::take(&mut self.0)
    }
}

// Nested containers are handed to a worklist instead of dropping recursively.
impl Drop for Array {
    fn drop(&mut self) {
        if self.0.iter().any(Value::nests) {
            dismantle(self.take_items().into_iter().collect());
        }
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Array {}

impl Hash for Array {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(im::Vector::from_iter(iter))
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        items.into_iter().collect()
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = im::vector::ConsumingIter<Value>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.take_items().into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = im::vector::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
