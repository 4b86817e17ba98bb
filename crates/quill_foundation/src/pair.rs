//! Cons cells and the lists built from them.
//!
//! A pair's tail is another pair (the list continues), the `()` sentinel
//! (proper list), or any other value (dotted tail). Construction never
//! checks which; printing and list walks handle each case.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::{Value, dismantle};

/// A cons cell.
#[derive(Clone)]
pub struct Pair {
    /// First element.
    pub head: Value,
    /// Rest of the list, `()`, or a dotted tail.
    pub tail: Value,
}

/// Builds a pair value from a head and a tail.
#[must_use]
pub fn cons(head: Value, tail: Value) -> Value {
    Value::Pair(Arc::new(Pair { head, tail }))
}

impl Pair {
    /// Iterates over the heads of the pair chain starting here.
    #[must_use]
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            head: Some(&self.head),
            rest: &self.tail,
        }
    }

    /// Returns the tail that ends the chain: `()` for a proper list.
    #[must_use]
    pub fn terminal_tail(&self) -> &Value {
        let mut tail = &self.tail;
        while let Value::Pair(next) = tail {
            tail = &next.tail;
        }
        tail
    }

    /// Returns true if the chain ends in `()`.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.terminal_tail().is_null()
    }
}

// Hands nested pairs and arrays to a worklist instead of recursing through
// Arc drops, along the tail chain and down through heads alike.
impl Drop for Pair {
    fn drop(&mut self) {
        if self.head.nests() || self.tail.nests() {
            let head = std::mem::replace(&mut self.head, Value::NULL);
            let tail = std::mem::replace(&mut self.tail, Value::NULL);
            dismantle(vec![head, tail]);
        }
    }
}

/// Iterator over the heads of a pair chain.
///
/// Stops at the first tail that is not a pair, whether `()` or dotted.
#[derive(Clone)]
pub struct ListIter<'a> {
    head: Option<&'a Value>,
    rest: &'a Value,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.head.take()?;
        if let Value::Pair(next) = self.rest {
            self.head = Some(&next.head);
            self.rest = &next.tail;
        }
        Some(head)
    }
}

impl<'a> IntoIterator for &'a Pair {
    type Item = &'a Value;
    type IntoIter = ListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Value {
    /// Builds a proper list from the given items, terminated by `()`.
    pub fn list<I>(items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Value::NULL, |tail, head| cons(head, tail))
    }

    /// Returns true for `()` and for pair chains that end in `()`.
    #[must_use]
    pub fn is_proper_list(&self) -> bool {
        match self {
            Value::Pair(pair) => pair.is_proper(),
            other => other.is_null(),
        }
    }

    /// Collects the elements of a proper list.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ImproperList`](crate::ErrorKind::ImproperList)
    /// if the chain ends in anything but `()`, or if `self` is neither a
    /// pair nor `()`.
    pub fn list_to_vec(&self) -> Result<Vec<Value>> {
        match self {
            Value::Pair(pair) if pair.is_proper() => Ok(pair.iter().cloned().collect()),
            other if other.is_null() => Ok(Vec::new()),
            _ => Err(Error::improper_list()),
        }
    }

    /// Number of pairs in the chain; zero for anything that is not a pair.
    #[must_use]
    pub fn list_len(&self) -> usize {
        match self {
            Value::Pair(pair) => pair.iter().count(),
            _ => 0,
        }
    }
}
