//! Records: anonymous hash maps and named, optionally struct-bound records.
//!
//! Entries live in buckets keyed by a hash of the key; collisions are
//! resolved by a linear scan with key equality. A separate key-order list
//! remembers first insertion, and is the only iteration order with defined
//! semantics. Bucket order is whatever the bucket map yields and may change
//! between runs.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::binding::StructBinding;
use crate::config::RecordConfig;
use crate::error::{Error, Result};
use crate::sexp::Sexp;
use crate::value::Value;

/// Type name of anonymous maps.
pub const ANONYMOUS_TYPE: &str = "hash";

/// A key-ordered map of values.
#[derive(Clone)]
pub struct Record {
    type_name: Arc<str>,
    buckets: HashMap<u64, Vec<(Value, Value)>>,
    key_order: Vec<Value>,
    len: usize,
    binding: Option<Arc<StructBinding>>,
}

/// Bucket index of a key.
#[must_use]
pub fn key_hash(key: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

impl Record {
    /// Creates a record of the given type. `"hash"` makes an anonymous map.
    #[must_use]
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        Self::with_config(type_name, &RecordConfig::default())
    }

    /// Creates a record pre-sized for the expected number of keys.
    #[must_use]
    pub fn with_config(type_name: impl Into<Arc<str>>, config: &RecordConfig) -> Self {
        Self {
            type_name: type_name.into(),
            buckets: HashMap::with_capacity(config.initial_capacity),
            key_order: Vec::with_capacity(config.initial_capacity),
            len: 0,
            binding: None,
        }
    }

    /// Creates an empty anonymous map.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_TYPE)
    }

    /// Creates an empty named record.
    #[must_use]
    pub fn named(type_name: impl Into<Arc<str>>) -> Self {
        Self::new(type_name)
    }

    /// Returns the record's type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns true for anonymous maps.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        &*self.type_name == ANONYMOUS_TYPE
    }

    /// Number of live entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the record has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Keys in first-insertion order.
    #[must_use]
    pub fn keys(&self) -> &[Value] {
        &self.key_order
    }

    /// Struct-binding metadata, if attached.
    #[must_use]
    pub fn binding(&self) -> Option<&Arc<StructBinding>> {
        self.binding.as_ref()
    }

    /// Inserts or replaces the value under `key`.
    ///
    /// A replaced key keeps its original position in key order. Returns the
    /// previous value, if any.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let bucket = self.buckets.entry(key_hash(&key)).or_default();
        if let Some(slot) = bucket.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        bucket.push((key.clone(), value));
        self.key_order.push(key);
        self.len += 1;
        None
    }

    /// Looks up the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyNotFound`](crate::ErrorKind::KeyNotFound) error if the
    /// key is absent.
    pub fn get(&self, key: &Value) -> Result<&Value> {
        self.lookup(key)
            .ok_or_else(|| Error::key_not_found(key.sexp_string()))
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.lookup(key).is_some()
    }

    /// Removes `key`, returning its value.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyNotFound`](crate::ErrorKind::KeyNotFound) error if the
    /// key is absent.
    pub fn remove(&mut self, key: &Value) -> Result<Value> {
        let hash = key_hash(key);
        let not_found = || Error::key_not_found(key.sexp_string());
        let bucket = self.buckets.get_mut(&hash).ok_or_else(not_found)?;
        let index = bucket
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(not_found)?;
        let (_, value) = bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(&hash);
        }
        self.key_order.retain(|k| k != key);
        self.len -= 1;
        Ok(value)
    }

    /// Iterates entries in key order. Calling it again restarts the walk.
    #[must_use]
    pub fn iter(&self) -> OrderedIter<'_> {
        OrderedIter {
            record: self,
            keys: self.key_order.iter(),
        }
    }

    /// Iterates entries bucket by bucket.
    ///
    /// The order is unspecified and can differ between runs; use
    /// [`Record::iter`] when order matters.
    pub fn iter_buckets(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    /// Attaches struct-binding metadata.
    ///
    /// # Errors
    ///
    /// Fails with [`AnonymousBinding`](crate::ErrorKind::AnonymousBinding)
    /// when called on an anonymous map.
    pub fn bind_factory(&mut self, binding: Arc<StructBinding>) -> Result<()> {
        if self.is_anonymous() {
            tracing::warn!(
                type_name = binding.type_name(),
                "refusing to bind struct factory to an anonymous hash"
            );
            return Err(Error::anonymous_binding());
        }
        tracing::debug!(
            record = self.type_name(),
            native = binding.type_name(),
            fields = binding.fields().len(),
            "bound struct factory"
        );
        self.binding = Some(binding);
        Ok(())
    }

    fn lookup(&self, key: &Value) -> Option<&Value> {
        self.buckets
            .get(&key_hash(key))?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.len == other.len
            && self
                .iter_buckets()
                .all(|(k, v)| other.lookup(k).is_some_and(|w| w == v))
    }
}

impl Eq for Record {}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("type_name", &self.type_name)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .field("bound", &self.binding.is_some())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a Value, &'a Value);
    type IntoIter = OrderedIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a record's entries in key order.
#[derive(Clone)]
pub struct OrderedIter<'a> {
    record: &'a Record,
    keys: std::slice::Iter<'a, Value>,
}

impl<'a> Iterator for OrderedIter<'a> {
    type Item = (&'a Value, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        match self.record.lookup(key) {
            Some(value) => Some((key, value)),
            None => unreachable!("key {} listed in key order but missing", key.sexp_string()),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl ExactSizeIterator for OrderedIter<'_> {}
