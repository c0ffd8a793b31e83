//! Purpose: Insertion-ordered string-keyed container for JSON objects.
//! Exports: `Object`.
//! Role: Object variant of `Value`; lookups by key, iteration in source order.
//! Invariants: Keys are unique; re-inserting a key replaces the value in place
//! (last write wins, first position kept).
use indexmap::IndexMap;
use indexmap::map::{Iter, Keys};

use crate::core::error::{Error, ErrorKind};
use crate::core::value::Value;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    entries: IndexMap<String, Value>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Result<&Value, Error> {
        self.entries.get(key).ok_or_else(|| {
            Error::new(ErrorKind::KeyNotFound)
                .with_message(format!("key {key:?} not found"))
                .with_key(key)
        })
    }

    pub fn try_get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.entries.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.insert(key.into(), value);
        }
        object
    }
}
