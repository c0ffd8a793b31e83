//! Purpose: Ordered element container for JSON arrays.
//! Exports: `Array`.
//! Role: Array variant of `Value`; positional lookups and iteration.
//! Invariants: Element index equals position in the source text.
//! Invariants: Out-of-range `get` fails `IndexOutOfRange` naming index and length.
use std::slice::Iter;

use crate::core::error::{Error, ErrorKind};
use crate::core::value::Value;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn get(&self, index: usize) -> Result<&Value, Error> {
        self.items.get(index).ok_or_else(|| {
            Error::new(ErrorKind::IndexOutOfRange)
                .with_message(format!(
                    "index {index} out of range for array of length {}",
                    self.items.len()
                ))
                .with_index(index)
        })
    }

    pub fn try_get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
