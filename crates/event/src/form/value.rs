//! Nested form value containers.
//!
//! Form field names may encode nested structure through bracket notation
//! (`a[b][c][]`), so a decoded form is a tree rather than a flat map. This
//! module provides the tagged union used for those trees: a value is either a
//! leaf, an ordered list, or a keyed map. The container is generic over the
//! leaf type so the uploaded-files tree and the text-fields tree share one
//! implementation.

use std::slice;

/// A node in a decoded form tree.
///
/// Leaves hold the payload type `T` (part text for fields, file handles for
/// uploads). Lists are produced by append-marker segments (`[]`), maps by
/// named segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue<T> {
    /// A scalar value.
    Leaf(T),
    /// An ordered sequence, extended by `[]` key segments.
    List(Vec<FormValue<T>>),
    /// A keyed mapping with unique keys.
    Map(FormMap<T>),
}

impl<T> FormValue<T> {
    /// Returns the leaf payload if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            FormValue::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Returns the sequence entries if this node is a list.
    pub fn as_list(&self) -> Option<&[FormValue<T>]> {
        match self {
            FormValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the mapping if this node is a map.
    pub fn as_map(&self) -> Option<&FormMap<T>> {
        match self {
            FormValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// A keyed mapping of form values.
///
/// Keys are unique; insertion order is preserved for iteration. Lookup is a
/// linear scan, which is appropriate for the handful of fields a form
/// submission carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMap<T> {
    entries: Vec<(String, FormValue<T>)>,
}

impl<T> FormMap<T> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Returns the number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a top-level entry by key.
    pub fn get(&self, key: &str) -> Option<&FormValue<T>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.entries.iter() }
    }

    /// Stores `value` under `key`, fully replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: FormValue<T>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns a mutable slot for `key`, creating an empty map entry when the
    /// key is absent.
    pub(crate) fn slot(&mut self, key: &str) -> &mut FormValue<T> {
        let index = match self.entries.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key.to_owned(), FormValue::Map(FormMap::new())));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

impl<T> Default for FormMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over map entries in insertion order.
#[derive(Debug)]
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, (String, FormValue<T>)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a str, &'a FormValue<T>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a, T> IntoIterator for &'a FormMap<T> {
    type Item = (&'a str, &'a FormValue<T>);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
