//! Sorted attribute map for SDL tags.
//!
//! This module provides [`AttributeMap`], a wrapper around [`IndexMap`] that
//! keeps its entries in lexicographic key order no matter the order they were
//! inserted in. Canonical serialization walks the map front to back, so two
//! tags holding the same attributes always render, and therefore compare,
//! the same.
//!
//! Each entry is an [`Attribute`]: the value plus the attribute's namespace
//! (empty when the attribute has none).
//!
//! ## Examples
//!
//! ```rust
//! use sdlang::Tag;
//!
//! let mut tag = Tag::new("person").unwrap();
//! tag.set_attribute("name", "odv").unwrap();
//! tag.set_attribute("age", 50).unwrap();
//!
//! let attributes = tag.attributes();
//! let keys: Vec<_> = attributes.keys().cloned().collect();
//! assert_eq!(keys, vec!["age", "name"]);
//! ```

use crate::Value;
use indexmap::IndexMap;

/// A single attribute: its namespace and value.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    namespace: String,
    value: Value,
}

impl Attribute {
    pub(crate) fn new(namespace: String, value: Value) -> Self {
        Attribute { namespace, value }
    }

    /// The attribute's namespace, or `""` for none.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Attributes of a tag, iterated in sorted key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeMap(IndexMap<String, Attribute>);

impl AttributeMap {
    #[must_use]
    pub fn new() -> Self {
        AttributeMap(IndexMap::new())
    }

    /// Inserts or replaces an attribute, keeping the keys sorted.
    ///
    /// Replacing an existing key keeps its position; a new key is placed at
    /// its sorted position.
    pub(crate) fn insert(&mut self, key: String, attribute: Attribute) -> Option<Attribute> {
        if let Some(existing) = self.0.get_mut(&key) {
            return Some(std::mem::replace(existing, attribute));
        }
        self.0.insert(key, attribute);
        self.0.sort_keys();
        None
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Attribute> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.0.get(key)
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.get(key).map(Attribute::value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in sorted order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Attribute> {
        self.0.keys()
    }

    /// Returns an iterator over `(key, attribute)` pairs, in sorted key order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Attribute> {
        self.0.iter()
    }

    /// Returns the attributes whose namespace equals `namespace`.
    #[must_use]
    pub fn in_namespace(&self, namespace: &str) -> AttributeMap {
        AttributeMap(
            self.0
                .iter()
                .filter(|(_, attribute)| attribute.namespace == namespace)
                .map(|(key, attribute)| (key.clone(), attribute.clone()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a String, &'a Attribute);
    type IntoIter = indexmap::map::Iter<'a, String, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(value: &str) -> Attribute {
        Attribute::new(String::new(), Value::from(value))
    }

    #[test]
    fn test_keys_stay_sorted() {
        let mut map = AttributeMap::new();
        map.insert("john".to_string(), attr("doe"));
        map.insert("foo".to_string(), attr("bar"));
        map.insert("mid".to_string(), attr("x"));

        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["foo", "john", "mid"]);
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut map = AttributeMap::new();
        assert!(map.insert("k".to_string(), attr("1")).is_none());
        let previous = map.insert("k".to_string(), attr("2"));
        assert_eq!(previous, Some(attr("1")));
        assert_eq!(map.len(), 1);
        assert_eq!(map.value("k"), Some(&Value::from("2")));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map = AttributeMap::new();
        for key in ["c", "a", "b"] {
            map.insert(key.to_string(), attr(key));
        }
        assert!(map.remove("b").is_some());
        assert!(map.remove("b").is_none());
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_in_namespace() {
        let mut map = AttributeMap::new();
        map.insert("a".to_string(), Attribute::new("ns".into(), Value::from(1)));
        map.insert("b".to_string(), attr("x"));
        let scoped = map.in_namespace("ns");
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped.get("a").map(Attribute::namespace), Some("ns"));
        assert_eq!(map.in_namespace("").len(), 1);
    }
}
