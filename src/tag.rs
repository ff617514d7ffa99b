//! The SDL tag tree.
//!
//! A [`Tag`] has a name, an optional namespace, an ordered list of values, a
//! set of attributes (iterated in sorted key order) and an ordered list of
//! child tags.
//!
//! ## Ownership
//!
//! A tag exclusively owns its children: [`Tag::add_child`] takes the child by
//! value and [`Tag::remove_child`] hands it back, so a tag can never have two
//! parents. A tree has no internal locking; share it across threads behind a
//! lock of your own.
//!
//! ## Snapshots
//!
//! [`Tag::values`], [`Tag::attributes`] and [`Tag::children`] return
//! reference-counted snapshots. A snapshot keeps the state it was taken in
//! while the tag continues to be mutated; the tag copies its storage on the
//! first write after a snapshot was handed out.
//!
//! ```rust
//! use sdlang::Tag;
//!
//! let mut tag = Tag::new("numbers").unwrap();
//! tag.add_value(1).unwrap();
//! let before = tag.values();
//! tag.add_value(2).unwrap();
//!
//! assert_eq!(before.len(), 1);
//! assert_eq!(tag.values().len(), 2);
//! ```
//!
//! ## Equality
//!
//! Two tags are equal exactly when their canonical SDL text is equal, so
//! attribute insertion order never matters while value and child order
//! always do.

use crate::coerce::{self, FromValue, IntoValue};
use crate::map::{Attribute, AttributeMap};
use crate::preprocess::Preprocessor;
use crate::source::SourceProvider;
use crate::{Error, Result, Value};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// An immutable, shareable view of a tag's values or children.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Name given to tags written without a name (a bare value list).
pub const ANONYMOUS_TAG_NAME: &str = "content";

/// Name of the container tag returned by [`Tag::root`].
pub const ROOT_TAG_NAME: &str = "root";

/// A node of an SDL document.
///
/// # Examples
///
/// ```rust
/// use sdlang::Tag;
///
/// let mut person = Tag::new("person").unwrap();
/// person.add_value("odv").unwrap();
/// person.set_attribute("age", 50).unwrap();
///
/// assert_eq!(person.to_string(), "person \"odv\" age=50");
/// ```
#[derive(Clone, Debug)]
pub struct Tag {
    namespace: String,
    name: String,
    values: Arc<Vec<Value>>,
    attributes: Arc<AttributeMap>,
    children: Arc<Vec<Tag>>,
}

impl Tag {
    /// Creates an empty tag with no namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if `name` is not a valid identifier.
    pub fn new(name: &str) -> Result<Self> {
        Tag::with_namespace("", name)
    }

    /// Creates an empty tag in `namespace` (`""` for none).
    pub fn with_namespace(namespace: &str, name: &str) -> Result<Self> {
        coerce::validate_namespace(namespace)?;
        coerce::validate_identifier(name)?;
        Ok(Tag::unchecked(namespace, name))
    }

    /// The conventional document container, named `root`.
    #[must_use]
    pub fn root() -> Self {
        Tag::unchecked("", ROOT_TAG_NAME)
    }

    fn unchecked(namespace: &str, name: &str) -> Self {
        Tag {
            namespace: namespace.to_string(),
            name: name.to_string(),
            values: Arc::default(),
            attributes: Arc::default(),
            children: Arc::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = coerce::validate_identifier(name)?.to_string();
        Ok(())
    }

    /// The tag's namespace, or `""` for none.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_namespace(&mut self, namespace: &str) -> Result<()> {
        self.namespace = coerce::validate_namespace(namespace)?.to_string();
        Ok(())
    }

    // Values ////////////////////////////////////////////////////////////////

    /// The primary value: the first entry of the value list.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Sets the primary value.
    ///
    /// Appends when the tag has no values, otherwise replaces the first value
    /// and leaves the rest untouched.
    pub fn set_value<V: IntoValue>(&mut self, value: V) -> Result<()> {
        let value = coerce::coerce(value)?;
        let values = Arc::make_mut(&mut self.values);
        match values.first_mut() {
            Some(first) => *first = value,
            None => values.push(value),
        }
        Ok(())
    }

    /// Converts the primary value to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when the tag has no value or the value
    /// does not convert.
    pub fn value_as<T: FromValue>(&self) -> Result<T> {
        match self.value() {
            Some(value) => value.convert(),
            None => Err(Error::conversion(
                format!("missing value of tag {:?}", self.name),
                std::any::type_name::<T>(),
            )),
        }
    }

    /// Converts the primary value to `T`, returning `default` on any failure.
    #[must_use]
    pub fn value_as_or<T: FromValue>(&self, default: T) -> T {
        self.value_as().unwrap_or(default)
    }

    /// A snapshot of the value list.
    #[must_use]
    pub fn values(&self) -> Snapshot<Value> {
        Arc::clone(&self.values)
    }

    /// Replaces all values. Nothing changes if any value fails coercion.
    pub fn set_values<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: IntoValue,
    {
        let values = values
            .into_iter()
            .map(coerce::coerce)
            .collect::<Result<Vec<_>>>()?;
        self.values = Arc::new(values);
        Ok(())
    }

    pub fn add_value<V: IntoValue>(&mut self, value: V) -> Result<()> {
        let value = coerce::coerce(value)?;
        Arc::make_mut(&mut self.values).push(value);
        Ok(())
    }

    /// Removes the first value equal to `value`. Returns `true` if one was removed.
    pub fn remove_value<V: IntoValue>(&mut self, value: V) -> bool {
        let Ok(value) = coerce::coerce(value) else {
            return false;
        };
        match self.values.iter().position(|v| *v == value) {
            Some(index) => {
                Arc::make_mut(&mut self.values).remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Replaces the value at `index`.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range or the value fails coercion.
    pub fn set_value_at<V: IntoValue>(&mut self, index: usize, value: V) -> Result<()> {
        if index >= self.values.len() {
            return Err(Error::custom(format!(
                "value index {} out of range for tag {:?} with {} values",
                index,
                self.name,
                self.values.len()
            )));
        }
        let value = coerce::coerce(value)?;
        Arc::make_mut(&mut self.values)[index] = value;
        Ok(())
    }

    // Attributes ////////////////////////////////////////////////////////////

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.value(key)
    }

    /// Converts the attribute `key` to `T`, returning `default` when it is
    /// missing or does not convert.
    #[must_use]
    pub fn attribute_as_or<T: FromValue>(&self, key: &str, default: T) -> T {
        match self.attribute(key) {
            Some(value) => value.convert_or(default),
            None => default,
        }
    }

    /// The namespace of attribute `key` (`""` for none).
    #[must_use]
    pub fn attribute_namespace(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(Attribute::namespace)
    }

    /// Sets attribute `key` with no namespace.
    pub fn set_attribute<V: IntoValue>(&mut self, key: &str, value: V) -> Result<()> {
        self.set_attribute_ns("", key, value)
    }

    /// Sets attribute `key` in `namespace` (`""` for none).
    ///
    /// The key, namespace and value are all validated before the tag changes.
    pub fn set_attribute_ns<V: IntoValue>(
        &mut self,
        namespace: &str,
        key: &str,
        value: V,
    ) -> Result<()> {
        coerce::validate_identifier(key)?;
        coerce::validate_namespace(namespace)?;
        let value = coerce::coerce(value)?;
        Arc::make_mut(&mut self.attributes).insert(
            key.to_string(),
            Attribute::new(namespace.to_string(), value),
        );
        Ok(())
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<Value> {
        if !self.attributes.contains_key(key) {
            return None;
        }
        Arc::make_mut(&mut self.attributes)
            .remove(key)
            .map(|attribute| attribute.value().clone())
    }

    /// A snapshot of the attributes, in sorted key order.
    #[must_use]
    pub fn attributes(&self) -> Arc<AttributeMap> {
        Arc::clone(&self.attributes)
    }

    /// Replaces all attributes with `attributes`, none of them namespaced.
    /// Nothing changes if any key or value is rejected.
    pub fn set_attributes<I, K, V>(&mut self, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoValue,
    {
        let mut map = AttributeMap::new();
        for (key, value) in attributes {
            let key = coerce::validate_identifier(key.as_ref())?;
            map.insert(
                key.to_string(),
                Attribute::new(String::new(), coerce::coerce(value)?),
            );
        }
        self.attributes = Arc::new(map);
        Ok(())
    }

    /// Maps every attribute key to its namespace (`""` for none).
    #[must_use]
    pub fn attribute_namespaces(&self) -> BTreeMap<String, String> {
        self.attributes
            .iter()
            .map(|(key, attribute)| (key.clone(), attribute.namespace().to_string()))
            .collect()
    }

    #[must_use]
    pub fn attributes_in_namespace(&self, namespace: &str) -> AttributeMap {
        self.attributes.in_namespace(namespace)
    }

    // Children //////////////////////////////////////////////////////////////

    pub fn add_child(&mut self, child: Tag) {
        Arc::make_mut(&mut self.children).push(child);
    }

    /// Removes and returns the first child equal to `child`.
    pub fn remove_child(&mut self, child: &Tag) -> Option<Tag> {
        let index = self.children.iter().position(|c| c == child)?;
        Some(Arc::make_mut(&mut self.children).remove(index))
    }

    /// A snapshot of the direct children.
    #[must_use]
    pub fn children(&self) -> Snapshot<Tag> {
        Arc::clone(&self.children)
    }

    pub fn set_children(&mut self, children: Vec<Tag>) {
        self.children = Arc::new(children);
    }

    /// Mutable access to the direct children.
    pub fn children_mut(&mut self) -> &mut Vec<Tag> {
        Arc::make_mut(&mut self.children)
    }

    /// All descendants in depth-first pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Tag> {
        let mut found = Vec::new();
        for child in self.children.iter() {
            found.push(child);
            found.extend(child.descendants());
        }
        found
    }

    /// The first direct child named `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Tag> {
        self.children.iter().find(|c| c.name == name)
    }

    /// The first tag named `name` in depth-first pre-order.
    #[must_use]
    pub fn child_recursive(&self, name: &str) -> Option<&Tag> {
        self.children.iter().find_map(|c| {
            if c.name == name {
                Some(c)
            } else {
                c.child_recursive(name)
            }
        })
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Tag> {
        if !self.children.iter().any(|c| c.name == name) {
            return None;
        }
        Arc::make_mut(&mut self.children)
            .iter_mut()
            .find(|c| c.name == name)
    }

    /// Children named `name`, optionally searching all descendants.
    #[must_use]
    pub fn children_named(&self, name: &str, recursive: bool) -> Vec<&Tag> {
        self.collect_children(recursive, &|c| c.name == name)
    }

    /// Children in `namespace`, optionally searching all descendants.
    #[must_use]
    pub fn children_in_namespace(&self, namespace: &str, recursive: bool) -> Vec<&Tag> {
        self.collect_children(recursive, &|c| c.namespace == namespace)
    }

    fn collect_children<'a>(&'a self, recursive: bool, pred: &dyn Fn(&Tag) -> bool) -> Vec<&'a Tag> {
        let mut found = Vec::new();
        for child in self.children.iter() {
            if pred(child) {
                found.push(child);
            }
            if recursive {
                found.extend(child.collect_children(true, pred));
            }
        }
        found
    }

    /// The value lists of the direct children named `name`, one per child.
    #[must_use]
    pub fn children_values(&self, name: &str) -> Vec<Snapshot<Value>> {
        self.children
            .iter()
            .filter(|c| c.name == name)
            .map(Tag::values)
            .collect()
    }

    /// Converts the primary value of child `name` to `T`, returning `default`
    /// when the child is missing, has no value, or does not convert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdlang::Tag;
    ///
    /// let mut root = Tag::root();
    /// root.read_str("size 4").unwrap();
    ///
    /// assert_eq!(root.child_value_as_or("size", 0), 4);
    /// assert_eq!(root.child_value_as_or("size", "x".to_string()), "4");
    /// assert_eq!(root.child_value_as_or("missing", 1), 1);
    /// ```
    #[must_use]
    pub fn child_value_as_or<T: FromValue>(&self, name: &str, default: T) -> T {
        match self.child(name) {
            Some(child) => child.value_as_or(default),
            None => default,
        }
    }

    // Reading ///////////////////////////////////////////////////////////////

    /// Parses `text` and appends the resulting tags as children.
    ///
    /// Nothing is attached if parsing fails.
    pub fn read_str(&mut self, text: &str) -> Result<&mut Self> {
        let tags = crate::de::parse(text)?;
        debug!(count = tags.len(), tag = %self.name, "attaching parsed tags");
        Arc::make_mut(&mut self.children).extend(tags);
        Ok(self)
    }

    /// Fetches source `id` from `provider`, expands its includes, parses it and
    /// appends the resulting tags as children.
    pub fn read_source<S>(&mut self, provider: &S, id: &str) -> Result<&mut Self>
    where
        S: SourceProvider + ?Sized,
    {
        let text = Preprocessor::new(provider).process_source(id)?;
        self.read_str(&text)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.to_sdl_string(true) == other.to_sdl_string(true)
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_sdl_string(true).hash(state);
    }
}

impl serde::Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{SerializeMap, SerializeStruct};

        struct Attributes<'a>(&'a AttributeMap);

        impl serde::Serialize for Attributes<'_> {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (key, attribute) in self.0 {
                    if attribute.namespace().is_empty() {
                        map.serialize_entry(key, attribute.value())?;
                    } else {
                        let key = format!("{}:{}", attribute.namespace(), key);
                        map.serialize_entry(&key, attribute.value())?;
                    }
                }
                map.end()
            }
        }

        let mut state = serializer.serialize_struct("Tag", 5)?;
        state.serialize_field("namespace", &self.namespace)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("values", self.values.as_slice())?;
        state.serialize_field("attributes", &Attributes(&self.attributes))?;
        state.serialize_field("children", self.children.as_slice())?;
        state.end()
    }
}
