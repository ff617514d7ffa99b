//! SDL and XML serialization of tag trees.
//!
//! This module provides the two writers behind [`Tag::to_sdl_string`] and
//! [`Tag::to_xml_string`].
//!
//! ## Canonical SDL
//!
//! The SDL writer produces the canonical text that tag equality is defined
//! on:
//!
//! - `[namespace:]name`, then the values in order, then the attributes in
//!   sorted key order as `[ns:]key=value`
//! - children inside ` {` ... `}`, one per line, indented by four spaces per
//!   level, every line inside the block terminated by `\r\n`
//! - an anonymous `content` tag with values is written as its bare values
//!
//! Reading the output back with [`crate::parse`] yields an equal tree.
//!
//! ```rust
//! use sdlang::Tag;
//!
//! let mut root = Tag::root();
//! root.read_str("person \"odv\" age=50 {\n  pet \"rex\"\n}").unwrap();
//!
//! assert_eq!(
//!     root.to_sdl_string(false),
//!     "person \"odv\" age=50 {\r\n    pet \"rex\"\r\n}"
//! );
//! ```
//!
//! ## XML
//!
//! Values become `_val0`, `_val1`, ... attributes and childless tags close
//! themselves:
//!
//! ```rust
//! use sdlang::Tag;
//!
//! let mut tag = Tag::new("point").unwrap();
//! tag.set_values([1, 2]).unwrap();
//! tag.set_attribute("label", "a<b").unwrap();
//!
//! assert_eq!(
//!     tag.to_xml_string(),
//!     "<point _val0=\"1\" _val1=\"2\" label=\"a&lt;b\"/>"
//! );
//! ```

use crate::tag::ANONYMOUS_TAG_NAME;
use crate::{Result, Tag, Value};
use std::fmt;
use std::io;

const NEWLINE: &str = "\r\n";
const INDENT: &str = "    ";

/// Writes tags as canonical SDL text.
pub struct Serializer {
    output: String,
    indent_level: usize,
}

impl Serializer {
    #[must_use]
    pub fn new() -> Self {
        Serializer {
            output: String::with_capacity(256),
            indent_level: 0,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(INDENT);
        }
    }

    /// Appends `tag` and its subtree, starting at the current indentation.
    pub fn write_tag(&mut self, tag: &Tag) {
        self.write_indent();

        let bare = tag.namespace().is_empty()
            && tag.name() == ANONYMOUS_TAG_NAME
            && !tag.values().is_empty();
        if !bare {
            if !tag.namespace().is_empty() {
                self.output.push_str(tag.namespace());
                self.output.push(':');
            }
            self.output.push_str(tag.name());
        }

        let values = tag.values();
        for (i, value) in values.iter().enumerate() {
            if i > 0 || !bare {
                self.output.push(' ');
            }
            match value {
                // a bare `hh:mm:ss` after a date would read back as a date-time
                Value::TimeSpan(span) if i > 0 && values[i - 1].is_date() => {
                    self.output.push_str(&format!("{:#}", span));
                }
                _ => self.output.push_str(&value.to_string()),
            }
        }

        for (key, attribute) in tag.attributes().iter() {
            self.output.push(' ');
            if !attribute.namespace().is_empty() {
                self.output.push_str(attribute.namespace());
                self.output.push(':');
            }
            self.output.push_str(key);
            self.output.push('=');
            self.output.push_str(&attribute.value().to_string());
        }

        let children = tag.children();
        if !children.is_empty() {
            self.output.push_str(" {");
            self.output.push_str(NEWLINE);
            self.indent_level += 1;
            for child in children.iter() {
                self.write_tag(child);
                self.output.push_str(NEWLINE);
            }
            self.indent_level -= 1;
            self.write_indent();
            self.output.push('}');
        }
    }

    /// Appends `tags` separated by line terminators.
    pub fn write_tags<'a, I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = &'a Tag>,
    {
        for (i, tag) in tags.into_iter().enumerate() {
            if i > 0 {
                self.output.push_str(NEWLINE);
            }
            self.write_tag(tag);
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Serializer::new()
    }
}

/// Writes tags as XML elements.
pub struct XmlSerializer {
    output: String,
    indent_level: usize,
}

impl XmlSerializer {
    #[must_use]
    pub fn new() -> Self {
        XmlSerializer {
            output: String::with_capacity(256),
            indent_level: 0,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(INDENT);
        }
    }

    fn write_qualified(&mut self, namespace: &str, name: &str) {
        if !namespace.is_empty() {
            self.output.push_str(namespace);
            self.output.push(':');
        }
        self.output.push_str(name);
    }

    fn write_attribute_value(&mut self, text: &str) {
        self.output.push('"');
        for ch in text.chars() {
            match ch {
                '&' => self.output.push_str("&amp;"),
                '<' => self.output.push_str("&lt;"),
                '>' => self.output.push_str("&gt;"),
                '"' => self.output.push_str("&quot;"),
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }

    pub fn write_tag(&mut self, tag: &Tag) {
        self.write_indent();
        self.output.push('<');
        self.write_qualified(tag.namespace(), tag.name());

        for (i, value) in tag.values().iter().enumerate() {
            self.output.push_str(&format!(" _val{}=", i));
            self.write_attribute_value(&value.to_text());
        }

        for (key, attribute) in tag.attributes().iter() {
            self.output.push(' ');
            self.write_qualified(attribute.namespace(), key);
            self.output.push('=');
            self.write_attribute_value(&attribute.value().to_text());
        }

        let children = tag.children();
        if children.is_empty() {
            self.output.push_str("/>");
            return;
        }

        self.output.push('>');
        self.output.push_str(NEWLINE);
        self.indent_level += 1;
        for child in children.iter() {
            self.write_tag(child);
            self.output.push_str(NEWLINE);
        }
        self.indent_level -= 1;
        self.write_indent();
        self.output.push_str("</");
        self.write_qualified(tag.namespace(), tag.name());
        self.output.push('>');
    }
}

impl Default for XmlSerializer {
    fn default() -> Self {
        XmlSerializer::new()
    }
}

impl Tag {
    /// Renders canonical SDL.
    ///
    /// With `include_self` the tag itself is written; otherwise only its
    /// children, separated by `\r\n`, which is how a document root is
    /// written back out.
    #[must_use]
    pub fn to_sdl_string(&self, include_self: bool) -> String {
        let mut serializer = Serializer::new();
        if include_self {
            serializer.write_tag(self);
        } else {
            serializer.write_tags(self.children().iter());
        }
        serializer.into_inner()
    }

    /// Renders the tag and its subtree as XML.
    #[must_use]
    pub fn to_xml_string(&self) -> String {
        let mut serializer = XmlSerializer::new();
        serializer.write_tag(self);
        serializer.into_inner()
    }

    /// Writes canonical SDL to `writer`. See [`Tag::to_sdl_string`].
    pub fn write_to<W: io::Write>(&self, mut writer: W, include_self: bool) -> Result<()> {
        writer.write_all(self.to_sdl_string(include_self).as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sdl_string(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimeSpan;
    use chrono::{Duration, NaiveDate};

    fn tag(name: &str) -> Tag {
        Tag::new(name).unwrap()
    }

    #[test]
    fn test_values_then_sorted_attributes() {
        let mut t = tag("person");
        t.set_attribute("name", "odv").unwrap();
        t.set_attribute("age", 50).unwrap();
        t.add_value(1).unwrap();
        t.add_value(true).unwrap();
        assert_eq!(t.to_string(), "person 1 true age=50 name=\"odv\"");
    }

    #[test]
    fn test_namespaces() {
        let mut t = Tag::with_namespace("ns", "item").unwrap();
        t.set_attribute_ns("xml", "lang", "en").unwrap();
        assert_eq!(t.to_string(), "ns:item xml:lang=\"en\"");
        assert_eq!(t.to_xml_string(), "<ns:item xml:lang=\"en\"/>");
    }

    #[test]
    fn test_nested_children_indentation() {
        let mut grandchild = tag("c");
        grandchild.add_value(3).unwrap();
        let mut child = tag("b");
        child.add_child(grandchild);
        let mut parent = tag("a");
        parent.add_child(child);
        parent.add_child(tag("d"));

        assert_eq!(
            parent.to_string(),
            "a {\r\n    b {\r\n        c 3\r\n    }\r\n    d\r\n}"
        );
    }

    #[test]
    fn test_anonymous_tag_omits_name() {
        let mut content = tag("content");
        content.set_values(["a", "b"]).unwrap();
        assert_eq!(content.to_string(), "\"a\" \"b\"");

        let empty = tag("content");
        assert_eq!(empty.to_string(), "content");

        let mut namespaced = Tag::with_namespace("x", "content").unwrap();
        namespaced.add_value(1).unwrap();
        assert_eq!(namespaced.to_string(), "x:content 1");
    }

    #[test]
    fn test_root_without_self() {
        let mut root = Tag::root();
        root.add_child(tag("a"));
        root.add_child(tag("b"));
        assert_eq!(root.to_sdl_string(false), "a\r\nb");
        assert_eq!(root.to_sdl_string(true), "root {\r\n    a\r\n    b\r\n}");
        assert_eq!(Tag::root().to_sdl_string(false), "");
    }

    #[test]
    fn test_literal_kinds() {
        let mut t = tag("t");
        t.add_value(Value::Null).unwrap();
        t.add_value(NaiveDate::from_ymd_opt(2005, 12, 5).unwrap()).unwrap();
        t.add_value(vec![1u8, 2, 3]).unwrap();
        t.add_value(2.5).unwrap();
        assert_eq!(t.to_string(), "t null 2005/12/05 [AQID] 2.5");
    }

    #[test]
    fn test_timespan_after_date_keeps_day_field() {
        let date = NaiveDate::from_ymd_opt(2005, 12, 5).unwrap();
        let span = TimeSpan::new(Duration::hours(12));
        let mut t = tag("t");
        t.set_values([Value::Date(date), Value::TimeSpan(span)]).unwrap();
        t.add_value(span).unwrap();
        assert_eq!(t.to_string(), "t 2005/12/05 0d:12:00:00 12:00:00");
        assert_eq!(crate::parse(&t.to_string()).unwrap(), vec![t]);
    }

    #[test]
    fn test_xml_children_and_escaping() {
        let mut child = tag("child");
        child.add_value("say \"hi\" & bye").unwrap();
        let mut parent = tag("parent");
        parent.set_attribute("n", 1i64).unwrap();
        parent.add_child(child);

        assert_eq!(
            parent.to_xml_string(),
            "<parent n=\"1\">\r\n    <child _val0=\"say &quot;hi&quot; &amp; bye\"/>\r\n</parent>"
        );
    }

    #[test]
    fn test_write_to() {
        let mut root = Tag::root();
        root.add_child(tag("a"));
        let mut buffer = Vec::new();
        root.write_to(&mut buffer, false).unwrap();
        assert_eq!(buffer, b"a");
    }
}
