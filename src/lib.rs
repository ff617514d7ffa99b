//! # sdlang
//!
//! A parser and document model for SDL (Simple Declarative Language).
//!
//! ## What is SDL?
//!
//! SDL is a compact, line-oriented configuration and data language. A
//! document is a tree of tags; each tag has a name, typed values, attributes
//! and children:
//!
//! ```text
//! server "primary" port=8080 secure=on {
//!     started 2005/12/05 14:12:23-JST
//!     timeout 00:00:30
//!     key [c2VjcmV0]
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Typed Literals**: strings, ints, longs, floats, doubles, decimals,
//!   booleans, null, dates, date-times with zones, time spans and binary
//! - **Canonical Output**: tags write back to SDL that reads back to an equal
//!   tree, and tag equality is defined on that text
//! - **Includes**: `#include` lines are expanded before parsing, with cycle
//!   and depth checks
//! - **Validated Model**: a [`Tag`] never holds an invalid identifier or an
//!   unwritable value
//! - **Serde Export**: [`Tag`] and [`Value`] implement `Serialize`
//!
//! ## Quick Start
//!
//! ```rust
//! use sdlang::{from_str, Value};
//!
//! let root = from_str("size 4\nname \"box\" color=\"red\"").unwrap();
//!
//! assert_eq!(root.child_value_as_or("size", 0), 4);
//! let name = root.child("name").unwrap();
//! assert_eq!(name.attribute("color"), Some(&Value::from("red")));
//! ```
//!
//! ### Building and Writing Tags
//!
//! ```rust
//! use sdlang::Tag;
//!
//! let mut person = Tag::new("person").unwrap();
//! person.add_value("Akiko").unwrap();
//! person.set_attribute("age", 32).unwrap();
//!
//! let mut phone = Tag::new("phone").unwrap();
//! phone.set_value("555-1234").unwrap();
//! person.add_child(phone);
//!
//! assert_eq!(
//!     person.to_string(),
//!     "person \"Akiko\" age=32 {\r\n    phone \"555-1234\"\r\n}"
//! );
//! assert_eq!(
//!     person.to_xml_string(),
//!     "<person _val0=\"Akiko\" age=\"32\">\r\n    <phone _val0=\"555-1234\"/>\r\n</person>"
//! );
//! ```
//!
//! ### Reading Sources with Includes
//!
//! ```rust
//! use sdlang::{MemorySource, Tag};
//!
//! let source = MemorySource::new()
//!     .with("main.sdl", "#include shared.sdl\nlocal 1")
//!     .with("shared.sdl", "shared 2");
//!
//! let mut root = Tag::root();
//! root.read_source(&source, "main.sdl").unwrap();
//! assert_eq!(root.children().len(), 2);
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Every mutation validates before changing state
//! - A failed parse attaches nothing
//! - No panics in the public API
//!
//! ## Syntax
//!
//! See the [`grammar`] module for the accepted syntax.

pub mod coerce;
pub mod config;
pub mod de;
pub mod error;
pub mod grammar;
pub mod map;
pub mod options;
pub mod preprocess;
pub mod ser;
pub mod source;
pub mod tag;
pub mod value;

pub use coerce::{coerce, FromValue, IntoValue};
pub use config::{ConfigLoader, Settings};
pub use de::{parse, Lexer, Parser};
pub use error::{Error, Result};
pub use map::{Attribute, AttributeMap};
pub use options::PreprocessOptions;
pub use preprocess::Preprocessor;
pub use ser::{Serializer, XmlSerializer};
pub use source::{FileSource, MemorySource, SourceProvider};
pub use tag::{Snapshot, Tag};
pub use value::{Decimal, Number, SdlDateTime, TimeSpan, TimeZone, Value};

use std::io;

/// Writes top-level tags as an SDL document, one tag per line group.
///
/// # Examples
///
/// ```rust
/// use sdlang::{parse, to_string};
///
/// let tags = parse("a 1; b 2").unwrap();
/// assert_eq!(to_string(&tags), "a 1\r\nb 2");
/// ```
#[must_use]
pub fn to_string(tags: &[Tag]) -> String {
    let mut serializer = Serializer::new();
    serializer.write_tags(tags);
    serializer.into_inner()
}

/// Writes top-level tags as an SDL document to a writer.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, tags: &[Tag]) -> Result<()>
where
    W: io::Write,
{
    writer.write_all(to_string(tags).as_bytes())?;
    Ok(())
}

/// Parses an SDL document into a `root` tag holding its top-level tags.
///
/// # Examples
///
/// ```rust
/// use sdlang::from_str;
///
/// let root = from_str("a; b").unwrap();
/// assert_eq!(root.name(), "root");
/// assert_eq!(root.children().len(), 2);
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] with line and column information if the input is
/// not valid SDL.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Tag> {
    let mut root = Tag::root();
    root.read_str(s)?;
    Ok(root)
}

/// Parses an SDL document from an I/O stream. See [`from_str`].
///
/// # Examples
///
/// ```rust
/// use sdlang::from_reader;
/// use std::io::Cursor;
///
/// let root = from_reader(Cursor::new(b"a 1")).unwrap();
/// assert_eq!(root.child_value_as_or("a", 0), 1);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the input is not valid SDL.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Tag>
where
    R: io::Read,
{
    let mut string = String::new();
    reader.read_to_string(&mut string)?;
    from_str(&string)
}

/// Parses an SDL document from UTF-8 bytes. See [`from_str`].
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not valid SDL.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Tag> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
