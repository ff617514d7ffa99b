//! Error types for SDL parsing, tag manipulation and include expansion.
//!
//! Every fallible operation in this crate returns [`Result`], whose error side
//! is the single [`Error`] enum below.
//!
//! ## Error Categories
//!
//! - **Validation**: an identifier or value was rejected at the point of
//!   assignment ([`Error::InvalidIdentifier`], [`Error::UnsupportedType`])
//! - **Conversion**: a stored value could not be projected to the requested
//!   type ([`Error::Conversion`])
//! - **Parsing**: malformed SDL source, reported with line and column
//!   ([`Error::Parse`])
//! - **Sources**: a document or include target could not be resolved
//!   ([`Error::SourceNotFound`], [`Error::CircularInclude`],
//!   [`Error::IncludeDepthExceeded`], [`Error::Io`])
//!
//! ## Examples
//!
//! ```rust
//! use sdlang::{parse, Error};
//!
//! let err = parse("person name=\"unterminated").unwrap_err();
//! assert!(matches!(err, Error::Parse { line: 1, .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A tag name, namespace or attribute key does not match the identifier grammar.
    #[error("invalid SDL identifier {0:?}: identifiers start with a letter or '_' followed by letters, digits, '_', '-' or '.'")]
    InvalidIdentifier(String),

    /// A value cannot be stored as any SDL literal kind.
    #[error("unsupported value: {0}")]
    UnsupportedType(String),

    /// A stored value cannot be converted to the requested type.
    #[error("cannot convert {from} to {to}")]
    Conversion { from: String, to: &'static str },

    /// Malformed SDL source text.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// A named document or configuration source does not exist.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// An include chain refers back to a source that is still being expanded.
    #[error("circular include of {path:?}")]
    CircularInclude { path: String },

    /// Includes are nested deeper than the configured limit.
    #[error("include depth {depth} exceeds the configured maximum")]
    IncludeDepthExceeded { depth: usize },

    /// IO error while reading a source or writing output.
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a parse error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdlang::Error;
    ///
    /// let err = Error::parse(10, 5, "unexpected '}'");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn invalid_identifier(identifier: &str) -> Self {
        Error::InvalidIdentifier(identifier.to_string())
    }

    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        Error::UnsupportedType(msg.into())
    }

    /// Creates a conversion error describing the source value and target type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdlang::Error;
    ///
    /// let err = Error::conversion("string \"a\"", "i32");
    /// assert_eq!(err.to_string(), "cannot convert string \"a\" to i32");
    /// ```
    pub fn conversion(from: impl Into<String>, to: &'static str) -> Self {
        Error::Conversion {
            from: from.into(),
            to,
        }
    }

    pub fn source_not_found(id: &str) -> Self {
        Error::SourceNotFound(id.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors raised while validating an assignment.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidIdentifier(_) | Error::UnsupportedType(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
