//! Where SDL text comes from.
//!
//! The preprocessor, [`Tag::read_source`](crate::Tag::read_source) and the
//! [`ConfigLoader`](crate::ConfigLoader) all fetch text through the
//! [`SourceProvider`] trait, keyed by a path-like id such as `"main.sdl"`.
//!
//! - [`FileSource`] reads files relative to a root directory
//! - [`MemorySource`] serves text from an in-memory map
//!
//! A provider reports a missing id as [`Error::SourceNotFound`]; callers
//! treat that error differently from every other failure.

use crate::{Error, Result};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// A named source of SDL text.
pub trait SourceProvider {
    /// Returns the text stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] when `id` does not exist, and any
    /// other error when it exists but cannot be read.
    fn get_text(&self, id: &str) -> Result<String>;
}

impl<T: SourceProvider + ?Sized> SourceProvider for &T {
    fn get_text(&self, id: &str) -> Result<String> {
        (**self).get_text(id)
    }
}

/// Reads sources from files below a root directory.
///
/// # Examples
///
/// ```rust,no_run
/// use sdlang::{FileSource, Tag};
///
/// let mut root = Tag::root();
/// root.read_source(&FileSource::new("config"), "app.sdl").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FileSource {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Reads files relative to the working directory.
    #[must_use]
    pub fn current_dir() -> Self {
        FileSource::new(".")
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceProvider for FileSource {
    fn get_text(&self, id: &str) -> Result<String> {
        std::fs::read_to_string(self.root.join(id)).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::source_not_found(id),
            _ => Error::Io(format!("{}: {}", id, err)),
        })
    }
}

/// Serves sources from memory.
///
/// # Examples
///
/// ```rust
/// use sdlang::{Error, MemorySource, SourceProvider};
///
/// let source = MemorySource::new().with("a.sdl", "a 1");
/// assert_eq!(source.get_text("a.sdl").unwrap(), "a 1");
/// assert_eq!(source.get_text("b.sdl"), Err(Error::SourceNotFound("b.sdl".into())));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    sources: HashMap<String, String>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source, builder style.
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.sources.insert(id.into(), text.into())
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.sources.remove(id)
    }
}

impl SourceProvider for MemorySource {
    fn get_text(&self, id: &str) -> Result<String> {
        self.sources
            .get(id)
            .cloned()
            .ok_or_else(|| Error::source_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_maps_missing_files() {
        let source = FileSource::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests"));
        assert_eq!(
            source.get_text("does-not-exist.sdl"),
            Err(Error::SourceNotFound("does-not-exist.sdl".into()))
        );
        assert!(source.get_text("testdata/bar.sdl").unwrap().contains("bar_1"));
    }

    #[test]
    fn test_file_source_directory_is_io_error() {
        let source = FileSource::new(env!("CARGO_MANIFEST_DIR"));
        assert!(matches!(source.get_text("tests"), Err(Error::Io(_))));
    }

    #[test]
    fn test_memory_source_insert_and_remove() {
        let mut source = MemorySource::new();
        assert_eq!(source.insert("a", "1"), None);
        assert_eq!(source.insert("a", "2"), Some("1".to_string()));
        assert_eq!(source.get_text("a").unwrap(), "2");
        assert_eq!(source.remove("a"), Some("2".to_string()));
        assert!(source.get_text("a").is_err());
    }

    #[test]
    fn test_reference_is_a_provider() {
        fn fetch<S: SourceProvider>(source: S) -> Result<String> {
            source.get_text("x")
        }
        let source = MemorySource::new().with("x", "y");
        assert_eq!(fetch(&source).unwrap(), "y");
    }
}
