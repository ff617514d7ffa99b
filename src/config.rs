//! Typed configuration loaded from SDL files.
//!
//! A configuration is an SDL document named `<key>.sdl`. [`ConfigLoader`]
//! fetches it through a [`SourceProvider`], expands its includes, parses it
//! under a `root` tag and hands that tag to a [`Settings`] implementation.
//!
//! ```rust
//! use sdlang::{ConfigLoader, MemorySource, Result, Settings, Tag};
//!
//! #[derive(Default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Settings for Server {
//!     fn initialize(&mut self, root: &Tag) -> Result<()> {
//!         self.host = root.child_value_as_or("host", "localhost".to_string());
//!         self.port = root.child_value_as_or("port", 80);
//!         Ok(())
//!     }
//! }
//!
//! let source = MemorySource::new().with("prod.sdl", "host \"example.org\"\nport 8080");
//! let loader = ConfigLoader::new(source);
//!
//! let prod: Server = loader.load("prod").unwrap();
//! assert_eq!((prod.host.as_str(), prod.port), ("example.org", 8080));
//!
//! // no default.sdl: fall back to Server::default()
//! let fallback: Server = loader.load_default().unwrap();
//! assert_eq!(fallback.port, 0);
//! ```

use crate::options::PreprocessOptions;
use crate::preprocess::Preprocessor;
use crate::source::{FileSource, SourceProvider};
use crate::{Error, Result, Tag};
use std::path::Path;
use tracing::debug;

/// Key of the configuration used when none is named.
pub const DEFAULT_CONFIG_KEY: &str = "default";

/// Directory [`ConfigLoader::default`] reads from.
pub const DEFAULT_CONFIG_DIR: &str = "../config";

/// A configuration type that binds itself from a parsed document.
pub trait Settings: Default {
    /// Fills `self` from the document's `root` tag.
    fn initialize(&mut self, root: &Tag) -> Result<()>;
}

/// Resolves configuration keys to `<key>.sdl` sources and binds them.
pub struct ConfigLoader<S> {
    provider: S,
    options: PreprocessOptions,
}

impl ConfigLoader<FileSource> {
    /// Reads configurations from `<dir>/<key>.sdl`.
    pub fn in_directory<P: AsRef<Path>>(dir: P) -> Self {
        ConfigLoader::new(FileSource::new(dir))
    }
}

impl Default for ConfigLoader<FileSource> {
    fn default() -> Self {
        ConfigLoader::in_directory(DEFAULT_CONFIG_DIR)
    }
}

impl<S: SourceProvider> ConfigLoader<S> {
    pub fn new(provider: S) -> Self {
        ConfigLoader {
            provider,
            options: PreprocessOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PreprocessOptions) -> Self {
        self.options = options;
        self
    }

    fn source_id(key: &str) -> String {
        format!("{}.sdl", key)
    }

    /// Loads the configuration named `key`.
    ///
    /// # Errors
    ///
    /// Fails on an empty key, a missing source ([`Error::SourceNotFound`]),
    /// malformed SDL, or an error from [`Settings::initialize`].
    pub fn load<T: Settings>(&self, key: &str) -> Result<T> {
        if key.is_empty() {
            return Err(Error::custom("configuration key must not be empty"));
        }
        let id = Self::source_id(key);
        let text = Preprocessor::with_options(&self.provider, self.options.clone())
            .process_source(&id)?;

        let mut root = Tag::root();
        root.read_str(&text)?;
        let mut settings = T::default();
        settings.initialize(&root)?;
        debug!(key, "loaded configuration");
        Ok(settings)
    }

    /// Loads `default.sdl`, or returns `T::default()` when it does not exist.
    ///
    /// Any other failure, including a missing include of an existing
    /// `default.sdl` in strict mode, is returned as an error.
    pub fn load_default<T: Settings>(&self) -> Result<T> {
        match self.load(DEFAULT_CONFIG_KEY) {
            Err(Error::SourceNotFound(id)) if id == Self::source_id(DEFAULT_CONFIG_KEY) => {
                debug!("no default configuration, using built-in defaults");
                Ok(T::default())
            }
            other => other,
        }
    }

    /// Loads the configuration named by the first argument, or the default
    /// configuration when there are no arguments.
    pub fn load_from_args<T, A>(&self, args: &[A]) -> Result<T>
    where
        T: Settings,
        A: AsRef<str>,
    {
        match args.first() {
            Some(key) => self.load(key.as_ref()),
            None => self.load_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[derive(Debug, Default, PartialEq)]
    struct Limits {
        size: i32,
        ratio: f64,
        names: Vec<String>,
    }

    impl Settings for Limits {
        fn initialize(&mut self, root: &Tag) -> Result<()> {
            self.size = root.child_value_as_or("size", -1);
            self.ratio = root.child_value_as_or("ratio", 0.0);
            self.names = root
                .children_named("name", true)
                .iter()
                .map(|tag| tag.value_as::<String>())
                .collect::<Result<_>>()?;
            Ok(())
        }
    }

    fn loader() -> ConfigLoader<MemorySource> {
        ConfigLoader::new(
            MemorySource::new()
                .with("small.sdl", "size 4\nratio 0.5\n#include names.sdl")
                .with("names.sdl", "group {\n    name \"a\"\n    name \"b\"\n}")
                .with("broken.sdl", "size {")
                .with("bad_names.sdl", "name null"),
        )
    }

    #[test]
    fn test_load_named_configuration() {
        let limits: Limits = loader().load("small").unwrap();
        assert_eq!(
            limits,
            Limits {
                size: 4,
                ratio: 0.5,
                names: vec!["a".into(), "b".into()],
            }
        );
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(loader().load::<Limits>(""), Err(Error::Custom(_))));
        assert_eq!(
            loader().load::<Limits>("nothere").unwrap_err(),
            Error::SourceNotFound("nothere.sdl".into())
        );
        assert!(matches!(
            loader().load::<Limits>("broken"),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            loader().load::<Limits>("bad_names"),
            Err(Error::Conversion { .. })
        ));
    }

    #[test]
    fn test_default_configuration() {
        assert_eq!(loader().load_default::<Limits>().unwrap(), Limits::default());

        let with_default = ConfigLoader::new(MemorySource::new().with("default.sdl", "size 9"));
        assert_eq!(with_default.load_default::<Limits>().unwrap().size, 9);
    }

    #[test]
    fn test_load_from_args() {
        let by_name: Limits = loader().load_from_args(&["small"]).unwrap();
        assert_eq!(by_name.size, 4);

        let none: [&str; 0] = [];
        let fallback: Limits = loader().load_from_args(&none).unwrap();
        assert_eq!(fallback, Limits::default());
    }

    #[test]
    fn test_strict_default_with_missing_include_fails() {
        let loader = ConfigLoader::new(
            MemorySource::new().with("default.sdl", "size 1\n#include gone.sdl"),
        )
        .with_options(PreprocessOptions::strict());
        assert_eq!(
            loader.load_default::<Limits>().unwrap_err(),
            Error::SourceNotFound("gone.sdl".into())
        );
    }
}
