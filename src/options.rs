//! Configuration options for include preprocessing.
//!
//! [`PreprocessOptions`] controls how [`Preprocessor`](crate::Preprocessor)
//! expands `#include` directives.
//!
//! ## Examples
//!
//! ```rust
//! use sdlang::{MemorySource, PreprocessOptions, Preprocessor};
//!
//! let source = MemorySource::new().with("inner.sdl", "inner 1");
//!
//! let options = PreprocessOptions::new().with_max_depth(4);
//! let text = Preprocessor::with_options(&source, options)
//!     .process("#include inner.sdl\nouter 2")
//!     .unwrap();
//! assert_eq!(text, "inner 1\nouter 2\n");
//! ```

/// Default limit on nested includes.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Options for include expansion.
///
/// # Examples
///
/// ```rust
/// use sdlang::PreprocessOptions;
///
/// let options = PreprocessOptions::new();
/// assert_eq!(options.max_depth, 32);
/// assert!(options.skip_missing);
///
/// let strict = PreprocessOptions::strict();
/// assert!(!strict.skip_missing);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// How many includes may be open at once.
    pub max_depth: usize,
    /// Drop `#include` lines whose target does not exist instead of failing.
    pub skip_missing: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        PreprocessOptions {
            max_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            skip_missing: true,
        }
    }
}

impl PreprocessOptions {
    /// Creates default options: depth 32, missing targets skipped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that fail on a missing include target.
    #[must_use]
    pub fn strict() -> Self {
        PreprocessOptions {
            skip_missing: false,
            ..Default::default()
        }
    }

    /// Sets the include nesting limit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdlang::PreprocessOptions;
    ///
    /// let options = PreprocessOptions::new().with_max_depth(8);
    /// assert_eq!(options.max_depth, 8);
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_skip_missing(mut self, skip_missing: bool) -> Self {
        self.skip_missing = skip_missing;
        self
    }
}
