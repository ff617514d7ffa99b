//! `#include` expansion.
//!
//! Before SDL text is parsed, every line whose trimmed content starts with
//! `#include ` (the keyword and exactly one space) is replaced by the fully
//! expanded text of the named source. All other lines are copied unchanged,
//! each terminated by `\n`.
//!
//! Include targets are resolved through a [`SourceProvider`]. A target that
//! does not exist is dropped silently (see [`PreprocessOptions::skip_missing`]);
//! an include chain that loops back on itself fails with
//! [`Error::CircularInclude`], and one nested deeper than
//! [`PreprocessOptions::max_depth`] fails with [`Error::IncludeDepthExceeded`].
//!
//! ```rust
//! use sdlang::{MemorySource, Preprocessor};
//!
//! let source = MemorySource::new()
//!     .with("colors.sdl", "red 1\ngreen 2")
//!     .with("main.sdl", "#include colors.sdl\nblue 3");
//!
//! let text = Preprocessor::new(&source).process_source("main.sdl").unwrap();
//! assert_eq!(text, "red 1\ngreen 2\nblue 3\n");
//! ```

use crate::options::PreprocessOptions;
use crate::source::SourceProvider;
use crate::{Error, Result};
use tracing::debug;

const INCLUDE_DIRECTIVE: &str = "#include ";

/// Returns the include target if `line` is an include directive.
fn include_target(line: &str) -> Option<&str> {
    line.trim().strip_prefix(INCLUDE_DIRECTIVE).map(str::trim)
}

/// Expands `#include` directives using a [`SourceProvider`].
pub struct Preprocessor<S> {
    provider: S,
    options: PreprocessOptions,
}

impl<S: SourceProvider> Preprocessor<S> {
    pub fn new(provider: S) -> Self {
        Preprocessor::with_options(provider, PreprocessOptions::default())
    }

    pub fn with_options(provider: S, options: PreprocessOptions) -> Self {
        Preprocessor { provider, options }
    }

    /// Expands the includes in `text`.
    pub fn process(&self, text: &str) -> Result<String> {
        let mut output = String::with_capacity(text.len());
        self.expand(text, 0, &mut Vec::new(), &mut output)?;
        Ok(output)
    }

    /// Fetches source `id` and expands its includes.
    ///
    /// # Errors
    ///
    /// Unlike a missing include target, a missing `id` is an error
    /// ([`Error::SourceNotFound`]).
    pub fn process_source(&self, id: &str) -> Result<String> {
        let text = self.provider.get_text(id)?;
        let mut output = String::with_capacity(text.len());
        let mut open = vec![id.to_string()];
        self.expand(&text, 0, &mut open, &mut output)?;
        Ok(output)
    }

    /// `depth` is the include nesting of `text`; `open` holds the sources
    /// currently being expanded, outermost first.
    fn expand(
        &self,
        text: &str,
        depth: usize,
        open: &mut Vec<String>,
        output: &mut String,
    ) -> Result<()> {
        for line in text.lines() {
            match include_target(line) {
                Some(path) => self.include(path, depth + 1, open, output)?,
                None => {
                    output.push_str(line);
                    output.push('\n');
                }
            }
        }
        Ok(())
    }

    fn include(
        &self,
        path: &str,
        depth: usize,
        open: &mut Vec<String>,
        output: &mut String,
    ) -> Result<()> {
        if open.iter().any(|id| id == path) {
            return Err(Error::CircularInclude {
                path: path.to_string(),
            });
        }
        if depth > self.options.max_depth {
            return Err(Error::IncludeDepthExceeded { depth });
        }

        let text = match self.provider.get_text(path) {
            Ok(text) => text,
            Err(Error::SourceNotFound(_)) if self.options.skip_missing => {
                debug!(path, "skipping missing include");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        debug!(path, depth, "expanding include");
        open.push(path.to_string());
        let result = self.expand(&text, depth, open, output);
        open.pop();
        result
    }
}
