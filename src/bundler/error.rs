//! Error types for packaging operations.
//!
//! Provides contextual error chaining, filesystem errors that carry the
//! offending path, and variants for the external tools driven by packagers.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use unidict_bundler::bail;
//! use unidict_bundler::bundler::{ErrorExt, Result};
//!
//! fn read_control(path: &Path) -> Result<String> {
//!     let contents = std::fs::read_to_string(path)
//!         .fs_context("reading control file", path)?;
//!
//!     if !contents.contains("Package:") {
//!         bail!("control file {} has no Package field", path.display());
//!     }
//!
//!     Ok(contents)
//! }
//! ```

use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error as DeriveError;

/// Errors returned by the packaging core.
///
/// Packagers return these internally; the orchestrator turns them into
/// failed step records rather than aborting the run.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "writing control file")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// An external tool ran and exited unsuccessfully.
    #[error("`{command}` failed: {detail}")]
    ToolFailed {
        /// Rendered command line
        command: String,
        /// Captured stderr, or stdout when stderr was empty
        detail: String,
    },

    /// A tool reported success but its output file could not be found.
    #[error("no file matching {pattern} was produced")]
    ArtifactNotFound {
        /// Glob pattern that was searched
        pattern: String,
    },

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking a directory.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Handlebars template rendering error.
    #[error("{0}")]
    HandleBarsError(#[from] handlebars::RenderError),

    /// Handlebars template parsing error.
    #[error("{0}")]
    Template(#[from] handlebars::TemplateError),

    /// JSON serialization error.
    #[error("{0}")]
    JsonError(#[from] serde_json::error::Error),

    /// Packaging configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    ConfigError(#[from] toml::de::Error),

    /// Invalid glob pattern.
    #[error("{0}")]
    GlobPattern(#[from] glob::PatternError),

    /// Glob execution error.
    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    /// Property list writing error.
    #[error("{0}")]
    Plist(#[from] plist::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying binary".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> Result<()> {
        bail!("stage {} failed", "deb");
    }

    #[test]
    fn bail_formats_message() {
        let err = failing().unwrap_err();
        assert_eq!(err.to_string(), "stage deb failed");
    }

    #[test]
    fn context_wraps_inner_error() {
        let inner: Result<()> = Err(Error::GenericError("boom".into()));
        let err = inner.context("writing manifest").unwrap_err();
        assert_eq!(err.to_string(), "writing manifest: boom");
    }

    #[test]
    fn fs_context_keeps_path() {
        let io: std::io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let err = io.fs_context("reading icon", "/tmp/icon.png").unwrap_err();
        assert_eq!(err.to_string(), "reading icon /tmp/icon.png: missing");
    }
}
