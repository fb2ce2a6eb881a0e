//! Application-level error types.
//!
//! Step failures inside a packaging run are never errors; they are recorded
//! in the run report. The errors here are the ones that stop the tool before
//! or around a run: bad arguments, an unreadable config file, an output root
//! that cannot be created.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type of the `unidict_bundler` binary
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Packaging core errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Project root does not exist or is not a directory
    #[error("Project root not found: {}", path.display())]
    ProjectRootNotFound {
        /// Path given on the command line
        path: PathBuf,
    },

    /// Config file passed with `--config` does not exist
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound {
        /// Path given on the command line
        path: PathBuf,
    },
}

impl PackagerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PackagerError::Cli(CliError::ProjectRootNotFound { path }) => vec![
                format!("Check that {} exists", path.display()),
                "Pass the source tree with --project-root <path>".to_string(),
            ],
            PackagerError::Cli(CliError::ConfigNotFound { .. }) => vec![
                "Omit --config to use the built-in product defaults".to_string(),
            ],
            PackagerError::Bundler(crate::bundler::Error::ConfigError(_)) => vec![
                "Fix the TOML syntax or field types in the config file".to_string(),
                "Only keys of PackagingConfig and its [product] table are accepted".to_string(),
            ],
            PackagerError::Bundler(crate::bundler::Error::Fs { path, .. }) => vec![format!(
                "Check permissions and free space for {}",
                path.display()
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
