//! # Unidict Bundler
//!
//! Release packaging for the Unidict dictionary application.
//!
//! For each requested platform the bundler configures and compiles the
//! native project with CMake, then assembles the platform's installers:
//!
//! - **Windows**: NSIS installer with file associations and shortcuts
//! - **macOS**: `.app` bundle wrapped in a compressed disk image
//! - **Linux**: AppImage, Debian and RPM packages
//!
//! Every step is recorded in a [`BundleReport`]; a failed step never stops
//! the remaining ones. When nothing failed, `checksums-<version>.txt` and
//! `build-info.json` are written next to the artifacts.
//!
//! ## Usage
//!
//! ```bash
//! unidict_bundler                              # every platform, every type
//! unidict_bundler --platform linux --clean     # Linux only, fresh build dirs
//! unidict_bundler --version 1.2.3 --type installer
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Core modules
pub mod bundler;
pub mod cli;
pub mod error;
pub mod version;

// Re-export main types for public API
pub use bundler::{BundleReport, BundleRequest, Bundler, PackageType, Platform};
pub use cli::Args;
pub use error::{CliError, PackagerError, Result};
pub use version::{BuildContext, VersionResolver};
