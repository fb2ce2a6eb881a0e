//! Multi-platform release packaging for Unidict.
//!
//! Builds the native project with CMake for each requested platform and
//! wraps the result in that platform's installer formats.
//!
//! # Configuration
//!
//! Product metadata has built-in defaults and can be overridden from a TOML
//! file passed with `--config`:
//!
//! ```toml
//! rpm_use_home_topdir = false
//! timeout_secs = 3600
//!
//! [product]
//! name = "Unidict"
//! maintainer = "Unidict Team <team@unidict.org>"
//! deb_depends = ["libqt6core6", "libqt6gui6", "zlib1g"]
//! ```
//!
//! # Supported Formats
//!
//! | Platform | Formats | Tools |
//! |----------|---------|-------|
//! | Windows | .exe (NSIS) | `windeployqt`, `makensis` |
//! | macOS | .app inside a .dmg | `macdeployqt`, `hdiutil` |
//! | Linux | AppImage, .deb, .rpm | `appimagetool`, `dpkg-deb`, `rpmbuild` |
//!
//! # Integration
//!
//! ```no_run
//! use unidict_bundler::bundler::{BundleRequest, Bundler, Platform, SettingsBuilder, SystemRunner};
//!
//! # async fn example() -> unidict_bundler::bundler::Result<()> {
//! let settings = SettingsBuilder::new().project_root("/src/unidict").build()?;
//! let bundler = Bundler::new(settings, SystemRunner::new());
//!
//! let request = BundleRequest {
//!     platforms: vec![Platform::Linux],
//!     ..BundleRequest::default()
//! };
//! let report = bundler.bundle(&request).await?;
//! assert!(report.succeeded());
//! # Ok(())
//! # }
//! ```

mod builder;
mod checksum;
mod compile;
pub mod error;
pub mod manifest;
pub mod platform;
pub mod report;
pub mod settings;
pub mod utils;

// Public re-exports
pub use builder::{BundleRequest, Bundler};
pub use checksum::{calculate_sha256, render_listing, sha256_hex};
pub use compile::PlatformBuilder;
pub use error::{Context, Error, ErrorExt, Result};
pub use manifest::{ArtifactManifestBuilder, BUILD_INFO_FILE, BuildManifest};
pub use platform::{PackageType, Platform};
pub use report::{Artifact, BundleReport, Stage, StepOutcome, StepRecord};
pub use settings::{
    DocumentType, PackagingConfig, ProductSettings, RpmTopDir, Settings, SettingsBuilder,
};
pub use utils::process::{CommandResult, CommandRunner, SystemRunner};
