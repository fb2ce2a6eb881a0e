//! Command line argument parsing and validation.

use crate::bundler::{PackageType, Platform};
use crate::error::CliError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Build Unidict packages for multiple platforms
#[derive(Parser, Debug)]
#[command(
    name = "unidict_bundler",
    about = "Build Unidict packages for multiple platforms",
    long_about = "Builds Unidict with CMake for each requested platform and wraps the \
result in native installers (NSIS, DMG, AppImage, DEB, RPM), then writes \
checksums and build-info.json to the dist/ directory.

Use --help-detailed for a description of every step and the files it produces."
)]
pub struct Args {
    /// Platform to build for
    #[arg(long, value_enum, default_value_t = PlatformChoice::All)]
    pub platform: PlatformChoice,

    /// Package type to build
    #[arg(long = "type", value_enum, default_value_t = TypeChoice::All)]
    pub package_type: TypeChoice,

    /// Version string (default: latest git tag, or "latest")
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// Clean build and staging directories first
    #[arg(long)]
    pub clean: bool,

    /// Show detailed help and exit
    #[arg(long)]
    pub help_detailed: bool,

    /// Root of the Unidict source tree
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub project_root: PathBuf,

    /// TOML file overriding product metadata and packaging options
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Kill any external tool that runs longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// `--platform` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlatformChoice {
    /// Windows, macOS and Linux
    All,
    /// NSIS installer
    Windows,
    /// App bundle and DMG
    Macos,
    /// AppImage, DEB and RPM
    Linux,
}

impl PlatformChoice {
    /// Platforms this choice selects.
    pub fn platforms(self) -> Vec<Platform> {
        match self {
            PlatformChoice::All => Platform::all(),
            PlatformChoice::Windows => vec![Platform::Windows],
            PlatformChoice::Macos => vec![Platform::Macos],
            PlatformChoice::Linux => vec![Platform::Linux],
        }
    }
}

/// `--type` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TypeChoice {
    /// Installers and portable packages
    All,
    /// Native installers only
    Installer,
    /// Portable packages (currently none are produced)
    Portable,
}

impl TypeChoice {
    /// Package types this choice selects.
    pub fn package_types(self) -> Vec<PackageType> {
        match self {
            TypeChoice::All => PackageType::all(),
            TypeChoice::Installer => vec![PackageType::Installer],
            TypeChoice::Portable => vec![PackageType::Portable],
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if let Some(version) = &self.version
            && version.chars().any(char::is_whitespace)
        {
            return Err(CliError::InvalidArguments {
                reason: format!("version {version:?} must not contain whitespace"),
            });
        }
        if let Some(version) = &self.version
            && version.contains(['/', '\\'])
        {
            return Err(CliError::InvalidArguments {
                reason: format!("version {version:?} must not contain path separators"),
            });
        }
        if self.timeout == Some(0) {
            return Err(CliError::InvalidArguments {
                reason: "--timeout must be at least one second".to_string(),
            });
        }
        if !self.project_root.is_dir() {
            return Err(CliError::ProjectRootNotFound {
                path: self.project_root.clone(),
            });
        }
        if let Some(config) = &self.config
            && !config.is_file()
        {
            return Err(CliError::ConfigNotFound {
                path: config.clone(),
            });
        }
        Ok(())
    }
}

/// Text printed by `--help-detailed`.
pub const DETAILED_HELP: &str = "\
Unidict Package Builder
=======================

Builds Unidict for one or more platforms and packages the result.

STEPS
  1. Prepare build/, build/packages/ and dist/ (--clean empties the first two)
  2. Resolve the version: --version, else the latest git tag, else \"latest\"
  3. For each platform: cmake configure + build in build/build-<platform>
  4. Package each platform whose build succeeded:
       windows  windeployqt, NSIS installer   -> Unidict-<version>-Windows.exe
       macos    .app bundle, macdeployqt, DMG -> Unidict-<version>-macOS.dmg
       linux    AppImage                      -> Unidict-<version>-x86_64.AppImage
                Debian package                -> unidict_<version>_amd64.deb
                RPM package                   -> unidict-<version>-1.x86_64.rpm
  5. If every step succeeded: checksums-<version>.txt and build-info.json

A failed step does not stop the run; remaining platforms are still built.
The portable package type is accepted but produces no files.

REQUIRED TOOLS
  all       cmake, git (optional)
  windows   Visual Studio 2022, vcpkg, windeployqt, makensis
  macos     Xcode command line tools, macdeployqt, hdiutil
  linux     appimagetool, dpkg-deb, rpmbuild

EXAMPLES
  unidict_bundler --platform linux --type installer
  unidict_bundler --version 1.2.3 --clean
  unidict_bundler --project-root ~/src/unidict --config packaging.toml

EXIT STATUS
  0 when no step failed, 1 otherwise.
";
