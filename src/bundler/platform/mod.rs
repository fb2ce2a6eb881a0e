//! Platform-specific packaging implementations.
//!
//! Every packager stages files, generates its descriptor documents and
//! drives an external tool. None of them depend on the host OS at compile
//! time, so a Linux host can still stage (and fail cleanly on) a Windows
//! installer when `makensis` is absent.
//!
//! | Platform | Stages | Module |
//! |----------|--------|--------|
//! | Windows | NSIS installer | [`windows`] |
//! | macOS | .app bundle wrapped in a .dmg | [`macos`] |
//! | Linux | AppImage, .deb, .rpm | [`linux`] |

pub mod linux;
pub mod macos;
pub mod windows;

use crate::bundler::{
    report::{Stage, StepOutcome, StepRecord},
    settings::Settings,
    utils::process::CommandRunner,
};
use crate::version::BuildContext;
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// Target platform of a packaging run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// NSIS installer.
    Windows,
    /// App bundle in a DMG.
    Macos,
    /// AppImage, DEB and RPM.
    Linux,
}

impl Platform {
    /// Every platform, in the order a full run processes them.
    pub fn all() -> Vec<Platform> {
        vec![Platform::Windows, Platform::Macos, Platform::Linux]
    }

    /// Packaging stages produced for this platform by the installer type.
    pub fn installer_stages(&self) -> &'static [Stage] {
        match self {
            Platform::Windows => &[Stage::Nsis],
            Platform::Macos => &[Stage::Dmg],
            Platform::Linux => &[Stage::AppImage, Stage::Deb, Stage::Rpm],
        }
    }

    /// Directory the native build leaves its binaries in.
    ///
    /// Multi-config generators (Visual Studio) nest them under the
    /// configuration name.
    pub fn build_output_dir(&self, settings: &Settings) -> PathBuf {
        let build_dir = settings.platform_build_dir(*self);
        match self {
            Platform::Windows => build_dir.join("Release"),
            Platform::Macos | Platform::Linux => build_dir,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::Macos => "macos",
            Platform::Linux => "linux",
        };
        f.write_str(name)
    }
}

/// Kind of package requested for each platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// Native installer formats (NSIS, DMG, AppImage/DEB/RPM).
    Installer,
    /// Accepted, but no portable archives are produced yet.
    Portable,
}

impl PackageType {
    /// Every package type.
    pub fn all() -> Vec<PackageType> {
        vec![PackageType::Installer, PackageType::Portable]
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PackageType::Installer => "installer",
            PackageType::Portable => "portable",
        })
    }
}

/// Runs the installer packagers for `platform` and returns one record per stage.
///
/// Failures inside a packager become `Failed` records; nothing here aborts
/// the run.
pub async fn package<R: CommandRunner>(
    platform: Platform,
    settings: &Settings,
    context: &BuildContext,
    runner: &R,
) -> Vec<StepRecord> {
    let build_output = platform.build_output_dir(settings);
    match platform {
        Platform::Windows => {
            let result = windows::bundle_project(settings, context, runner, &build_output).await;
            vec![StepRecord::new(platform, Stage::Nsis, StepOutcome::from_result(result))]
        }
        Platform::Macos => {
            let result = macos::bundle_project(settings, context, runner, &build_output).await;
            vec![StepRecord::new(platform, Stage::Dmg, StepOutcome::from_result(result))]
        }
        Platform::Linux => linux::bundle_project(settings, context, runner, &build_output)
            .await
            .into_iter()
            .map(|(stage, outcome)| StepRecord::new(platform, stage, outcome))
            .collect(),
    }
}
