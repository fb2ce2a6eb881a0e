//! Linux packaging: AppImage, .deb and .rpm.
//!
//! | Format | Required Tool | Output |
//! |--------|---------------|--------|
//! | AppImage | `appimagetool` | `{app}-{version}-x86_64.AppImage` |
//! | .deb | `dpkg-deb` | `{pkg}_{version}_amd64.deb` |
//! | .rpm | `rpmbuild` | `{pkg}-{version}-1.x86_64.rpm` |
//!
//! The three sub-packagers are independent: each one runs even when an
//! earlier one failed, and each reports its own outcome.

pub mod appimage;
pub mod debian;
pub mod freedesktop;
pub mod rpm;

use crate::bundler::{
    platform::Platform,
    report::{Stage, StepOutcome},
    settings::Settings,
    utils::{fs, process::CommandRunner},
};
use crate::version::BuildContext;
use std::path::Path;

/// Runs all three Linux packagers and returns one outcome per stage.
pub async fn bundle_project<R: CommandRunner>(
    settings: &Settings,
    context: &BuildContext,
    runner: &R,
    build_output: &Path,
) -> Vec<(Stage, StepOutcome)> {
    let staging_dir = settings.platform_staging_dir(Platform::Linux);
    if let Err(err) = fs::create_dir_all(&staging_dir, true).await {
        let reason = format!("preparing {}: {err}", staging_dir.display());
        return Platform::Linux
            .installer_stages()
            .iter()
            .map(|stage| (*stage, StepOutcome::failed(reason.clone())))
            .collect();
    }

    let appimage =
        appimage::bundle_project(settings, context, runner, build_output, &staging_dir).await;
    let deb = debian::bundle_project(settings, context, runner, build_output, &staging_dir).await;
    let rpm = rpm::bundle_project(settings, context, runner, build_output, &staging_dir).await;

    vec![
        (Stage::AppImage, StepOutcome::from_result(appimage)),
        (Stage::Deb, StepOutcome::from_result(deb)),
        (Stage::Rpm, StepOutcome::from_result(rpm)),
    ]
}
