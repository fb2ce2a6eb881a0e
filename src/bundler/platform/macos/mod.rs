//! macOS packaging: an `.app` bundle wrapped in a DMG disk image.
//!
//! | Step | Tool | Failure |
//! |------|------|---------|
//! | `.app` layout and `Info.plist` | none | fatal |
//! | Qt runtime | `macdeployqt` | warning only |
//! | `.dmg` | `hdiutil` | fatal |

pub mod app;
pub mod dmg;

use crate::bundler::{
    error::Result,
    platform::Platform,
    settings::Settings,
    utils::{
        fs,
        process::{CommandRunner, argv, run_optional},
    },
};
use crate::version::BuildContext;
use std::path::{Path, PathBuf};

/// Bundle the macOS build as `{app}-{version}-macOS.dmg`.
///
/// Returns the DMG path.
pub async fn bundle_project<R: CommandRunner>(
    settings: &Settings,
    context: &BuildContext,
    runner: &R,
    build_output: &Path,
) -> Result<PathBuf> {
    log::info!("Creating macOS package for {}", settings.product().name);

    let package_dir = settings.platform_staging_dir(Platform::Macos);
    fs::create_dir_all(&package_dir, true).await?;

    let app_bundle = app::create_app_bundle(settings, context, build_output, &package_dir).await?;

    run_optional(
        runner,
        &argv(["macdeployqt".to_string(), app_bundle.display().to_string()]),
        settings.project_root(),
        "Qt frameworks may be missing from the bundle",
    )
    .await;

    let dmg_path = dmg::create_dmg(settings, context, runner, &package_dir).await?;
    log::info!("Created DMG: {}", dmg_path.display());
    Ok(dmg_path)
}
