//! macOS DMG disk image creation with the native `hdiutil` tool.

use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::{
        fs,
        process::{CommandRunner, run_checked},
    },
};
use crate::version::BuildContext;
use std::path::{Path, PathBuf};

/// Output file name, `{app}-{version}-macOS.dmg`.
pub fn dmg_file_name(settings: &Settings, context: &BuildContext) -> String {
    format!("{}-{}-macOS.dmg", settings.product().name, context.version())
}

/// `hdiutil create` arguments wrapping `source_dir` into `dmg_path`.
pub fn hdiutil_args(volume_name: &str, source_dir: &Path, dmg_path: &Path) -> Vec<String> {
    vec![
        "hdiutil".into(),
        "create".into(),
        "-volname".into(),
        volume_name.into(),
        "-srcfolder".into(),
        source_dir.display().to_string(),
        "-ov".into(),
        "-format".into(),
        "UDZO".into(),
        dmg_path.display().to_string(),
    ]
}

/// Wraps `package_dir` into a compressed disk image in the output directory.
pub async fn create_dmg<R: CommandRunner>(
    settings: &Settings,
    context: &BuildContext,
    runner: &R,
    package_dir: &Path,
) -> Result<PathBuf> {
    let dmg_path = settings.dist_root().join(dmg_file_name(settings, context));
    fs::create_dir_all(settings.dist_root(), false).await?;

    log::info!("Creating DMG: {}", dmg_path.display());
    let args = hdiutil_args(&settings.product().name, package_dir, &dmg_path);
    run_checked(runner, &args, settings.project_root()).await?;

    Ok(dmg_path)
}
