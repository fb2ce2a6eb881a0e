//! AppImage bundler - portable Linux applications.

use super::freedesktop;
use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::{
        fs,
        process::{CommandRunner, argv, run_checked},
    },
};
use crate::version::BuildContext;
use std::path::{Path, PathBuf};

/// Icon sizes created under `usr/share/icons/hicolor`.
const ICON_SIZES: [u32; 7] = [16, 32, 48, 64, 128, 256, 512];

/// PNG icon source, relative to the project root.
const ICON_SOURCE: &str = "assets/icon.png";

/// Launcher placed at the AppDir root.
pub fn app_run_script(gui_executable: &str) -> String {
    format!(
        r#"#!/bin/sh
HERE="$(dirname "$(readlink -f "${{0}}")")"
export LD_LIBRARY_PATH="${{HERE}}/usr/lib:${{LD_LIBRARY_PATH}}"
export PATH="${{HERE}}/usr/bin:${{PATH}}"
export QT_PLUGIN_PATH="${{HERE}}/usr/plugins"
exec "${{HERE}}/usr/bin/{gui_executable}" "$@"
"#
    )
}

/// Bundle the Linux build as `{app}-{version}-x86_64.AppImage`.
///
/// # Process
///
/// 1. Create the AppDir tree (`usr/bin`, `usr/lib`, applications, hicolor icons)
/// 2. Copy executables, desktop entry and icon (at both standard and root locations)
/// 3. Write the executable `AppRun` launcher
/// 4. Invoke `appimagetool`
pub async fn bundle_project<R: CommandRunner>(
    settings: &Settings,
    context: &BuildContext,
    runner: &R,
    build_output: &Path,
    staging_dir: &Path,
) -> Result<PathBuf> {
    let product = settings.product();
    log::info!("Building AppImage for {}", product.name);

    let app_dir = staging_dir.join(format!("{}.AppDir", product.name));
    fs::create_dir_all(&app_dir, true).await?;

    let bin_dir = app_dir.join("usr/bin");
    let applications_dir = app_dir.join("usr/share/applications");
    let icons_dir = app_dir.join("usr/share/icons/hicolor");
    for dir in [&bin_dir, &app_dir.join("usr/lib"), &applications_dir] {
        fs::create_dir_all(dir, false).await?;
    }
    for size in ICON_SIZES {
        fs::create_dir_all(&icons_dir.join(format!("{size}x{size}/apps")), false).await?;
    }

    for exe in product.executables() {
        let dst = bin_dir.join(exe);
        if fs::copy_if_present(&build_output.join(exe), &dst).await? {
            fs::set_executable(&dst).await?;
        }
    }

    let desktop_name = freedesktop::desktop_file_name(product);
    let desktop_entry = freedesktop::desktop_entry(product);
    fs::write_file(&applications_dir.join(&desktop_name), &desktop_entry).await?;
    fs::write_file(&app_dir.join(&desktop_name), &desktop_entry).await?;

    let icon_source = settings.project_root().join(ICON_SOURCE);
    let icon_name = format!("{}.png", product.package_name);
    if fs::copy_if_present(&icon_source, &app_dir.join(&icon_name)).await? {
        fs::copy_file(&icon_source, &icons_dir.join("256x256/apps").join(&icon_name)).await?;
    }

    let app_run = app_dir.join("AppRun");
    fs::write_file(&app_run, app_run_script(&product.gui_executable)).await?;
    fs::set_executable(&app_run).await?;

    let appimage_path = settings.dist_root().join(format!(
        "{}-{}-x86_64.AppImage",
        product.name,
        context.version()
    ));
    fs::create_dir_all(settings.dist_root(), false).await?;

    let command = argv([
        "appimagetool".to_string(),
        "--appimage-extract-and-run".to_string(),
        app_dir.display().to_string(),
        appimage_path.display().to_string(),
    ]);
    run_checked(runner, &command, settings.project_root()).await?;

    log::info!("Created AppImage: {}", appimage_path.display());
    Ok(appimage_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_run_execs_the_gui_binary() {
        let script = app_run_script("unidict_qml");
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(r#"HERE="$(dirname "$(readlink -f "${0}")")""#));
        assert!(script.contains(r#"export QT_PLUGIN_PATH="${HERE}/usr/plugins""#));
        assert!(script.ends_with("exec \"${HERE}/usr/bin/unidict_qml\" \"$@\"\n"));
    }
}
