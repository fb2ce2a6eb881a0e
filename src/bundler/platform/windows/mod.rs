//! Windows installer packaging.
//!
//! Stages the executables and DLLs of a Visual Studio build, pulls in the Qt
//! runtime with `windeployqt`, and compiles an NSIS installer that is copied
//! to the output directory as `{app}-{version}-Windows.exe`.

pub mod nsis;

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    platform::Platform,
    settings::Settings,
    utils::{
        fs,
        process::{CommandRunner, argv, run_optional},
    },
};
use crate::version::BuildContext;
use std::path::{Path, PathBuf};

/// Bundle the Windows build as an NSIS installer.
///
/// # Process
///
/// 1. Recreate `<staging>/windows/<App>` and copy executables and DLLs into it
/// 2. Run `windeployqt` (a failure only warns)
/// 3. Generate `install.nsi` and compile it with `makensis`
/// 4. Locate the produced `*installer*.exe` and copy it to the output directory
///
/// # Returns
///
/// Path of the installer in the output directory.
pub async fn bundle_project<R: CommandRunner>(
    settings: &Settings,
    context: &BuildContext,
    runner: &R,
    build_output: &Path,
) -> Result<PathBuf> {
    let product = settings.product();
    log::info!("Building Windows installer for {}", product.name);

    let package_dir = settings.platform_staging_dir(Platform::Windows);
    fs::create_dir_all(&package_dir, true).await?;
    let install_dir = package_dir.join(&product.name);
    fs::create_dir_all(&install_dir, false).await?;

    stage_files(settings, build_output, &install_dir).await?;

    run_optional(
        runner,
        &argv([
            "windeployqt".to_string(),
            "--release".to_string(),
            install_dir.display().to_string(),
        ]),
        settings.project_root(),
        "runtime libraries may be missing",
    )
    .await;

    let nsi_path =
        nsis::generate_nsi_script(settings, context, &package_dir, &product.name).await?;
    nsis::run_makensis(runner, &nsi_path).await?;

    let installer = find_installer(&package_dir)?;
    let destination = settings
        .dist_root()
        .join(format!("{}-{}-Windows.exe", product.name, context.version()));
    fs::copy_file(&installer, &destination).await?;

    log::info!("Created Windows installer: {}", destination.display());
    Ok(destination)
}

async fn stage_files(settings: &Settings, build_output: &Path, install_dir: &Path) -> Result<()> {
    for exe in settings.product().executables() {
        let name = format!("{exe}.exe");
        if fs::copy_if_present(&build_output.join(&name), &install_dir.join(&name)).await? {
            log::info!("Staged {name}");
        }
    }

    if build_output.is_dir() {
        let mut entries = tokio::fs::read_dir(build_output)
            .await
            .fs_context("reading build output", build_output)?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .fs_context("reading build output", build_output)?
        {
            let path = entry.path();
            let is_dll = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dll"));
            if is_dll && path.is_file() {
                fs::copy_file(&path, &install_dir.join(entry.file_name())).await?;
            }
        }
    }
    Ok(())
}

/// Finds the installer `makensis` wrote next to the script.
fn find_installer(package_dir: &Path) -> Result<PathBuf> {
    fs::newest_match(package_dir, "*.exe", |path| {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().to_lowercase().contains("installer"))
    })?
    .ok_or_else(|| Error::ArtifactNotFound {
        pattern: format!("{}/*installer*.exe", package_dir.display()),
    })
}
