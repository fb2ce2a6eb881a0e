//! Debian package (.deb) bundler.
//!
//! Lays out the package tree (`DEBIAN/control`, binaries, desktop entry,
//! man pages, docs) and hands it to `dpkg-deb --build`.

use super::freedesktop;
use crate::bundler::{
    error::Result,
    settings::{ProductSettings, Settings},
    utils::{
        fs,
        process::{CommandRunner, argv, run_checked},
    },
};
use crate::version::BuildContext;
use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

/// Staging directory name, `{pkg}_{version with dots as underscores}_amd64`.
pub fn staging_dir_name(product: &ProductSettings, version: &str) -> String {
    format!(
        "{}_{}_amd64",
        product.package_name,
        version.replace('.', "_")
    )
}

/// Output file name, `{pkg}_{version}_amd64.deb`. Dots are kept.
pub fn package_file_name(product: &ProductSettings, version: &str) -> String {
    format!("{}_{}_amd64.deb", product.package_name, version)
}

/// Renders `DEBIAN/control`.
///
/// Long description lines are indented by one space; empty lines become ` .`.
pub fn control_file(product: &ProductSettings, context: &BuildContext) -> String {
    let mut control = String::new();
    let _ = writeln!(control, "Package: {}", product.package_name);
    let _ = writeln!(control, "Version: {}", context.version());
    let _ = writeln!(control, "Section: utils");
    let _ = writeln!(control, "Priority: optional");
    let _ = writeln!(control, "Architecture: amd64");
    if !product.deb_depends.is_empty() {
        let _ = writeln!(control, "Depends: {}", product.deb_depends.join(", "));
    }
    let _ = writeln!(control, "Maintainer: {}", product.maintainer);
    let _ = writeln!(control, "Description: {}", product.short_description);
    for line in &product.long_description {
        let line = line.trim();
        if line.is_empty() {
            let _ = writeln!(control, " .");
        } else {
            let _ = writeln!(control, " {line}");
        }
    }
    let _ = writeln!(control, "Homepage: {}", product.homepage);
    control
}

/// Bundle the Linux build as a Debian package.
pub async fn bundle_project<R: CommandRunner>(
    settings: &Settings,
    context: &BuildContext,
    runner: &R,
    build_output: &Path,
    staging_dir: &Path,
) -> Result<PathBuf> {
    let product = settings.product();
    log::info!("Building DEB package for {}", product.name);

    let package_dir = staging_dir
        .join("deb")
        .join(staging_dir_name(product, context.version()));
    fs::create_dir_all(&package_dir, true).await?;

    let bin_dir = package_dir.join("usr/bin");
    let applications_dir = package_dir.join("usr/share/applications");
    let doc_dir = package_dir.join("usr/share/doc").join(&product.package_name);
    let man_dir = package_dir.join("usr/share/man/man1");
    for dir in [
        &package_dir.join("DEBIAN"),
        &bin_dir,
        &applications_dir,
        &doc_dir,
        &man_dir,
    ] {
        fs::create_dir_all(dir, false).await?;
    }

    for exe in product.executables() {
        let dst = bin_dir.join(exe);
        if fs::copy_if_present(&build_output.join(exe), &dst).await? {
            fs::set_executable(&dst).await?;
        }
    }

    fs::write_file(
        &package_dir.join("DEBIAN/control"),
        control_file(product, context),
    )
    .await?;

    for exe in product.executables() {
        fs::write_file(
            &man_dir.join(format!("{exe}.1")),
            freedesktop::man_page(product, context, exe),
        )
        .await?;
    }

    for doc in &product.doc_files {
        fs::copy_if_present(&settings.project_root().join(doc), &doc_dir.join(doc)).await?;
    }

    fs::write_file(
        &applications_dir.join(freedesktop::desktop_file_name(product)),
        freedesktop::desktop_entry(product),
    )
    .await?;

    let deb_path = settings
        .dist_root()
        .join(package_file_name(product, context.version()));
    fs::create_dir_all(settings.dist_root(), false).await?;

    let command = argv([
        "dpkg-deb".to_string(),
        "--build".to_string(),
        package_dir.display().to_string(),
        deb_path.display().to_string(),
    ]);
    run_checked(runner, &command, settings.project_root()).await?;

    log::info!("Created DEB: {}", deb_path.display());
    Ok(deb_path)
}
