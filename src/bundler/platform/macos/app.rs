//! macOS application bundle (.app) creation.

use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
    utils::fs,
};
use crate::version::BuildContext;
use plist::{Dictionary, Value};
use std::path::{Path, PathBuf};

/// Icon file name inside `Contents/Resources`.
const ICON_FILE: &str = "AppIcon.icns";

/// Icon source, relative to the project root.
const ICON_SOURCE: &str = "assets/icon.icns";

/// Creates `<package_dir>/<App>.app` from the build output.
///
/// Missing executables and a missing icon are skipped. Returns the bundle path.
pub async fn create_app_bundle(
    settings: &Settings,
    context: &BuildContext,
    build_output: &Path,
    package_dir: &Path,
) -> Result<PathBuf> {
    let product = settings.product();
    let app_bundle_path = package_dir.join(format!("{}.app", product.name));
    log::info!("Bundling {}", app_bundle_path.display());

    let contents_dir = app_bundle_path.join("Contents");
    let macos_dir = contents_dir.join("MacOS");
    let resources_dir = contents_dir.join("Resources");
    for dir in [&macos_dir, &resources_dir, &contents_dir.join("Frameworks")] {
        fs::create_dir_all(dir, false).await?;
    }

    for exe in product.executables() {
        let dst = macos_dir.join(exe);
        if fs::copy_if_present(&build_output.join(exe), &dst).await? {
            fs::set_executable(&dst).await?;
            log::info!("Copied {exe}");
        }
    }

    write_info_plist(&contents_dir.join("Info.plist"), settings, context)?;

    fs::copy_if_present(
        &settings.project_root().join(ICON_SOURCE),
        &resources_dir.join(ICON_FILE),
    )
    .await?;

    Ok(app_bundle_path)
}

/// Builds the `Info.plist` dictionary for the bundle.
pub fn info_plist(settings: &Settings, context: &BuildContext) -> Dictionary {
    let product = settings.product();
    let mut dict = Dictionary::new();

    dict.insert("CFBundleDisplayName".into(), product.name.clone().into());
    dict.insert("CFBundleExecutable".into(), product.gui_executable.clone().into());
    dict.insert("CFBundleIconFile".into(), ICON_FILE.into());
    dict.insert(
        "CFBundleIdentifier".into(),
        product.bundle_identifier.clone().into(),
    );
    dict.insert("CFBundleInfoDictionaryVersion".into(), "6.0".into());
    dict.insert("CFBundleName".into(), product.name.clone().into());
    dict.insert("CFBundlePackageType".into(), "APPL".into());
    dict.insert(
        "CFBundleShortVersionString".into(),
        context.version().into(),
    );
    dict.insert("CFBundleVersion".into(), context.version().into());
    dict.insert(
        "LSMinimumSystemVersion".into(),
        product.minimum_macos_version.clone().into(),
    );
    dict.insert("NSHighResolutionCapable".into(), true.into());
    dict.insert("NSSupportsAutomaticGraphicsSwitching".into(), true.into());

    let document_types: Vec<Value> = product
        .document_types
        .iter()
        .map(|doc| {
            let mut entry = Dictionary::new();
            entry.insert(
                "CFBundleTypeExtensions".into(),
                Value::Array(doc.extensions.iter().cloned().map(Value::from).collect()),
            );
            entry.insert("CFBundleTypeName".into(), doc.description.clone().into());
            entry.insert("CFBundleTypeRole".into(), "Viewer".into());
            entry.insert("LSHandlerRank".into(), "Alternate".into());
            Value::Dictionary(entry)
        })
        .collect();
    dict.insert("CFBundleDocumentTypes".into(), Value::Array(document_types));

    dict
}

fn write_info_plist(path: &Path, settings: &Settings, context: &BuildContext) -> Result<()> {
    Value::Dictionary(info_plist(settings, context))
        .to_file_xml(path)
        .map_err(Error::Plist)
}
