//! NSIS installer script generation.
//!
//! Renders the NSI template with Handlebars and writes it with the UTF-8
//! BOM that `makensis` expects for Unicode scripts.

use super::{template::NSI_TEMPLATE, utils};
use crate::bundler::{error::Result, settings::Settings};
use crate::version::BuildContext;
use handlebars::Handlebars;
use serde_json::{Value, json};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Qt runtime directories produced by `windeployqt`. Included when present.
const QT_DIRS: &[&str] = &["platforms", "imageformats", "styles", "qml"];

/// Installer icon, relative to the project root.
const ICON_PATH: &str = "assets/icon.ico";

/// Renders the installer script for the staged `app_dir` (a directory name
/// next to the script).
pub fn render_nsi_script(
    settings: &Settings,
    context: &BuildContext,
    app_dir: &str,
) -> Result<String> {
    let product = settings.product();

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string("installer.nsi", NSI_TEMPLATE)?;

    let mut data: BTreeMap<&str, Value> = BTreeMap::new();
    data.insert("app_name", json!(product.name));
    data.insert("version", json!(context.version()));
    data.insert(
        "version_nsis",
        json!(utils::format_version_for_nsis(context.version())),
    );
    data.insert("publisher", json!(product.publisher));
    data.insert("homepage", json!(product.homepage));
    data.insert("description", json!(product.short_description));
    data.insert("gui_executable", json!(format!("{}.exe", product.gui_executable)));
    data.insert("app_dir", json!(app_dir));

    let license = settings.project_root().join("LICENSE");
    if license.is_file() {
        data.insert("license_file", json!(license.display().to_string()));
    }
    let icon = settings.project_root().join(ICON_PATH);
    if icon.is_file() {
        data.insert("installer_icon", json!(icon.display().to_string()));
    }

    let qt_dirs: Vec<Value> = QT_DIRS
        .iter()
        .map(|dir| {
            json!({
                "source": format!("{app_dir}\\{dir}"),
                "installed": format!("$INSTDIR\\{dir}"),
            })
        })
        .collect();
    data.insert("qt_dirs", Value::Array(qt_dirs));

    let associations: Vec<Value> = product
        .document_types
        .iter()
        .filter_map(|doc| {
            doc.extensions.first().map(|extension| {
                json!({
                    "extension": extension,
                    "prog_id": format!("{}.{}", product.name, doc.name),
                    "description": doc.description,
                })
            })
        })
        .collect();
    data.insert("associations", Value::Array(associations));

    Ok(handlebars.render("installer.nsi", &data)?)
}

/// Generates `install.nsi` inside `package_dir`.
///
/// Returns the script path.
pub async fn generate_nsi_script(
    settings: &Settings,
    context: &BuildContext,
    package_dir: &Path,
    app_dir: &str,
) -> Result<PathBuf> {
    let content = render_nsi_script(settings, context, app_dir)?;
    let nsi_path = package_dir.join("install.nsi");
    utils::write_utf8_bom(&nsi_path, &content).await?;
    Ok(nsi_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::SettingsBuilder;
    use chrono::NaiveDate;

    fn render(project_root: &Path) -> String {
        let settings = SettingsBuilder::new()
            .project_root(project_root)
            .build()
            .unwrap();
        let context = BuildContext::new(
            "1.4.0",
            "abc1234",
            NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
        );
        render_nsi_script(&settings, &context, "Unidict").unwrap()
    }

    #[test]
    fn script_carries_product_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let script = render(tmp.path());

        assert!(script.contains(r#"!define APP_NAME "Unidict""#));
        assert!(script.contains(r#"!define APP_VERSION "1.4.0""#));
        assert!(script.contains(r#"!define APP_PUBLISHER "Unidict Team""#));
        assert!(script.contains(r#"!define APP_EXECUTABLE "unidict_qml.exe""#));
        assert!(script.contains(r#"VIProductVersion "1.4.0.0""#));
        assert!(script.contains(r#"InstallDir "$PROGRAMFILES64\${APP_NAME}""#));
        assert!(script.contains(r#"OutFile "Unidict-${APP_VERSION}-installer.exe""#));
    }

    #[test]
    fn script_registers_both_dictionary_formats() {
        let tmp = tempfile::tempdir().unwrap();
        let script = render(tmp.path());

        assert!(script.contains(r#"WriteRegStr HKCR ".mdx" "" "Unidict.MDict""#));
        assert!(script.contains(r#"WriteRegStr HKCR ".ifo" "" "Unidict.StarDict""#));
        assert!(script.contains(r#"DeleteRegKey HKCR "Unidict.StarDict""#));
        assert!(script.contains(r#"File /nonfatal /r "Unidict\platforms""#));
        assert!(script.contains(r#"RMDir /r "$INSTDIR\platforms""#));
        assert!(script.contains("WriteUninstaller"));
    }

    #[test]
    fn license_page_only_when_license_exists() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!render(tmp.path()).contains("MUI_PAGE_LICENSE"));

        std::fs::write(tmp.path().join("LICENSE"), "MIT").unwrap();
        assert!(render(tmp.path()).contains("MUI_PAGE_LICENSE"));
    }
}
