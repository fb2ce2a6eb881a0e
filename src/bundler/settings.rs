//! Configuration structures for packaging operations.
//!
//! [`ProductSettings`] describes what is being packaged (names, publisher,
//! executables, dependency lists). [`Settings`] adds where things live on disk
//! and is assembled with [`SettingsBuilder`]. Both can be overridden from a
//! TOML file through [`PackagingConfig`].

use crate::bundler::error::{Context, ErrorExt, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A dictionary file format the application registers itself for.
///
/// Used for Windows file associations, macOS `CFBundleDocumentTypes` and
/// the freedesktop `MimeType` key.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DocumentType {
    /// Short identifier, combined with the product name into a ProgID
    /// (e.g. `MDict` becomes `Unidict.MDict`).
    pub name: String,
    /// Human readable type name shown by file managers.
    pub description: String,
    /// MIME type advertised in the desktop entry.
    pub mime_type: String,
    /// File extensions without the leading dot. The first one is the
    /// primary extension registered on Windows.
    pub extensions: Vec<String>,
}

impl DocumentType {
    fn new(name: &str, description: &str, mime_type: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            mime_type: mime_type.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Product metadata shared by every packager.
///
/// Defaults describe the Unidict dictionary application; any field can be
/// overridden from the `[product]` table of a packaging config file.
///
/// # Examples
///
/// ```
/// use unidict_bundler::bundler::ProductSettings;
///
/// let product = ProductSettings::default();
/// assert_eq!(product.name, "Unidict");
/// assert_eq!(product.gui_executable, "unidict_qml");
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProductSettings {
    /// Display name, used in installer titles and artifact names.
    pub name: String,
    /// Lowercase package name for Debian/RPM.
    pub package_name: String,
    /// Organization shown in installers and bundle copyright.
    pub publisher: String,
    /// Project URL.
    pub homepage: String,
    /// `Name <email>` used in control files and changelogs.
    pub maintainer: String,
    /// Reverse-DNS identifier for the macOS bundle.
    pub bundle_identifier: String,
    /// One-line summary for package metadata.
    pub short_description: String,
    /// Multi-line description. Each line is kept as-is.
    pub long_description: Vec<String>,
    /// SPDX license identifier.
    pub license: String,
    /// Primary (GUI) executable name, without platform suffix.
    pub gui_executable: String,
    /// Command line executable name, without platform suffix.
    pub cli_executable: String,
    /// Configuration options passed to every CMake configure step.
    pub cmake_options: Vec<String>,
    /// `LSMinimumSystemVersion` of the app bundle.
    pub minimum_macos_version: String,
    /// File types the app opens, for `Info.plist` and NSIS associations.
    pub document_types: Vec<DocumentType>,
    /// freedesktop menu categories.
    pub categories: Vec<String>,
    /// Debian `Depends:` entries.
    pub deb_depends: Vec<String>,
    /// RPM `Requires:` entries.
    pub rpm_requires: Vec<String>,
    /// RPM `BuildRequires:` entries.
    pub rpm_build_requires: Vec<String>,
    /// Documentation files, relative to the project root.
    pub doc_files: Vec<String>,
}

impl Default for ProductSettings {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            name: "Unidict".into(),
            package_name: "unidict".into(),
            publisher: "Unidict Team".into(),
            homepage: "https://github.com/unidict/unidict".into(),
            maintainer: "Unidict Team <team@unidict.org>".into(),
            bundle_identifier: "com.unidict.app".into(),
            short_description: "Universal dictionary lookup tool".into(),
            long_description: strings(&[
                "Unidict is a powerful, cross-platform dictionary application",
                "supporting multiple formats including MDict, StarDict, DSL, and more.",
                "It features fast search, AI integration, and vocabulary management.",
            ]),
            license: "MIT".into(),
            gui_executable: "unidict_qml".into(),
            cli_executable: "unidict_cli".into(),
            cmake_options: strings(&[
                "-DCMAKE_BUILD_TYPE=Release",
                "-DUNIDICT_BUILD_QT_CORE=ON",
                "-DUNIDICT_BUILD_ADAPTER_QT=ON",
                "-DUNIDICT_BUILD_QT_APPS=ON",
                "-DUNIDICT_BUILD_QT_TESTS=OFF",
                "-DUNIDICT_BUILD_STD_CLI=ON",
            ]),
            minimum_macos_version: "10.15".into(),
            document_types: vec![
                DocumentType::new(
                    "MDict",
                    "MDict Dictionary File",
                    "application/x-mdict",
                    &["mdx", "mdd"],
                ),
                DocumentType::new(
                    "StarDict",
                    "StarDict Dictionary File",
                    "application/x-stardict",
                    &["ifo", "dict", "idx"],
                ),
            ],
            categories: strings(&["Education", "Office", "Dictionary"]),
            deb_depends: strings(&[
                "libqt6core6",
                "libqt6gui6",
                "libqt6qml6",
                "libqt6quick6",
                "libqt6network6",
                "zlib1g",
            ]),
            rpm_requires: strings(&["qt6-qtbase", "qt6-qtdeclarative", "zlib"]),
            rpm_build_requires: strings(&["cmake", "qt6-base-devel", "zlib-devel"]),
            doc_files: strings(&["README.md", "LICENSE", "CONTRIBUTING.md"]),
        }
    }
}

impl ProductSettings {
    /// Both executables, GUI first.
    pub fn executables(&self) -> [&str; 2] {
        [&self.gui_executable, &self.cli_executable]
    }
}

/// Contents of a `--config` TOML file.
///
/// ```toml
/// timeout_secs = 1800
/// rpm_use_home_topdir = true
///
/// [product]
/// publisher = "Example Org"
/// deb_depends = ["libqt6core6", "zlib1g"]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackagingConfig {
    /// Product metadata overrides.
    pub product: ProductSettings,
    /// Explicit RPM `_topdir`. Relative paths resolve against the project root.
    pub rpm_topdir: Option<PathBuf>,
    /// Use the traditional `~/rpmbuild` tree instead of an isolated one.
    pub rpm_use_home_topdir: bool,
    /// Per-command timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl PackagingConfig {
    /// Reads and parses a packaging config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).fs_context("reading packaging config", path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Where the RPM build tree lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RpmTopDir {
    /// `<staging>/linux/rpmbuild`, recreated on every run.
    Isolated,
    /// `~/rpmbuild`, shared with other rpmbuild invocations.
    Home,
    /// A user-provided directory.
    Custom(PathBuf),
}

/// Resolved packaging settings.
///
/// Immutable once built; every component receives it by reference.
#[derive(Clone, Debug)]
pub struct Settings {
    project_root: PathBuf,
    build_root: PathBuf,
    staging_root: PathBuf,
    dist_root: PathBuf,
    rpm_topdir: PathBuf,
    product: ProductSettings,
    command_timeout: Option<Duration>,
}

impl Settings {
    /// Source tree root. Native builds are configured from here.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Parent of the per-platform build directories.
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Parent of all packager staging trees.
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Output directory for final artifacts.
    pub fn dist_root(&self) -> &Path {
        &self.dist_root
    }

    /// RPM `_topdir` resolved from [`RpmTopDir`].
    pub fn rpm_topdir(&self) -> &Path {
        &self.rpm_topdir
    }

    /// Product metadata.
    pub fn product(&self) -> &ProductSettings {
        &self.product
    }

    /// Per-command timeout, if any.
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout
    }

    /// Isolated per-platform build directory, `<build_root>/build-<platform>`.
    pub fn platform_build_dir(&self, platform: crate::bundler::Platform) -> PathBuf {
        self.build_root.join(format!("build-{platform}"))
    }

    /// Staging directory owned by one platform's packagers.
    pub fn platform_staging_dir(&self, platform: crate::bundler::Platform) -> PathBuf {
        self.staging_root.join(platform.to_string())
    }
}

/// Builder for [`Settings`].
///
/// Only the project root is required; every other directory defaults to a
/// location underneath it.
///
/// # Examples
///
/// ```
/// use unidict_bundler::bundler::SettingsBuilder;
///
/// let settings = SettingsBuilder::new()
///     .project_root("/src/unidict")
///     .build()
///     .unwrap();
/// assert!(settings.dist_root().ends_with("dist"));
/// assert!(settings.staging_root().ends_with("build/packages"));
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_root: Option<PathBuf>,
    build_root: Option<PathBuf>,
    staging_root: Option<PathBuf>,
    dist_root: Option<PathBuf>,
    rpm_topdir: Option<RpmTopDir>,
    product: ProductSettings,
    command_timeout: Option<Duration>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Default: `<project>/build`
    pub fn build_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Default: `<build_root>/packages`
    pub fn staging_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.staging_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Default: `<project>/dist`
    pub fn dist_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Default: [`RpmTopDir::Isolated`]
    pub fn rpm_topdir(mut self, topdir: RpmTopDir) -> Self {
        self.rpm_topdir = Some(topdir);
        self
    }

    /// Sets product metadata.
    ///
    /// Default: [`ProductSettings::default`]
    pub fn product(mut self, product: ProductSettings) -> Self {
        self.product = product;
        self
    }

    /// Sets the per-command timeout.
    ///
    /// Default: None (commands may run indefinitely)
    pub fn command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Applies the overrides from a parsed config file.
    pub fn config(mut self, config: PackagingConfig) -> Self {
        self.product = config.product;
        if let Some(dir) = config.rpm_topdir {
            self.rpm_topdir = Some(RpmTopDir::Custom(dir));
        } else if config.rpm_use_home_topdir {
            self.rpm_topdir = Some(RpmTopDir::Home);
        }
        if let Some(secs) = config.timeout_secs {
            self.command_timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `project_root` is missing, or if the home
    /// directory is requested for the RPM tree but cannot be determined.
    pub fn build(self) -> Result<Settings> {
        let project_root = self.project_root.context("project_root is required")?;
        let build_root = self
            .build_root
            .unwrap_or_else(|| project_root.join("build"));
        let staging_root = self
            .staging_root
            .unwrap_or_else(|| build_root.join("packages"));
        let dist_root = self.dist_root.unwrap_or_else(|| project_root.join("dist"));

        let rpm_topdir = match self.rpm_topdir.unwrap_or(RpmTopDir::Isolated) {
            RpmTopDir::Isolated => staging_root.join("linux").join("rpmbuild"),
            RpmTopDir::Home => dirs::home_dir()
                .context("could not determine home directory for ~/rpmbuild")?
                .join("rpmbuild"),
            RpmTopDir::Custom(dir) if dir.is_relative() => project_root.join(dir),
            RpmTopDir::Custom(dir) => dir,
        };

        Ok(Settings {
            project_root,
            build_root,
            staging_root,
            dist_root,
            rpm_topdir,
            product: self.product,
            command_timeout: self.command_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_project_root() {
        let err = SettingsBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("project_root"));
    }

    #[test]
    fn default_layout_is_under_project_root() {
        let settings = SettingsBuilder::new().project_root("/p").build().unwrap();
        assert_eq!(settings.build_root(), Path::new("/p/build"));
        assert_eq!(settings.staging_root(), Path::new("/p/build/packages"));
        assert_eq!(settings.dist_root(), Path::new("/p/dist"));
        assert_eq!(
            settings.rpm_topdir(),
            Path::new("/p/build/packages/linux/rpmbuild")
        );
        assert_eq!(settings.command_timeout(), None);
    }

    #[test]
    fn config_overrides_product_fields() {
        let config: PackagingConfig = toml::from_str(
            r#"
            timeout_secs = 30
            rpm_topdir = "out/rpm"

            [product]
            publisher = "Example Org"
            deb_depends = ["zlib1g"]
            "#,
        )
        .unwrap();

        let settings = SettingsBuilder::new()
            .project_root("/p")
            .config(config)
            .build()
            .unwrap();

        assert_eq!(settings.product().publisher, "Example Org");
        assert_eq!(settings.product().deb_depends, vec!["zlib1g".to_string()]);
        // untouched fields keep their defaults
        assert_eq!(settings.product().name, "Unidict");
        assert_eq!(settings.rpm_topdir(), Path::new("/p/out/rpm"));
        assert_eq!(settings.command_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn default_document_types_cover_both_formats() {
        let product = ProductSettings::default();
        let extensions: Vec<_> = product
            .document_types
            .iter()
            .map(|d| d.extensions[0].as_str())
            .collect();
        assert_eq!(extensions, ["mdx", "ifo"]);
    }
}
