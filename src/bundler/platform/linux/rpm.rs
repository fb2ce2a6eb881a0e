//! RPM package (.rpm) bundler for Red Hat-based distributions.
//!
//! Stages prebuilt files into the `SOURCES` directory of an rpmbuild tree,
//! renders a spec file that installs them from there, and runs
//! `rpmbuild -bb`. The built package is then located under
//! `RPMS/x86_64` of the same tree.

use super::freedesktop;
use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
    utils::{
        fs,
        process::{CommandRunner, argv, run_checked},
    },
};
use crate::version::BuildContext;
use handlebars::Handlebars;
use serde_json::{Value, json};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

const RPM_ARCH: &str = "x86_64";

const SPEC_TEMPLATE: &str = r#"%global debug_package %{nil}

Name: {{package_name}}
Version: {{version}}
Release: 1%{?dist}
Summary: {{summary}}
License: {{license}}
URL: {{homepage}}
{{#if build_requires}}
BuildRequires: {{build_requires}}
{{/if}}
{{#if requires}}
Requires: {{requires}}
{{/if}}

%description
{{#each description}}
{{this}}
{{/each}}

%prep

%build

%install
rm -rf %{buildroot}
mkdir -p %{buildroot}%{_bindir}
mkdir -p %{buildroot}%{_datadir}/applications
mkdir -p %{buildroot}%{_mandir}/man1
mkdir -p %{buildroot}%{_docdir}/%{name}
{{#each executables}}
install -m 755 %{_sourcedir}/{{this}} %{buildroot}%{_bindir}/
{{/each}}
install -m 644 %{_sourcedir}/{{desktop_file}} %{buildroot}%{_datadir}/applications/
{{#each man_pages}}
install -m 644 %{_sourcedir}/{{this}} %{buildroot}%{_mandir}/man1/
{{/each}}
{{#each docs}}
install -m 644 %{_sourcedir}/{{this}} %{buildroot}%{_docdir}/%{name}/
{{/each}}

%files
{{#each executables}}
%{_bindir}/{{this}}
{{/each}}
%{_datadir}/applications/{{desktop_file}}
{{#each man_pages}}
%{_mandir}/man1/{{this}}*
{{/each}}
{{#each docs}}
%doc %{_docdir}/%{name}/{{this}}
{{/each}}

%changelog
* {{changelog_date}} {{maintainer}} - {{version}}-1
- Release {{version}}
"#;

/// Files staged in `SOURCES` that the RPM spec file installs.
#[derive(Debug, Default)]
pub struct StagedSources {
    /// Installed to `/usr/bin`.
    pub executables: Vec<String>,
    /// Installed to `/usr/share/man/man1`.
    pub man_pages: Vec<String>,
    /// Listed under `%doc`.
    pub docs: Vec<String>,
}

/// RPM forbids `-` in versions; pre-release suffixes use `~` instead.
pub fn rpm_version(version: &str) -> String {
    version.replace('-', "~")
}

/// Output file name, `{pkg}-{version}-1.x86_64.rpm`.
pub fn package_file_name(package_name: &str, version: &str) -> String {
    format!("{package_name}-{version}-1.{RPM_ARCH}.rpm")
}

/// Renders the spec file for the staged sources.
pub fn render_spec(
    settings: &Settings,
    context: &BuildContext,
    sources: &StagedSources,
) -> Result<String> {
    let product = settings.product();

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string("spec", SPEC_TEMPLATE)?;

    let mut data: BTreeMap<&str, Value> = BTreeMap::new();
    data.insert("package_name", json!(product.package_name));
    data.insert("version", json!(rpm_version(context.version())));
    data.insert("summary", json!(product.short_description));
    data.insert("license", json!(product.license));
    data.insert("homepage", json!(product.homepage));
    data.insert("maintainer", json!(product.maintainer));
    data.insert("description", json!(product.long_description));
    data.insert("desktop_file", json!(freedesktop::desktop_file_name(product)));
    data.insert("executables", json!(sources.executables));
    data.insert("man_pages", json!(sources.man_pages));
    data.insert("docs", json!(sources.docs));
    data.insert(
        "changelog_date",
        json!(context.build_date().format("%a %b %d %Y").to_string()),
    );
    if !product.rpm_build_requires.is_empty() {
        data.insert("build_requires", json!(product.rpm_build_requires.join(", ")));
    }
    if !product.rpm_requires.is_empty() {
        data.insert("requires", json!(product.rpm_requires.join(", ")));
    }

    Ok(handlebars.render("spec", &data)?)
}

/// Bundle the Linux build as an RPM package.
///
/// # Process
///
/// 1. Prepare the rpmbuild tree (recreated when it lives under the staging root)
/// 2. Stage executables, desktop entry, man pages and docs into `SOURCES`
/// 3. Render `SPECS/<pkg>.spec` and run `rpmbuild -bb --target x86_64`
/// 4. Copy the newest matching package from `RPMS/x86_64` to the output directory
pub async fn bundle_project<R: CommandRunner>(
    settings: &Settings,
    context: &BuildContext,
    runner: &R,
    build_output: &Path,
    staging_dir: &Path,
) -> Result<PathBuf> {
    let product = settings.product();
    log::info!("Building RPM package for {}", product.name);

    let topdir = settings.rpm_topdir();
    let isolated = topdir.starts_with(staging_dir);
    fs::create_dir_all(topdir, isolated).await?;
    for dir in ["BUILD", "RPMS", "SOURCES", "SPECS", "SRPMS"] {
        fs::create_dir_all(&topdir.join(dir), false).await?;
    }
    let sources_dir = topdir.join("SOURCES");

    let mut sources = StagedSources::default();
    for exe in product.executables() {
        let dst = sources_dir.join(exe);
        if fs::copy_if_present(&build_output.join(exe), &dst).await? {
            fs::set_executable(&dst).await?;
            sources.executables.push(exe.to_string());
        }
    }
    for exe in product.executables() {
        let name = format!("{exe}.1");
        fs::write_file(
            &sources_dir.join(&name),
            freedesktop::man_page(product, context, exe),
        )
        .await?;
        sources.man_pages.push(name);
    }
    for doc in &product.doc_files {
        let source = settings.project_root().join(doc);
        if fs::copy_if_present(&source, &sources_dir.join(doc)).await? {
            sources.docs.push(doc.clone());
        }
    }
    fs::write_file(
        &sources_dir.join(freedesktop::desktop_file_name(product)),
        freedesktop::desktop_entry(product),
    )
    .await?;

    let spec_path = topdir
        .join("SPECS")
        .join(format!("{}.spec", product.package_name));
    fs::write_file(&spec_path, render_spec(settings, context, &sources)?).await?;

    let command = argv([
        "rpmbuild".to_string(),
        "-bb".to_string(),
        spec_path.display().to_string(),
        "--target".to_string(),
        RPM_ARCH.to_string(),
        "--define".to_string(),
        format!("_topdir {}", topdir.display()),
    ]);
    run_checked(runner, &command, settings.project_root()).await?;

    let rpms_dir = topdir.join("RPMS").join(RPM_ARCH);
    let prefix = format!("{}-", product.package_name);
    let built = fs::newest_match(&rpms_dir, "*.rpm", |path| {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with(&prefix))
    })?
    .ok_or_else(|| Error::ArtifactNotFound {
        pattern: format!("{}/{prefix}*.rpm", rpms_dir.display()),
    })?;

    let rpm_path = settings
        .dist_root()
        .join(package_file_name(&product.package_name, context.version()));
    fs::copy_file(&built, &rpm_path).await?;

    log::info!("Created RPM: {}", rpm_path.display());
    Ok(rpm_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::SettingsBuilder;
    use chrono::NaiveDate;

    fn spec(sources: &StagedSources) -> String {
        let settings = SettingsBuilder::new().project_root("/p").build().unwrap();
        let context = BuildContext::new(
            "1.2.0-rc1",
            "abc",
            NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
        );
        render_spec(&settings, &context, sources).unwrap()
    }

    #[test]
    fn spec_installs_only_staged_files() {
        let sources = StagedSources {
            executables: vec!["unidict_qml".into()],
            man_pages: vec!["unidict_qml.1".into(), "unidict_cli.1".into()],
            docs: vec!["README.md".into()],
        };
        let spec = spec(&sources);

        assert!(spec.contains("install -m 755 %{_sourcedir}/unidict_qml %{buildroot}%{_bindir}/"));
        assert!(!spec.contains("%{_sourcedir}/unidict_cli "));
        assert!(spec.contains("%{_mandir}/man1/unidict_cli.1*"));
        assert!(spec.contains("%doc %{_docdir}/%{name}/README.md"));
        assert!(spec.contains("Requires: qt6-qtbase, qt6-qtdeclarative, zlib"));
    }

    #[test]
    fn spec_version_and_changelog_formats() {
        let spec = spec(&StagedSources::default());
        assert!(spec.contains("Version: 1.2.0~rc1\n"));
        assert!(spec.contains("* Tue Nov 05 2024 Unidict Team <team@unidict.org> - 1.2.0~rc1-1"));
    }

    #[test]
    fn output_name_uses_release_one() {
        assert_eq!(package_file_name("unidict", "1.2.3"), "unidict-1.2.3-1.x86_64.rpm");
    }
}
