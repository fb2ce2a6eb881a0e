//! Artifact enumeration, checksum listing and the `build-info.json` manifest.

use crate::bundler::{
    checksum,
    error::{ErrorExt, Result},
    platform::{PackageType, Platform},
    report::Artifact,
    utils::fs,
};
use crate::version::BuildContext;
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};
use walkdir::WalkDir;

/// Name of the structured manifest written to the output directory.
pub const BUILD_INFO_FILE: &str = "build-info.json";

/// Structured record of one run's outputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildManifest {
    /// Resolved release version.
    pub version: String,
    /// Abbreviated commit hash, or `unknown`.
    pub revision: String,
    /// `YYYYMMDD`
    pub build_date: String,
    /// Platforms requested for the run.
    pub platforms: Vec<Platform>,
    /// Package types requested for the run.
    pub package_types: Vec<PackageType>,
    /// File name to lowercase hex SHA-256.
    pub checksums: BTreeMap<String, String>,
}

/// Name of the checksum listing, `checksums-{version}.txt`.
pub fn checksum_file_name(version: &str) -> String {
    format!("checksums-{version}.txt")
}

/// Lists the regular files directly inside `dir`, sorted by name.
///
/// Subdirectories and symlinks are ignored. A missing directory yields an
/// empty list.
pub fn scan_artifacts(dir: &Path) -> Result<Vec<Artifact>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut artifacts = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let size_bytes = entry.metadata()?.len();
        artifacts.push(Artifact {
            path: entry.into_path(),
            size_bytes,
        });
    }
    Ok(artifacts)
}

/// Computes checksums over the output directory and writes the manifest.
pub struct ArtifactManifestBuilder<'a> {
    context: &'a BuildContext,
    platforms: &'a [Platform],
    package_types: &'a [PackageType],
}

impl<'a> ArtifactManifestBuilder<'a> {
    /// A builder recording the run's context and selection.
    pub fn new(
        context: &'a BuildContext,
        platforms: &'a [Platform],
        package_types: &'a [PackageType],
    ) -> Self {
        Self {
            context,
            platforms,
            package_types,
        }
    }

    /// Hashes every regular file in `output_dir`, then writes
    /// `checksums-{version}.txt` and `build-info.json` next to them.
    ///
    /// The file set is fixed before either document is written, so the
    /// documents produced by this call are not part of its own checksums.
    pub async fn finalize(&self, output_dir: &Path) -> Result<BuildManifest> {
        log::info!("Creating checksums in {}", output_dir.display());

        let mut checksums = BTreeMap::new();
        for artifact in scan_artifacts(output_dir)? {
            let digest = checksum::calculate_sha256(&artifact.path).await?;
            log::info!("  {}: {digest}", artifact.file_name());
            checksums.insert(artifact.file_name(), digest);
        }

        let listing_path = output_dir.join(checksum_file_name(self.context.version()));
        fs::write_file(&listing_path, checksum::render_listing(&checksums)).await?;

        let manifest = BuildManifest {
            version: self.context.version().to_string(),
            revision: self.context.revision().to_string(),
            build_date: self.context.build_date_compact(),
            platforms: self.platforms.to_vec(),
            package_types: self.package_types.to_vec(),
            checksums,
        };

        let info_path = output_dir.join(BUILD_INFO_FILE);
        let json = serde_json::to_string_pretty(&manifest)?;
        tokio::fs::write(&info_path, json)
            .await
            .fs_context("writing build info", &info_path)?;

        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_ignores_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("b.deb"), vec![0u8; 20]).unwrap();
        std::fs::write(tmp.path().join("a.rpm"), vec![0u8; 10]).unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("nested/c.txt"), "x").unwrap();

        let artifacts = scan_artifacts(tmp.path()).unwrap();
        let names: Vec<_> = artifacts.iter().map(Artifact::file_name).collect();
        assert_eq!(names, ["a.rpm", "b.deb"]);
        assert_eq!(artifacts[0].size_bytes, 10);
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(scan_artifacts(&tmp.path().join("dist")).unwrap().is_empty());
    }
}
