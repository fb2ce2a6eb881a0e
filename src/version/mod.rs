//! Release version and revision resolution.
//!
//! The version comes from the most recent git tag unless one is given
//! explicitly; the revision is the abbreviated `HEAD` hash. Neither lookup
//! can fail the run: missing git, a non-repository or an untagged history
//! fall back to `"latest"` and `"unknown"`.

use crate::bundler::utils::process::{CommandRunner, argv};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Version used when no tag can be read.
pub const FALLBACK_VERSION: &str = "latest";

/// Revision used when `HEAD` cannot be read.
pub const FALLBACK_REVISION: &str = "unknown";

/// Replaces `/` and `\` with `-`.
///
/// The version is spliced into artifact file names, so a tag such as
/// `release/1.0` must not turn into a subdirectory of the output root.
pub fn sanitize_version(version: &str) -> String {
    version.replace(['/', '\\'], "-")
}

/// Immutable facts about one packaging run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildContext {
    version: String,
    revision: String,
    build_date: NaiveDate,
}

impl BuildContext {
    /// A context from already-resolved values.
    pub fn new(
        version: impl Into<String>,
        revision: impl Into<String>,
        build_date: NaiveDate,
    ) -> Self {
        Self {
            version: version.into(),
            revision: revision.into(),
            build_date,
        }
    }

    /// Release version used in artifact names.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Abbreviated commit hash.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Local date the run started.
    pub fn build_date(&self) -> NaiveDate {
        self.build_date
    }

    /// Build date as `YYYYMMDD`.
    pub fn build_date_compact(&self) -> String {
        self.build_date.format("%Y%m%d").to_string()
    }
}

/// Queries git for the release version and revision.
pub struct VersionResolver<'a, R> {
    runner: &'a R,
    repo_root: PathBuf,
}

impl<'a, R: CommandRunner> VersionResolver<'a, R> {
    /// A resolver running git inside `repo_root`.
    pub fn new(runner: &'a R, repo_root: impl AsRef<Path>) -> Self {
        Self {
            runner,
            repo_root: repo_root.as_ref().to_path_buf(),
        }
    }

    /// Returns `(version, revision)`.
    ///
    /// A non-blank `explicit_override` is used verbatim as the version. The
    /// revision is always looked up.
    pub async fn resolve(&self, explicit_override: Option<&str>) -> (String, String) {
        let raw = match explicit_override.filter(|v| !v.trim().is_empty()) {
            Some(version) => version.to_string(),
            None => self
                .query(&["git", "describe", "--tags", "--abbrev=0"])
                .await
                .unwrap_or_else(|| {
                    log::warn!("No release tag found, using version \"{FALLBACK_VERSION}\"");
                    FALLBACK_VERSION.to_string()
                }),
        };
        let version = sanitize_version(&raw);
        if version != raw {
            log::warn!("Version \"{raw}\" contains path separators, using \"{version}\"");
        }

        let revision = self
            .query(&["git", "rev-parse", "--short", "HEAD"])
            .await
            .unwrap_or_else(|| FALLBACK_REVISION.to_string());

        (version, revision)
    }

    /// Resolves and stamps today's date.
    pub async fn context(&self, explicit_override: Option<&str>) -> BuildContext {
        let (version, revision) = self.resolve(explicit_override).await;
        BuildContext::new(version, revision, Local::now().date_naive())
    }

    async fn query(&self, command: &[&str]) -> Option<String> {
        let result = self.runner.run(&argv(command.iter().copied()), &self.repo_root).await;
        if !result.succeeded {
            return None;
        }
        let value = result.stdout.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}
