//! Per-step outcome records collected over one packaging run.

use crate::bundler::{error::Result, manifest::BuildManifest, platform::Platform};
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// One unit of work in a run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// CMake configure and compile.
    Build,
    /// Windows NSIS installer.
    Nsis,
    /// macOS disk image.
    Dmg,
    /// Linux AppImage.
    AppImage,
    /// Debian package.
    Deb,
    /// RPM package.
    Rpm,
    /// Portable archive (never produced).
    Portable,
    /// Checksum listing and `build-info.json`.
    Manifest,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Build => "build",
            Stage::Nsis => "nsis",
            Stage::Dmg => "dmg",
            Stage::AppImage => "appimage",
            Stage::Deb => "deb",
            Stage::Rpm => "rpm",
            Stage::Portable => "portable",
            Stage::Manifest => "manifest",
        })
    }
}

/// How a step ended.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    /// The step completed.
    Succeeded,
    /// The step ran and failed.
    Failed {
        /// Error text.
        reason: String,
    },
    /// The step was not attempted.
    Skipped {
        /// Why it was not attempted.
        reason: String,
    },
}

impl StepOutcome {
    /// A [`StepOutcome::Failed`] with `reason`.
    pub fn failed(reason: impl Into<String>) -> Self {
        StepOutcome::Failed {
            reason: reason.into(),
        }
    }

    /// A [`StepOutcome::Skipped`] with `reason`.
    pub fn skipped(reason: impl Into<String>) -> Self {
        StepOutcome::Skipped {
            reason: reason.into(),
        }
    }

    /// Collapses a packager result into an outcome, keeping the error text.
    pub fn from_result<T>(result: Result<T>) -> Self {
        match result {
            Ok(_) => StepOutcome::Succeeded,
            Err(err) => {
                log::error!("{err}");
                StepOutcome::failed(err.to_string())
            }
        }
    }

    /// True for [`StepOutcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Succeeded => f.write_str("ok"),
            StepOutcome::Failed { reason } => write!(f, "failed: {reason}"),
            StepOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

/// `{platform, stage, outcome}`. The manifest step has no platform.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StepRecord {
    /// `None` for run-wide steps.
    pub platform: Option<Platform>,
    /// Which step.
    pub stage: Stage,
    /// How it ended.
    pub outcome: StepOutcome,
}

impl StepRecord {
    /// A record for `stage` on `platform`.
    pub fn new(platform: Platform, stage: Stage, outcome: StepOutcome) -> Self {
        Self {
            platform: Some(platform),
            stage,
            outcome,
        }
    }

    /// A record for a step that is not tied to one platform.
    pub fn global(stage: Stage, outcome: StepOutcome) -> Self {
        Self {
            platform: None,
            stage,
            outcome,
        }
    }
}

/// A regular file found in the output directory after the run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    /// Absolute path inside the output directory.
    pub path: PathBuf,
    /// File size at scan time.
    pub size_bytes: u64,
}

impl Artifact {
    /// File name component, lossily converted.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Everything a run produced: step records, the manifest (if written) and
/// the artifacts found in the output directory.
#[derive(Debug, Default)]
pub struct BundleReport {
    records: Vec<StepRecord>,
    manifest: Option<BuildManifest>,
    artifacts: Vec<Artifact>,
}

impl BundleReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and logs its outcome.
    pub fn push(&mut self, record: StepRecord) {
        log::info!(
            "{}{}: {}",
            record
                .platform
                .map(|p| format!("{p}/"))
                .unwrap_or_default(),
            record.stage,
            record.outcome
        );
        self.records.push(record);
    }

    /// Appends every record in order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = StepRecord>) {
        for record in records {
            self.push(record);
        }
    }

    /// All records, in execution order.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// True when no step failed. Skipped steps do not count as failures.
    pub fn succeeded(&self) -> bool {
        !self.records.iter().any(|r| r.outcome.is_failed())
    }

    /// Records whose outcome is a failure.
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter().filter(|r| r.outcome.is_failed())
    }

    /// Outcome of `stage` on `platform`, if it was recorded.
    pub fn outcome(&self, platform: Option<Platform>, stage: Stage) -> Option<&StepOutcome> {
        self.records
            .iter()
            .find(|r| r.platform == platform && r.stage == stage)
            .map(|r| &r.outcome)
    }

    /// The manifest, when checksums were written.
    pub fn manifest(&self) -> Option<&BuildManifest> {
        self.manifest.as_ref()
    }

    pub(crate) fn set_manifest(&mut self, manifest: BuildManifest) {
        self.manifest = Some(manifest);
    }

    /// Files found in the output directory at the end of the run.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub(crate) fn set_artifacts(&mut self, artifacts: Vec<Artifact>) {
        self.artifacts = artifacts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::Error;

    #[test]
    fn skipped_steps_do_not_fail_the_run() {
        let mut report = BundleReport::new();
        report.push(StepRecord::new(
            Platform::Linux,
            Stage::Portable,
            StepOutcome::skipped("not produced"),
        ));
        report.push(StepRecord::new(Platform::Linux, Stage::Build, StepOutcome::Succeeded));
        assert!(report.succeeded());

        report.push(StepRecord::new(
            Platform::Linux,
            Stage::Rpm,
            StepOutcome::failed("rpmbuild exited 1"),
        ));
        assert!(!report.succeeded());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn from_result_keeps_error_text() {
        let outcome = StepOutcome::from_result::<()>(Err(Error::ArtifactNotFound {
            pattern: "*.rpm".into(),
        }));
        assert_eq!(
            outcome,
            StepOutcome::failed("no file matching *.rpm was produced")
        );
    }

    #[test]
    fn outcome_lookup_distinguishes_platforms() {
        let mut report = BundleReport::new();
        report.push(StepRecord::new(Platform::Windows, Stage::Build, StepOutcome::failed("x")));
        report.push(StepRecord::new(Platform::Macos, Stage::Build, StepOutcome::Succeeded));
        assert_eq!(
            report.outcome(Some(Platform::Macos), Stage::Build),
            Some(&StepOutcome::Succeeded)
        );
        assert!(report.outcome(None, Stage::Manifest).is_none());
    }
}
