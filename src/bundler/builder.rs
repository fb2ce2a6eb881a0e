//! Packaging run orchestration.
//!
//! The [`Bundler`] drives the requested platform × package-type matrix:
//!
//! 1. Prepares the build, staging and output directories (optionally cleaning)
//! 2. Resolves the [`BuildContext`] once
//! 3. For each platform, runs the native build and, if it succeeded, the
//!    platform's packagers
//! 4. Writes checksums and `build-info.json` when nothing failed
//! 5. Lists the artifacts left in the output directory
//!
//! Every step is awaited in turn; a failure is recorded and the run moves on.
//!
//! # Example
//!
//! ```no_run
//! use unidict_bundler::bundler::{BundleRequest, Bundler, SettingsBuilder, SystemRunner};
//!
//! # async fn example() -> unidict_bundler::bundler::Result<()> {
//! let settings = SettingsBuilder::new().project_root(".").build()?;
//! let bundler = Bundler::new(settings, SystemRunner::new());
//!
//! let report = bundler.bundle(&BundleRequest::default()).await?;
//! for artifact in report.artifacts() {
//!     println!("{} ({} bytes)", artifact.file_name(), artifact.size_bytes);
//! }
//! # Ok(())
//! # }
//! ```

use crate::bundler::{
    Result, Settings,
    compile::PlatformBuilder,
    manifest::{self, ArtifactManifestBuilder},
    platform::{self, PackageType, Platform},
    report::{BundleReport, Stage, StepOutcome, StepRecord},
    utils::{fs, process::CommandRunner},
};
use crate::version::{BuildContext, VersionResolver};

const BUILD_FAILED: &str = "build failed";
const PORTABLE_NOT_PRODUCED: &str = "portable packages are not produced";

/// What a run should do.
#[derive(Clone, Debug)]
pub struct BundleRequest {
    /// Platforms to build, in order.
    pub platforms: Vec<Platform>,
    /// Package types to produce for each platform.
    pub package_types: Vec<PackageType>,
    /// Explicit version, taking precedence over the git tag.
    pub version: Option<String>,
    /// Remove build and staging directories before building.
    pub clean: bool,
}

impl Default for BundleRequest {
    fn default() -> Self {
        Self {
            platforms: Platform::all(),
            package_types: PackageType::all(),
            version: None,
            clean: false,
        }
    }
}

/// Main packaging orchestrator.
pub struct Bundler<R> {
    settings: Settings,
    runner: R,
}

impl<R> std::fmt::Debug for Bundler<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> Bundler<R> {
    /// A bundler running external tools through `runner`.
    pub fn new(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Settings the bundler was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Prepares directories, resolves the version and runs every step.
    ///
    /// Only directory preparation can return an error; step failures are
    /// reported in the [`BundleReport`].
    pub async fn bundle(&self, request: &BundleRequest) -> Result<BundleReport> {
        self.prepare(request.clean).await?;
        let context = self.resolve_context(request.version.as_deref()).await;
        log::info!(
            "Packaging version {} (revision {}, {})",
            context.version(),
            context.revision(),
            context.build_date_compact()
        );
        Ok(self
            .run(&context, &request.platforms, &request.package_types)
            .await)
    }

    /// Creates the build, staging and output roots. With `clean`, the build
    /// and staging roots are removed first so they start out empty.
    pub async fn prepare(&self, clean: bool) -> Result<()> {
        if clean {
            log::info!("Cleaning build directories");
            fs::remove_dir_all(self.settings.build_root()).await?;
            fs::remove_dir_all(self.settings.staging_root()).await?;
        }
        for dir in [
            self.settings.build_root(),
            self.settings.staging_root(),
            self.settings.dist_root(),
        ] {
            fs::create_dir_all(dir, false).await?;
        }
        Ok(())
    }

    /// Resolves version and revision and stamps today's date.
    pub async fn resolve_context(&self, version_override: Option<&str>) -> BuildContext {
        VersionResolver::new(&self.runner, self.settings.project_root())
            .context(version_override)
            .await
    }

    /// Builds and packages each platform in order, then finalizes the manifest.
    pub async fn run(
        &self,
        context: &BuildContext,
        platforms: &[Platform],
        package_types: &[PackageType],
    ) -> BundleReport {
        let platforms = dedup(platforms);
        let package_types = dedup(package_types);
        let mut report = BundleReport::new();
        let builder = PlatformBuilder::new(&self.settings, &self.runner);

        for &platform in &platforms {
            let built = builder.build(platform).await;
            let build_ok = built.is_ok();
            report.push(StepRecord::new(
                platform,
                Stage::Build,
                StepOutcome::from_result(built),
            ));

            for package_type in &package_types {
                match (package_type, build_ok) {
                    (PackageType::Installer, true) => {
                        let records =
                            platform::package(platform, &self.settings, context, &self.runner)
                                .await;
                        report.extend(records);
                    }
                    (PackageType::Installer, false) => {
                        report.extend(platform.installer_stages().iter().map(|stage| {
                            StepRecord::new(platform, *stage, StepOutcome::skipped(BUILD_FAILED))
                        }));
                    }
                    (PackageType::Portable, true) => report.push(StepRecord::new(
                        platform,
                        Stage::Portable,
                        StepOutcome::skipped(PORTABLE_NOT_PRODUCED),
                    )),
                    (PackageType::Portable, false) => report.push(StepRecord::new(
                        platform,
                        Stage::Portable,
                        StepOutcome::skipped(BUILD_FAILED),
                    )),
                }
            }
        }

        let dist_root = self.settings.dist_root();
        if report.succeeded() && dist_root.is_dir() {
            let result = ArtifactManifestBuilder::new(context, &platforms, &package_types)
                .finalize(dist_root)
                .await;
            match result {
                Ok(manifest) => {
                    report.push(StepRecord::global(Stage::Manifest, StepOutcome::Succeeded));
                    report.set_manifest(manifest);
                }
                Err(err) => report.push(StepRecord::global(
                    Stage::Manifest,
                    StepOutcome::from_result::<()>(Err(err)),
                )),
            }
        } else if !report.succeeded() {
            log::warn!("Skipping checksums and build info because a step failed");
        }

        match manifest::scan_artifacts(dist_root) {
            Ok(artifacts) => report.set_artifacts(artifacts),
            Err(err) => log::warn!("Could not list {}: {err}", dist_root.display()),
        }

        report
    }
}

/// Removes repeats, keeping first occurrences in order.
fn dedup<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(*item);
        }
    }
    unique
}
