//! Command line interface for unidict_bundler.
//!
//! A thin shell over [`crate::bundler`]: parses arguments, assembles
//! [`Settings`](crate::bundler::Settings), runs the [`Bundler`] and prints
//! the report.

mod args;
mod output;

pub use args::{Args, DETAILED_HELP, PlatformChoice, TypeChoice};
pub use output::OutputManager;

use crate::bundler::{
    BundleRequest, Bundler, PackageType, PackagingConfig, SettingsBuilder, SystemRunner,
};
use crate::error::Result;
use std::time::Duration;

/// Main CLI entry point. Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(args).await
}

/// Runs a packaging session for already-parsed arguments.
pub async fn execute(args: Args) -> Result<i32> {
    let output = OutputManager::new();

    if args.help_detailed {
        output.println(DETAILED_HELP)?;
        return Ok(0);
    }
    args.validate()?;

    let project_root = std::fs::canonicalize(&args.project_root)?;
    let mut builder = SettingsBuilder::new().project_root(&project_root);
    if let Some(path) = &args.config {
        builder = builder.config(PackagingConfig::load(path)?);
    }
    if let Some(secs) = args.timeout {
        builder = builder.command_timeout(Some(Duration::from_secs(secs)));
    }
    let settings = builder.build()?;

    let request = BundleRequest {
        platforms: args.platform.platforms(),
        package_types: args.package_type.package_types(),
        version: args.version.clone(),
        clean: args.clean,
    };

    output.section(&format!("{} Package Builder", settings.product().name))?;
    output.indent(&format!("Project root: {}", settings.project_root().display()))?;
    output.indent(&format!("Output:       {}", settings.dist_root().display()))?;
    output.indent(&format!(
        "Platforms:    {}",
        join(request.platforms.iter().map(ToString::to_string))
    ))?;
    output.indent(&format!(
        "Types:        {}",
        join(request.package_types.iter().map(ToString::to_string))
    ))?;
    if request.package_types.contains(&PackageType::Portable) {
        output.warn("Portable packages are not produced yet; only installers will be built")?;
    }

    let runner = SystemRunner::with_timeout(settings.command_timeout());
    let bundler = Bundler::new(settings, runner);
    let report = bundler.bundle(&request).await?;

    output.report(&report)?;
    Ok(if report.succeeded() { 0 } else { 1 })
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
