//! Native (CMake) build invocation per target platform.

use crate::bundler::{
    error::Result,
    platform::Platform,
    settings::Settings,
    utils::{
        fs,
        process::{CommandRunner, run_checked},
    },
};
use std::path::Path;

/// Relative path of the vcpkg toolchain file used for Windows builds.
const VCPKG_TOOLCHAIN: &str = "vcpkg/scripts/buildsystems/vcpkg.cmake";

/// Platform-specific configure flags appended after the base options.
///
/// `project_root` anchors the vcpkg toolchain file so the flag does not
/// depend on the build directory.
pub fn platform_options(platform: Platform, project_root: &Path) -> Vec<String> {
    match platform {
        Platform::Windows => vec![
            "-G".into(),
            "Visual Studio 17 2022".into(),
            format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                project_root.join(VCPKG_TOOLCHAIN).display()
            ),
            "-DVCPKG_TARGET_TRIPLET=x64-windows".into(),
        ],
        Platform::Macos => vec![
            "-DCMAKE_OSX_DEPLOYMENT_TARGET=10.15".into(),
            "-DCMAKE_PREFIX_PATH=/usr/local".into(),
        ],
        Platform::Linux => vec!["-DCMAKE_PREFIX_PATH=/usr/local".into()],
    }
}

/// Full configure command line: `cmake <source> <base options> <platform options>`.
pub fn configure_args(
    platform: Platform,
    project_root: &Path,
    base_options: &[String],
) -> Vec<String> {
    let mut args = vec!["cmake".to_string(), project_root.display().to_string()];
    args.extend(base_options.iter().cloned());
    args.extend(platform_options(platform, project_root));
    args
}

/// Compile command line. Visual Studio builds select a configuration, the
/// others pass a parallelism hint of `jobs`.
pub fn compile_args(platform: Platform, jobs: usize) -> Vec<String> {
    let mut args: Vec<String> = vec!["cmake".into(), "--build".into(), ".".into()];
    match platform {
        Platform::Windows => args.extend(["--config".into(), "Release".into()]),
        Platform::Macos | Platform::Linux => args.extend(["-j".into(), jobs.to_string()]),
    }
    args
}

/// Runs the two-phase native build for one platform.
pub struct PlatformBuilder<'a, R> {
    settings: &'a Settings,
    runner: &'a R,
}

impl<'a, R: CommandRunner> PlatformBuilder<'a, R> {
    /// A builder driving `runner` with `settings`.
    pub fn new(settings: &'a Settings, runner: &'a R) -> Self {
        Self { settings, runner }
    }

    /// Configures then compiles `platform` in `<build_root>/build-<platform>`.
    ///
    /// Stops at the first failing phase.
    pub async fn build(&self, platform: Platform) -> Result<()> {
        log::info!("Building for {platform}");

        let build_dir = self.settings.platform_build_dir(platform);
        fs::create_dir_all(&build_dir, false).await?;

        let configure = configure_args(
            platform,
            self.settings.project_root(),
            &self.settings.product().cmake_options,
        );
        run_checked(self.runner, &configure, &build_dir).await?;

        let compile = compile_args(platform, num_cpus::get());
        run_checked(self.runner, &compile, &build_dir).await?;

        Ok(())
    }
}
