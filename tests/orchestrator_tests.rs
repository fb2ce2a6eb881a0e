mod common;

use common::{Project, ScriptedRunner};
use unidict_bundler::bundler::{
    BUILD_INFO_FILE, BundleRequest, Bundler, PackageType, Platform, SettingsBuilder, Stage,
    StepOutcome,
};

fn bundler(project: &Project, runner: ScriptedRunner) -> Bundler<ScriptedRunner> {
    let settings = SettingsBuilder::new()
        .project_root(project.root())
        .build()
        .unwrap();
    Bundler::new(settings, runner)
}

fn request(platforms: &[Platform], package_types: &[PackageType]) -> BundleRequest {
    BundleRequest {
        platforms: platforms.to_vec(),
        package_types: package_types.to_vec(),
        version: Some("1.0.0".to_string()),
        clean: false,
    }
}

#[tokio::test]
async fn failed_windows_configure_skips_windows_packaging_only() {
    let project = Project::new();
    project.fake_build_output("macos");
    project.fake_build_output("linux");
    let runner = ScriptedRunner::simulating_tools().failing_with_arg(
        "cmake",
        "Visual Studio 17 2022",
        "CMake Error: generator not found",
    );
    let bundler = bundler(&project, runner);

    let report = bundler
        .bundle(&request(&Platform::all(), &[PackageType::Installer]))
        .await
        .unwrap();

    assert!(!report.succeeded());
    assert!(matches!(
        report.outcome(Some(Platform::Windows), Stage::Build),
        Some(StepOutcome::Failed { reason }) if reason.contains("generator not found")
    ));
    assert_eq!(
        report.outcome(Some(Platform::Windows), Stage::Nsis),
        Some(&StepOutcome::skipped("build failed"))
    );

    assert!(bundler.runner().calls_to("makensis").is_empty());

    for stage in [Stage::Dmg, Stage::AppImage, Stage::Deb, Stage::Rpm] {
        let platform = if stage == Stage::Dmg {
            Platform::Macos
        } else {
            Platform::Linux
        };
        assert_eq!(
            report.outcome(Some(platform), stage),
            Some(&StepOutcome::Succeeded),
            "{stage}"
        );
    }

    let names: Vec<_> = report.artifacts().iter().map(|a| a.file_name()).collect();
    assert!(names.contains(&"Unidict-1.0.0-macOS.dmg".to_string()));
    assert!(names.contains(&"unidict_1.0.0_amd64.deb".to_string()));
    assert!(!names.iter().any(|n| n.ends_with("-Windows.exe")));

    assert!(report.manifest().is_none());
    assert!(report.outcome(None, Stage::Manifest).is_none());
    assert!(!bundler.settings().dist_root().join(BUILD_INFO_FILE).exists());
}

#[tokio::test]
async fn windows_packaging_tools_never_run_after_build_failure() {
    let project = Project::new();
    let runner = ScriptedRunner::simulating_tools().failing_with_arg(
        "cmake",
        "Visual Studio 17 2022",
        "configure failed",
    );
    let bundler = bundler(&project, runner);

    bundler
        .run(
            &bundler.resolve_context(Some("1.0.0")).await,
            &[Platform::Windows, Platform::Linux],
            &[PackageType::Installer],
        )
        .await;

    let runner = bundler.runner();
    assert!(runner.calls_to("windeployqt").is_empty());
    assert!(runner.calls_to("makensis").is_empty());
    assert_eq!(runner.calls_to("appimagetool").len(), 1);
    assert_eq!(runner.calls_to("dpkg-deb").len(), 1);
    assert_eq!(runner.calls_to("rpmbuild").len(), 1);
}

#[tokio::test]
async fn linux_run_writes_manifest_covering_every_artifact() {
    let project = Project::new();
    project.fake_build_output("linux");
    let bundler = bundler(&project, ScriptedRunner::simulating_tools());

    let report = bundler
        .bundle(&request(&[Platform::Linux], &[PackageType::Installer]))
        .await
        .unwrap();

    assert!(report.succeeded(), "{:?}", report.records());
    assert_eq!(
        report.outcome(None, Stage::Manifest),
        Some(&StepOutcome::Succeeded)
    );

    let manifest = report.manifest().unwrap();
    assert_eq!(manifest.version, "1.0.0");
    assert_eq!(manifest.revision, "unknown");
    let keys: Vec<_> = manifest.checksums.keys().cloned().collect();
    assert_eq!(
        keys,
        [
            "Unidict-1.0.0-x86_64.AppImage",
            "unidict-1.0.0-1.x86_64.rpm",
            "unidict_1.0.0_amd64.deb",
        ]
    );

    let dist = bundler.settings().dist_root();
    assert!(dist.join("checksums-1.0.0.txt").is_file());
    assert!(dist.join(BUILD_INFO_FILE).is_file());
    assert_eq!(report.artifacts().len(), 5);
}

#[tokio::test]
async fn build_runs_configure_then_compile_in_platform_directory() {
    let project = Project::new();
    let bundler = bundler(&project, ScriptedRunner::new());

    bundler
        .run(
            &bundler.resolve_context(Some("1.0.0")).await,
            &[Platform::Linux],
            &[PackageType::Portable],
        )
        .await;

    let cmake = bundler.runner().calls_to("cmake");
    assert_eq!(cmake.len(), 2);
    let build_dir = project.root().join("build/build-linux");
    assert!(cmake.iter().all(|c| c.working_dir == build_dir));
    assert!(cmake[0].contains("-DCMAKE_BUILD_TYPE=Release"));
    assert!(cmake[0].contains("-DCMAKE_PREFIX_PATH=/usr/local"));
    assert!(cmake[1].contains("--build"));
    assert!(cmake[1].contains("-j"));
}

#[tokio::test]
async fn portable_only_runs_no_packaging_tools() {
    let project = Project::new();
    let bundler = bundler(&project, ScriptedRunner::simulating_tools());

    let report = bundler
        .bundle(&request(&Platform::all(), &[PackageType::Portable]))
        .await
        .unwrap();

    assert!(report.succeeded());
    for platform in Platform::all() {
        assert_eq!(
            report.outcome(Some(platform), Stage::Portable),
            Some(&StepOutcome::skipped("portable packages are not produced"))
        );
    }
    let programs: Vec<_> = bundler
        .runner()
        .calls()
        .into_iter()
        .map(|c| c.program().to_string())
        .collect();
    assert!(programs.iter().all(|p| p == "cmake" || p == "git"));
}

#[tokio::test]
async fn missing_installer_after_makensis_is_a_failure() {
    let project = Project::new();
    project.fake_build_output("windows");
    // makensis "succeeds" but writes nothing
    let bundler = bundler(&project, ScriptedRunner::new());

    let report = bundler
        .bundle(&request(&[Platform::Windows], &[PackageType::Installer]))
        .await
        .unwrap();

    assert!(!report.succeeded());
    assert!(matches!(
        report.outcome(Some(Platform::Windows), Stage::Nsis),
        Some(StepOutcome::Failed { reason }) if reason.starts_with("no file matching")
    ));
    assert_eq!(bundler.runner().calls_to("makensis").len(), 1);
}

#[tokio::test]
async fn windows_installer_is_copied_under_canonical_name() {
    let project = Project::new();
    project.fake_build_output("windows");
    let runner = ScriptedRunner::simulating_tools().failing("windeployqt", "not installed");
    let bundler = bundler(&project, runner);

    let report = bundler
        .bundle(&request(&[Platform::Windows], &[PackageType::Installer]))
        .await
        .unwrap();

    assert!(report.succeeded(), "{:?}", report.records());
    let dist = bundler.settings().dist_root();
    assert!(dist.join("Unidict-1.0.0-Windows.exe").is_file());

    let staged = bundler.settings().staging_root().join("windows/Unidict");
    assert!(staged.join("unidict_qml.exe").is_file());
    assert!(staged.join("unidict_core.dll").is_file());

    let script = std::fs::read(bundler.settings().staging_root().join("windows/install.nsi"))
        .unwrap();
    assert_eq!(&script[..3], &[0xEF, 0xBB, 0xBF]);
}

#[tokio::test]
async fn slashed_version_keeps_artifacts_in_output_root() {
    let project = Project::new();
    project.fake_build_output("windows");
    let bundler = bundler(&project, ScriptedRunner::simulating_tools());
    let request = BundleRequest {
        version: Some("release/1.0".to_string()),
        ..request(&[Platform::Windows], &[PackageType::Installer])
    };

    let report = bundler.bundle(&request).await.unwrap();

    assert!(report.succeeded(), "{:?}", report.records());
    let dist = bundler.settings().dist_root();
    assert!(dist.join("Unidict-release-1.0-Windows.exe").is_file());
    assert!(dist.join("checksums-release-1.0.txt").is_file());
    assert!(!dist.join("Unidict-release").exists());

    let manifest = report.manifest().unwrap();
    assert_eq!(manifest.version, "release-1.0");
    let keys: Vec<_> = manifest.checksums.keys().cloned().collect();
    assert_eq!(keys, ["Unidict-release-1.0-Windows.exe"]);
}

#[tokio::test]
async fn rpm_without_output_is_a_failure() {
    let project = Project::new();
    project.fake_build_output("linux");
    // rpmbuild exits 0 but RPMS/x86_64 stays empty
    let bundler = bundler(&project, ScriptedRunner::new());

    let report = bundler
        .bundle(&request(&[Platform::Linux], &[PackageType::Installer]))
        .await
        .unwrap();

    assert!(!report.succeeded());
    assert!(matches!(
        report.outcome(Some(Platform::Linux), Stage::Rpm),
        Some(StepOutcome::Failed { reason })
            if reason.starts_with("no file matching") && reason.contains("RPMS/x86_64")
    ));
    assert_eq!(bundler.runner().calls_to("rpmbuild").len(), 1);
    assert!(report.manifest().is_none());
}

#[tokio::test]
async fn failed_hdiutil_fails_the_dmg() {
    let project = Project::new();
    project.fake_build_output("macos");
    let runner = ScriptedRunner::simulating_tools().failing("hdiutil", "hdiutil: create failed");
    let bundler = bundler(&project, runner);

    let report = bundler
        .bundle(&request(&[Platform::Macos], &[PackageType::Installer]))
        .await
        .unwrap();

    assert!(!report.succeeded());
    assert!(matches!(
        report.outcome(Some(Platform::Macos), Stage::Dmg),
        Some(StepOutcome::Failed { reason }) if reason.contains("hdiutil: create failed")
    ));
    assert!(!bundler.settings().dist_root().join("Unidict-1.0.0-macOS.dmg").exists());
}

#[tokio::test]
async fn failed_macdeployqt_still_produces_the_dmg() {
    let project = Project::new();
    project.fake_build_output("macos");
    let runner = ScriptedRunner::simulating_tools().failing("macdeployqt", "Qt not found");
    let bundler = bundler(&project, runner);

    let report = bundler
        .bundle(&request(&[Platform::Macos], &[PackageType::Installer]))
        .await
        .unwrap();

    assert!(report.succeeded(), "{:?}", report.records());
    assert_eq!(
        report.outcome(Some(Platform::Macos), Stage::Dmg),
        Some(&StepOutcome::Succeeded)
    );
    assert_eq!(bundler.runner().calls_to("macdeployqt").len(), 1);
    assert_eq!(bundler.runner().calls_to("hdiutil").len(), 1);
    assert!(bundler.settings().dist_root().join("Unidict-1.0.0-macOS.dmg").is_file());
}

#[tokio::test]
async fn linux_subpackagers_do_not_short_circuit() {
    let project = Project::new();
    project.fake_build_output("linux");
    let runner = ScriptedRunner::simulating_tools().failing("appimagetool", "fuse missing");
    let bundler = bundler(&project, runner);

    let report = bundler
        .bundle(&request(&[Platform::Linux], &[PackageType::Installer]))
        .await
        .unwrap();

    assert!(!report.succeeded());
    assert!(report.outcome(Some(Platform::Linux), Stage::AppImage).unwrap().is_failed());
    assert_eq!(
        report.outcome(Some(Platform::Linux), Stage::Deb),
        Some(&StepOutcome::Succeeded)
    );
    assert_eq!(
        report.outcome(Some(Platform::Linux), Stage::Rpm),
        Some(&StepOutcome::Succeeded)
    );
}

#[tokio::test]
async fn failed_compile_skips_all_linux_stages() {
    let project = Project::new();
    let runner =
        ScriptedRunner::simulating_tools().failing_with_arg("cmake", "--build", "error: ld");
    let bundler = bundler(&project, runner);

    let report = bundler
        .bundle(&request(&[Platform::Linux], &PackageType::all()))
        .await
        .unwrap();

    for stage in [Stage::AppImage, Stage::Deb, Stage::Rpm, Stage::Portable] {
        assert_eq!(
            report.outcome(Some(Platform::Linux), stage),
            Some(&StepOutcome::skipped("build failed")),
            "{stage}"
        );
    }
    assert_eq!(report.failures().count(), 1);
}

#[tokio::test]
async fn clean_recreates_build_and_staging_but_keeps_output() {
    let project = Project::new();
    let root = project.root();
    std::fs::create_dir_all(root.join("build/build-linux")).unwrap();
    std::fs::write(root.join("build/build-linux/CMakeCache.txt"), "stale").unwrap();
    std::fs::create_dir_all(root.join("build/packages/linux")).unwrap();
    std::fs::write(root.join("build/packages/linux/old.deb"), "stale").unwrap();
    std::fs::create_dir_all(root.join("dist")).unwrap();
    std::fs::write(root.join("dist/previous.dmg"), "kept").unwrap();

    let bundler = bundler(&project, ScriptedRunner::new());
    bundler.prepare(true).await.unwrap();

    assert!(root.join("build").is_dir());
    assert!(root.join("build/packages").is_dir());
    assert_eq!(std::fs::read_dir(root.join("build/packages")).unwrap().count(), 0);
    assert!(!root.join("build/build-linux").exists());
    assert!(root.join("dist/previous.dmg").is_file());
    assert!(bundler.runner().calls().is_empty());
}

#[tokio::test]
async fn prepare_without_clean_keeps_existing_builds() {
    let project = Project::new();
    project.fake_build_output("linux");

    let bundler = bundler(&project, ScriptedRunner::new());
    bundler.prepare(false).await.unwrap();

    assert!(project.root().join("build/build-linux/unidict_qml").is_file());
    assert!(project.root().join("dist").is_dir());
}
