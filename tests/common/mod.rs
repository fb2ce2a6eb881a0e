//! Shared test helpers: a scripted [`CommandRunner`] and a throwaway project tree.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use unidict_bundler::bundler::{CommandResult, CommandRunner};

type Matcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

struct Rule {
    matches: Matcher,
    result: CommandResult,
}

/// One recorded invocation.
#[derive(Clone, Debug)]
pub struct Call {
    pub argv: Vec<String>,
    pub working_dir: PathBuf,
}

impl Call {
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn contains(&self, arg: &str) -> bool {
        self.argv.iter().any(|a| a == arg)
    }
}

/// Records every call and answers from a rule list.
///
/// Unmatched commands succeed with empty output. With
/// [`ScriptedRunner::simulating_tools`], successful packaging tools also
/// write the file the real tool would have produced.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    simulate: bool,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces output files for makensis, hdiutil, appimagetool, dpkg-deb and rpmbuild.
    pub fn simulating_tools() -> Self {
        Self {
            simulate: true,
            ..Self::default()
        }
    }

    /// Answers commands matching `matches` with `result`. Earlier rules win.
    pub fn on(
        mut self,
        matches: impl Fn(&[String]) -> bool + Send + Sync + 'static,
        result: CommandResult,
    ) -> Self {
        self.rules.push(Rule {
            matches: Box::new(matches),
            result,
        });
        self
    }

    /// Fails every invocation of `program`.
    pub fn failing(self, program: &'static str, stderr: &'static str) -> Self {
        self.on(
            move |argv| argv.first().is_some_and(|p| p == program),
            CommandResult::failure(stderr),
        )
    }

    /// Fails commands of `program` that carry `arg`.
    pub fn failing_with_arg(
        self,
        program: &'static str,
        arg: &'static str,
        stderr: &'static str,
    ) -> Self {
        self.on(
            move |argv| argv.first().is_some_and(|p| p == program) && argv.iter().any(|a| a == arg),
            CommandResult::failure(stderr),
        )
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.program() == program)
            .collect()
    }

    fn answer(&self, argv: &[String]) -> CommandResult {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(argv))
            .map(|rule| rule.result.clone())
            .unwrap_or_else(|| CommandResult::success(""))
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, argv: &[String], working_dir: &Path) -> CommandResult {
        self.calls.lock().unwrap().push(Call {
            argv: argv.to_vec(),
            working_dir: working_dir.to_path_buf(),
        });
        let result = self.answer(argv);
        if result.succeeded && self.simulate {
            simulate_output(argv, working_dir);
        }
        result
    }
}

fn touch(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, vec![0x5au8; len]).unwrap();
}

fn simulate_output(argv: &[String], working_dir: &Path) {
    let Some(program) = argv.first() else {
        return;
    };
    let last = argv.last().map(PathBuf::from);
    match program.as_str() {
        "makensis" => touch(&working_dir.join("Unidict-installer.exe"), 64),
        "hdiutil" | "appimagetool" | "dpkg-deb" => {
            if let Some(out) = last {
                touch(&out, 128);
            }
        }
        "rpmbuild" => {
            let topdir = argv
                .iter()
                .find_map(|a| a.strip_prefix("_topdir "))
                .map(PathBuf::from);
            if let Some(topdir) = topdir {
                touch(&topdir.join("RPMS/x86_64/unidict-1.0.0-1.x86_64.rpm"), 96);
            }
        }
        _ => {}
    }
}

/// A temporary project root with the files packagers pick up.
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "# Unidict\n").unwrap();
        std::fs::write(dir.path().join("LICENSE"), "MIT\n").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes fake build output for `platform` (e.g. `linux`) the way CMake would.
    pub fn fake_build_output(&self, platform: &str) {
        let build = self.root().join("build").join(format!("build-{platform}"));
        match platform {
            "windows" => {
                touch(&build.join("Release/unidict_qml.exe"), 32);
                touch(&build.join("Release/unidict_cli.exe"), 32);
                touch(&build.join("Release/unidict_core.dll"), 16);
            }
            _ => {
                touch(&build.join("unidict_qml"), 32);
                touch(&build.join("unidict_cli"), 32);
            }
        }
    }
}
