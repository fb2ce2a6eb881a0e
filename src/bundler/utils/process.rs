//! External process execution.
//!
//! Every tool the packagers drive (cmake, git, makensis, hdiutil,
//! appimagetool, dpkg-deb, rpmbuild, the Qt deploy tools) goes through a
//! [`CommandRunner`]. A runner never fails: a nonzero exit, a missing tool
//! and a timeout all come back as a [`CommandResult`] with
//! `succeeded == false`, and callers branch on that.

use crate::bundler::error::{Error, Result};
use std::{future::Future, path::Path, process::Stdio, time::Duration};
use tokio::process::Command;

/// Outcome of one external invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// True iff the process exited with status zero.
    pub succeeded: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandResult {
    /// A successful result with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed result carrying `stderr`.
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Text that best explains a failure: stderr, or stdout when stderr is empty.
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Executes external processes.
///
/// Implementations must not return early: the future resolves only once the
/// process has exited (or was given up on).
pub trait CommandRunner {
    /// Runs `argv[0]` with the remaining arguments inside `working_dir`.
    fn run(&self, argv: &[String], working_dir: &Path) -> impl Future<Output = CommandResult>;
}

/// Runs commands on the host through `tokio::process`.
#[derive(Clone, Debug, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// A runner without a timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives up on (and kills) any command running longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, argv: &[String], working_dir: &Path) -> CommandResult {
        let Some((program, args)) = argv.split_first() else {
            return CommandResult::failure("empty command line");
        };

        let rendered = render_command(argv);
        log::info!("Running: {rendered}");
        if which::which(program).is_err() {
            log::debug!("{program} was not found on PATH");
        }

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, command.output()).await {
                Ok(output) => output,
                Err(_) => {
                    let result = CommandResult::failure(format!(
                        "timed out after {}s",
                        limit.as_secs()
                    ));
                    log::error!("Command failed: {rendered}: {}", result.stderr);
                    return result;
                }
            },
            None => command.output().await,
        };

        let result = match output {
            Ok(output) => CommandResult {
                succeeded: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(e) => CommandResult::failure(format!("failed to start {program}: {e}")),
        };

        if !result.succeeded {
            log::error!("Command failed: {rendered}");
            log::error!("stdout: {}", result.stdout);
            log::error!("stderr: {}", result.stderr);
        }
        result
    }
}

/// Joins an argument vector for logs and error messages.
pub fn render_command(argv: &[String]) -> String {
    argv.join(" ")
}

/// Runs a command and converts an unsuccessful result into [`Error::ToolFailed`].
pub async fn run_checked<R: CommandRunner>(
    runner: &R,
    argv: &[String],
    working_dir: &Path,
) -> Result<CommandResult> {
    let result = runner.run(argv, working_dir).await;
    if result.succeeded {
        Ok(result)
    } else {
        Err(Error::ToolFailed {
            command: render_command(argv),
            detail: result.diagnostic().to_string(),
        })
    }
}

/// Runs a command whose failure is tolerated. Logs a warning and returns
/// whether it succeeded.
pub async fn run_optional<R: CommandRunner>(
    runner: &R,
    argv: &[String],
    working_dir: &Path,
    consequence: &str,
) -> bool {
    let result = runner.run(argv, working_dir).await;
    if !result.succeeded {
        log::warn!(
            "{} failed, {consequence}: {}",
            argv.first().map(String::as_str).unwrap_or_default(),
            result.diagnostic()
        );
    }
    result.succeeded
}

/// Builds an owned argument vector from anything string-like.
pub fn argv<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
