//! Colored terminal output for packaging runs
//!
//! Provides consistent, colored CLI output with proper formatting

use crate::bundler::{Artifact, BundleReport, StepOutcome, StepRecord};
use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new() -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(&mut buffer, "✓");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(&mut buffer, "⚠");
        let _ = buffer.reset();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        let _ = writeln!(&mut buffer, " {}", message);
        let _ = buffer.reset();
        self.bufwtr.print(&buffer)
    }

    /// Print an error message to stderr
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
            || write!(&mut buffer, "✗").is_err()
            || buffer.reset().is_err()
            || buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red))).is_err()
            || writeln!(&mut buffer, " {}", message).is_err()
            || buffer.reset().is_err()
            || bufwtr.print(&buffer).is_err()
        {
            // Stderr failed - fallback to stdout as last resort
            println!("[STDERR ERROR] ✗ {}", message);
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer);
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = writeln!(&mut buffer, "═══ {} ═══", title);
        let _ = buffer.reset();
        self.bufwtr.print(&buffer)
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "    {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a plain message
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "{}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print one line per step, colored by outcome
    pub fn steps(&self, records: &[StepRecord]) -> std::io::Result<()> {
        self.section("Steps")?;
        let mut buffer = self.bufwtr.buffer();
        for record in records {
            let (color, marker) = match record.outcome {
                StepOutcome::Succeeded => (Color::Green, "✓"),
                StepOutcome::Failed { .. } => (Color::Red, "✗"),
                StepOutcome::Skipped { .. } => (Color::Yellow, "-"),
            };
            let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
            let _ = write!(&mut buffer, "  {marker}");
            let _ = buffer.reset();
            let _ = writeln!(&mut buffer, " {}", step_line(record));
        }
        self.bufwtr.print(&buffer)
    }

    /// Print produced files with their sizes
    pub fn artifacts(&self, artifacts: &[Artifact]) -> std::io::Result<()> {
        self.section("Artifacts")?;
        if artifacts.is_empty() {
            return self.indent("(none)");
        }
        for artifact in artifacts {
            self.indent(&artifact_line(artifact))?;
        }
        Ok(())
    }

    /// Print the whole run summary: steps, artifacts and the final verdict
    pub fn report(&self, report: &BundleReport) -> std::io::Result<()> {
        self.steps(report.records())?;
        self.artifacts(report.artifacts())?;
        self.println("")?;
        if report.succeeded() {
            self.success("Packaging completed successfully")
        } else {
            let failed = report.failures().count();
            self.error(&format!("Packaging failed ({failed} failed step(s))"));
            Ok(())
        }
    }
}

fn step_line(record: &StepRecord) -> String {
    let scope = record
        .platform
        .map(|p| p.to_string())
        .unwrap_or_else(|| "all".to_string());
    format!("{scope:<8} {:<9} {}", record.stage.to_string(), record.outcome)
}

fn artifact_line(artifact: &Artifact) -> String {
    format!(
        "{} ({:.1} MB)",
        artifact.file_name(),
        artifact.size_bytes as f64 / BYTES_PER_MB
    )
}
