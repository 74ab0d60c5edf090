//! Stage outcomes and checked command execution.
//!
//! # Design goals
//!
//! - **Nothing fails silently.**  Every external invocation is waited on and
//!   its exit status checked; a non-zero exit becomes an error the pipeline
//!   must handle.
//! - **Informative on failure.**  Tool output is captured while a stage runs
//!   and replayed in full when it fails, so the operator can diagnose the
//!   problem without re-running manually.
//! - **Testable without a terminal.**  [`StageOutcome`] is a plain data type
//!   and the executors take argument slices, so unit tests drive them with
//!   `sh -c` instead of the real backup tools.

use std::{
    fs::File,
    path::Path,
    process::{Command, Output, Stdio},
};

use anyhow::{Context, Result};
use console::style;

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Green ✓  — printed when a stage succeeds.
fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}
/// Red ✗    — printed when a stage fails.
fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}
/// Cyan ✓   — printed next to the final success summary.
fn icon_done() -> console::StyledObject<&'static str> {
    style("✓").cyan().bold()
}

// ─── Stage result ─────────────────────────────────────────────────────────────

/// The outcome of a single backup stage (one mode, or the final permission
/// normalisation).
///
/// Carries the stage label plus whatever the failing command wrote to
/// stdout/stderr so it can be replayed to the terminal when something goes
/// wrong.
#[derive(Debug)]
pub struct StageOutcome {
    /// Human-readable stage label, e.g. `"Database backup"`.
    pub label: String,
    /// Whether the stage completed without error.
    pub success: bool,
    /// Captured stdout of the failing command, if any.
    pub stdout: String,
    /// Captured stderr of the failing command, if any.
    pub stderr: String,
    /// The anyhow error message, if any.
    pub error: Option<String>,
}

impl StageOutcome {
    /// A successful outcome with no captured output.
    pub fn ok(label: &str) -> Self {
        Self {
            label: label.to_string(),
            success: true,
            stdout: String::new(),
            stderr: String::new(),
            error: None,
        }
    }

    /// A failed outcome carrying the error chain.
    ///
    /// When the chain bottoms out in a [`CommandFailed`], the tool's captured
    /// stdout/stderr ride along so [`print`](Self::print) can replay them.
    pub fn err(label: &str, error: &anyhow::Error) -> Self {
        let (stdout, stderr) = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<CommandFailed>())
            .map(|failed| (failed.stdout.clone(), failed.stderr.clone()))
            .unwrap_or_default();

        Self {
            label: label.to_string(),
            success: false,
            stdout,
            stderr,
            error: Some(format!("{error:#}")),
        }
    }

    /// Print the one-line summary (✓/✗ + label) to stdout.
    ///
    /// On failure, also prints the captured stdout/stderr and the error
    /// message so the operator has everything they need without re-running.
    pub fn print(&self) {
        if self.success {
            println!("  {}  {}", icon_ok(), style(&self.label).bold());
        } else {
            println!("  {}  {}", icon_err(), style(&self.label).bold());

            // Print the error message first (most useful thing).
            if let Some(ref msg) = self.error {
                eprintln!();
                eprintln!("  {} {}", style("Error:").red().bold(), msg);
            }

            // Replay captured output so the operator can see what the tool said.
            if !self.stdout.is_empty() {
                eprintln!();
                eprintln!("  {} stdout:", style("►").dim());
                for line in self.stdout.lines() {
                    eprintln!("    {line}");
                }
            }
            if !self.stderr.is_empty() {
                eprintln!();
                eprintln!("  {} stderr:", style("►").dim());
                for line in self.stderr.lines() {
                    eprintln!("    {line}");
                }
            }
        }
    }

    /// Returns `true` if the stage did not succeed.
    pub const fn failed(&self) -> bool {
        !self.success
    }
}

// ─── Command failure ─────────────────────────────────────────────────────────

/// A spawned tool exited non-zero.
///
/// Carries the captured output so a failing stage can replay what the tool
/// actually said; sits at the bottom of the anyhow chain where
/// [`StageOutcome::err`] digs it out again.
#[derive(Debug)]
pub struct CommandFailed {
    /// argv\[0\] of the failed command.
    pub program: String,
    /// Everything the command wrote to stdout.
    pub stdout: String,
    /// Everything the command wrote to stderr.
    pub stderr: String,
}

impl std::fmt::Display for CommandFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} exited non-zero", self.program)
    }
}

impl std::error::Error for CommandFailed {}

// ─── Captured execution ───────────────────────────────────────────────────────

/// Run a command to completion, capturing both stdout and stderr.
///
/// Returns `(success, stdout_text, stderr_text)`.  Spawning failure (tool
/// not installed) is an `Err`; a non-zero exit is `Ok((false, …))` — use
/// [`run_checked`] when a non-zero exit should escalate.
pub fn run_captured(args: &[String]) -> Result<(bool, String, String)> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;

    let output: Output = Command::new(prog)
        .args(rest)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to spawn: {}", args.join(" ")))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    Ok((output.status.success(), stdout, stderr))
}

/// Like [`run_captured`], but a non-zero exit becomes a [`CommandFailed`]
/// error carrying the captured output.  Returns `(stdout, stderr)` on
/// success.
pub fn run_checked(args: &[String]) -> Result<(String, String)> {
    let (ok, stdout, stderr) = run_captured(args)?;
    if !ok {
        let program = args.first().cloned().unwrap_or_default();
        return Err(CommandFailed {
            program,
            stdout,
            stderr,
        }
        .into());
    }
    Ok((stdout, stderr))
}

/// Run a command with stdout redirected to `stdout_path`, blocking until it
/// exits.
///
/// This is how database dumps land in their `.sql` files: the shell-era
/// `mysqldump … > file` redirect, but with an explicit wait on completion
/// and a checked exit status instead of a fixed sleep.  A non-zero exit is a
/// [`CommandFailed`] error; its stdout is empty by construction (it went to
/// the file).
pub fn run_redirected(args: &[String], stdout_path: &Path) -> Result<()> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;

    let sink = File::create(stdout_path)
        .with_context(|| format!("creating {}", stdout_path.display()))?;

    let output = Command::new(prog)
        .args(rest)
        .stdout(Stdio::from(sink))
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to spawn: {}", args.join(" ")))?;

    if !output.status.success() {
        return Err(CommandFailed {
            program: prog.clone(),
            stdout: String::new(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }
    Ok(())
}

// ─── Summary banner ───────────────────────────────────────────────────────────

/// Print the final summary after all stages have run.
///
/// Shows a success banner when all stages passed, or a failure banner listing
/// the stages that failed.
pub fn print_summary(outcomes: &[StageOutcome]) {
    let failed: Vec<&StageOutcome> = outcomes.iter().filter(|o| o.failed()).collect();
    println!();
    if failed.is_empty() {
        println!(
            "  {} {}",
            icon_done(),
            style("All stages completed successfully.").cyan().bold()
        );
    } else {
        eprintln!("  {}  {}", icon_err(), style("Backup failed.").red().bold());
        for o in &failed {
            eprintln!("    {} {}", icon_err(), style(&o.label).red());
        }
    }
    println!();
}

// ─── Tests ────────────────────────────────────────────────────────────────────
