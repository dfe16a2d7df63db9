//! External command execution.
//!
//! Tool invocations go through the [`ProcessRunner`] trait so the build
//! sequence can be exercised without spawning real LaTeX processes. The
//! production implementation is [`SystemRunner`].

use crate::{debug, log};
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
    sync::OnceLock,
};

/// Number of trailing output lines shown when a tool fails.
const FAILURE_TAIL_LINES: usize = 20;

// ============================================================================
// Command Line
// ============================================================================

/// An executable plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument (builder style).
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// File name of the program, used as the log prefix.
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .map_or_else(|| self.program.to_string_lossy(), |n| n.to_string_lossy())
            .into_owned()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

/// Quote an argument for display if it would not survive a shell as-is.
fn quote(s: &str) -> String {
    if !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || "\"'\\$`".contains(c)) {
        s.to_owned()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Capability to run an external process to completion.
pub trait ProcessRunner {
    /// Run `command` with `working_dir` as its current directory and return
    /// the exit code. A process terminated without an exit code (e.g. by a
    /// signal) reports `-1`.
    ///
    /// # Errors
    /// Only when the process cannot be launched at all.
    fn run(&self, command: &CommandLine, working_dir: &Path) -> Result<i32>;
}

/// Runs commands with `std::process::Command`, blocking until they exit.
///
/// Stdin is closed so a tool waiting for interactive input fails instead of
/// hanging. Output is captured: stderr is logged on success, and the tail of
/// stdout/stderr is logged on failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandLine, working_dir: &Path) -> Result<i32> {
        let name = command.name();
        let program = resolve_program(&command.program)?;

        let output = Command::new(&program)
            .args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute `{command}`"))?;

        log_output(&name, &output, &LATEX_FILTER);
        Ok(output.status.code().unwrap_or(-1))
    }
}

/// Resolve bare program names through `PATH`.
///
/// Paths with a directory component are used as given.
fn resolve_program(program: &Path) -> Result<PathBuf> {
    if program.components().count() > 1 {
        return Ok(program.to_path_buf());
    }
    which::which(program).with_context(|| {
        format!("`{}` not found. Please install it first.", program.display())
    })
}

// ============================================================================
// Output Filtering
// ============================================================================

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}

/// Filter rule for skipping specific line prefixes.
///
/// Used to reduce noise in command output logging by ignoring known warnings
/// or irrelevant messages.
pub struct FilterRule {
    /// Prefixes to match at the start of output lines.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    /// Returns true if the line is empty or starts with any skip prefix.
    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Lines that survive the filter, ANSI codes removed.
    fn keep(&self, output: &str) -> Vec<String> {
        output
            .lines()
            .map(|line| strip_ansi(line).trim_end().to_owned())
            .filter(|line| !self.should_skip(line.trim()))
            .collect()
    }
}

/// Noise printed by TeX engines and friends on every run.
const LATEX_FILTER: FilterRule = FilterRule::new(&[
    "This is pdfTeX",
    "This is BibTeX",
    "This is makeindex",
    "restricted \\write18 enabled",
    "\\write18 enabled",
    "entering extended mode",
]);

/// Log captured output: stderr in verbose mode on success, the tail of
/// everything on failure.
fn log_output(name: &str, output: &Output, filter: &FilterRule) {
    let stderr = String::from_utf8_lossy(&output.stderr);

    if output.status.success() {
        let lines = filter.keep(&stderr);
        if !lines.is_empty() {
            debug!(name; "{}", lines.join("\n"));
        }
        return;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = filter.keep(&stdout);
    lines.extend(filter.keep(&stderr));
    let tail = lines.len().saturating_sub(FAILURE_TAIL_LINES);
    if !lines.is_empty() {
        log!(name; "{}", lines[tail..].join("\n"));
    }
}

// ============================================================================
// Tests
// ============================================================================
