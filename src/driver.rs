//! LaTeX toolchain driver.
//!
//! # Pass sequence
//!
//! ```text
//! compile ──► <name>.glo? ──► glossary
//!                  │
//!                  └────────► <name>.bib? ──► bibliography ──► compile
//!                                  │
//!                                  └──────► compile × extra_runs
//! ```
//!
//! Each `?` is checked against the workspace at that moment, since an earlier
//! pass may have created the file. The first non-zero exit status aborts the
//! sequence.

use crate::{
    config::ProjectConfig,
    debug,
    error::BuildError,
    log,
    stage::StagedUnit,
    utils::{
        exec::{CommandLine, ProcessRunner},
        fs::copy_file,
    },
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Flag allowing `\write18` (embedded shell commands).
const SHELL_ESCAPE_FLAG: &str = "-shell-escape";
/// Flag stopping the compiler at the first error.
const HALT_ON_ERROR_FLAG: &str = "--halt-on-error";

/// Runs the compile/glossary/bibliography passes for staged documents.
pub struct Toolchain<'a, R: ProcessRunner> {
    config: &'a ProjectConfig,
    runner: &'a R,
}

impl<'a, R: ProcessRunner> Toolchain<'a, R> {
    pub fn new(config: &'a ProjectConfig, runner: &'a R) -> Self {
        Self { config, runner }
    }

    /// Primary compiler invocation for a document.
    pub fn compile_command(&self, tex_file: &Path) -> CommandLine {
        CommandLine::new(self.config.toolchain.executable(&self.config.toolchain.compiler))
            .arg(SHELL_ESCAPE_FLAG)
            .arg(HALT_ON_ERROR_FLAG)
            .arg(tex_file)
    }

    /// Bibliography tool invocation; it takes the document name only.
    pub fn bibliography_command(&self, name: &str) -> CommandLine {
        CommandLine::new(self.config.toolchain.executable(&self.config.toolchain.bibliography))
            .arg(name)
    }

    /// Glossary tool invocation; it takes the document name only.
    pub fn glossary_command(&self, name: &str) -> CommandLine {
        CommandLine::new(self.config.toolchain.executable(&self.config.toolchain.glossary))
            .arg(name)
    }

    /// Run every pass for `staged`, then copy its PDF to the output directory.
    ///
    /// Returns the path of the copied PDF.
    pub fn build(&self, staged: &StagedUnit) -> Result<PathBuf> {
        let name = &staged.unit.name;
        let workspace = &staged.workspace;
        log!("build"; "{}", name);

        let compile = self.compile_command(&absolute(&staged.tex_file()));
        let bibliography = self.bibliography_command(name);
        let glossary = self.glossary_command(name);

        self.execute(&compile, workspace)?;

        if workspace.join(format!("{name}.glo")).exists() {
            self.execute(&glossary, workspace)?;
        }

        if workspace.join(format!("{name}.bib")).exists() {
            self.execute(&bibliography, workspace)?;
            self.execute(&compile, workspace)?;
        }

        for _ in 0..self.config.build.extra_runs {
            self.execute(&compile, workspace)?;
        }

        self.publish(staged)
    }

    /// Copy the workspace PDF of `staged` to `<output>/<name>.pdf`.
    pub fn publish(&self, staged: &StagedUnit) -> Result<PathBuf> {
        let pdf = staged.pdf_file();
        if !pdf.is_file() {
            return Err(BuildError::MissingArtifact(pdf).into());
        }
        let dest = self.config.build.output_pdf(&staged.unit.name);
        copy_file(&pdf, &dest)?;
        log!("done"; "{}", dest.display());

        Ok(dest)
    }

    /// Run one pass; any exit status other than 0 is an error naming the
    /// command.
    fn execute(&self, command: &CommandLine, dir: &Path) -> Result<()> {
        debug!(&command.name(); "{}", command);

        let code = self
            .runner
            .run(command, dir)
            .map_err(|source| BuildError::Launch {
                command: command.to_string(),
                source: source.into(),
            })?;

        if code != 0 {
            return Err(BuildError::ToolFailed {
                command: command.to_string(),
                code,
            }
            .into());
        }
        Ok(())
    }
}

/// Workspaces come from normalized config paths; this covers callers that
/// pass relative ones.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
