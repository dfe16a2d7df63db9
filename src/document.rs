//! Document units: one buildable sub-directory of the documents root.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A document source directory. Its name is also the base name of the
/// main `.tex` file and of the resulting PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUnit {
    pub name: String,
    pub source_dir: PathBuf,
}

impl DocumentUnit {
    /// Main source file inside a workspace for this document.
    pub fn tex_file(&self, workspace: &Path) -> PathBuf {
        workspace.join(format!("{}.tex", self.name))
    }

    /// PDF produced inside a workspace for this document.
    pub fn pdf_file(&self, workspace: &Path) -> PathBuf {
        workspace.join(format!("{}.pdf", self.name))
    }
}

/// List the document units directly under `root`, sorted by name.
///
/// Skips plain files, hidden directories, and the `common` directory.
/// Directories whose name is not valid UTF-8 are skipped as well.
pub fn discover(root: &Path, common: &str) -> Result<Vec<DocumentUnit>> {
    let entries =
        fs::read_dir(root).with_context(|| format!("Failed to read {}", root.display()))?;

    let mut units: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().into_string().ok()?;
            (!name.starts_with('.') && name != common).then(|| DocumentUnit {
                name,
                source_dir: e.path(),
            })
        })
        .collect();

    units.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(units)
}
