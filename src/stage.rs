//! Workspace staging.
//!
//! Each document is built in its own copy of the sources:
//!
//! ```text
//! <workspace root>/<name>/
//!     ├── <unit sources>          copied first
//!     ├── <common tree>           overlaid second, wins on collisions
//!     └── (no .svn anywhere)      purged last
//! ```
//!
//! The workspace is overlaid, not wiped, so the PDF of the previous build
//! stays in place for the freshness check.

use crate::{
    config::ProjectConfig,
    debug,
    document::DocumentUnit,
    log,
    utils::fs::{copy_dir_all, remove_dirs_named},
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A document together with its prepared workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUnit {
    pub unit: DocumentUnit,
    pub workspace: PathBuf,
}

impl StagedUnit {
    pub fn tex_file(&self) -> PathBuf {
        self.unit.tex_file(&self.workspace)
    }

    pub fn pdf_file(&self) -> PathBuf {
        self.unit.pdf_file(&self.workspace)
    }
}

/// Stage one document into `workspace_root/<name>` and return that path.
///
/// `common` is overlaid only if it exists. Any copy or delete failure is
/// returned.
pub fn stage(
    unit: &DocumentUnit,
    common: &Path,
    workspace_root: &Path,
    purge: &[String],
) -> Result<PathBuf> {
    let target = workspace_root.join(&unit.name);

    copy_dir_all(&unit.source_dir, &target).with_context(|| {
        format!(
            "Failed to stage `{}` into {}",
            unit.name,
            target.display()
        )
    })?;

    if common.is_dir() {
        copy_dir_all(common, &target).with_context(|| {
            format!(
                "Failed to overlay {} onto {}",
                common.display(),
                target.display()
            )
        })?;
    }

    let purged = remove_dirs_named(&target, purge)?;
    if purged > 0 {
        debug!("stage"; "{}: purged {} metadata dir(s)", unit.name, purged);
    }

    Ok(target)
}

/// Stage every unit before anything is built.
///
/// With `[build.clean]` the workspace root is removed first.
pub fn stage_all(units: &[DocumentUnit], config: &ProjectConfig) -> Result<Vec<StagedUnit>> {
    let workspace_root = &config.build.workspace;

    if config.build.clean && workspace_root.exists() {
        fs::remove_dir_all(workspace_root).with_context(|| {
            format!("Failed to clear workspace {}", workspace_root.display())
        })?;
    }

    let common = config.documents.common_dir();
    units
        .iter()
        .map(|unit| -> Result<StagedUnit> {
            log!("stage"; "{}", unit.name);
            let workspace = stage(unit, &common, workspace_root, &config.build.purge)?;
            Ok(StagedUnit {
                unit: unit.clone(),
                workspace,
            })
        })
        .collect()
}
