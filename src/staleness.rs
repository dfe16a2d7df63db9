//! Timestamp-based freshness check for a document workspace.
//!
//! A PDF is stale when any `.tex` or `.bib` file anywhere in its workspace
//! has a modification time strictly newer than the PDF itself. Equal times
//! count as up to date.

use crate::{debug, utils::fs::collect_files_with_ext};
use std::{
    fs,
    path::Path,
    time::SystemTime,
};

/// Extensions of the files a PDF is built from.
pub const INPUT_EXTENSIONS: &[&str] = &["tex", "bib"];

/// Decide whether `artifact` must be rebuilt from the inputs in `workspace`.
///
/// A missing artifact always needs a rebuild. An input whose modification
/// time cannot be read is treated as changed.
pub fn needs_rebuild(workspace: &Path, artifact: &Path) -> bool {
    let Some(artifact_time) = modified(artifact) else {
        debug!("fresh"; "{} does not exist", artifact.display());
        return true;
    };

    for input in collect_files_with_ext(workspace, INPUT_EXTENSIONS) {
        match modified(&input) {
            Some(time) if time <= artifact_time => {
                debug!("fresh"; "no change detected on {}", input.display());
            }
            _ => {
                debug!("fresh"; "changes detected on {}", input.display());
                return true;
            }
        }
    }

    debug!("fresh"; "no LaTeX changes detected in {}", workspace.display());
    false
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
