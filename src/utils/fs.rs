//! Recursive file-tree helpers used by staging and freshness checks.

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Copy `src` into `dst` recursively, overlaying whatever is already there.
///
/// Existing files with the same relative path are overwritten, other files in
/// `dst` are left alone. Modification times are carried over so freshness
/// checks see the source timestamps, not the time of the copy.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory {}", dst.display()))?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let dest_path = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("Failed to create directory {}", dest_path.display()))?;
        } else {
            copy_file(entry.path(), &dest_path)?;
        }
    }

    Ok(())
}

/// Copy a single file, keeping its modification time.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;

    let modified = fs::metadata(src)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("Failed to read mtime of {}", src.display()))?;
    File::options()
        .write(true)
        .open(dst)
        .and_then(|file| file.set_modified(modified))
        .with_context(|| format!("Failed to set mtime of {}", dst.display()))?;

    Ok(())
}

/// Find every directory under `root` (at any depth) whose name is in `names`.
///
/// Matching directories are not descended into, so a match nested inside
/// another match is reported once, through its outermost ancestor. `root`
/// itself is never matched.
pub fn find_dirs_named(root: &Path, names: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).into_iter();

    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_dir() {
            continue;
        }
        let matched = entry
            .file_name()
            .to_str()
            .is_some_and(|name| names.iter().any(|n| n == name));
        if matched {
            found.push(entry.into_path());
            walker.skip_current_dir();
        }
    }

    found
}

/// Delete every directory under `root` whose name is in `names`.
///
/// Returns the number of removed subtrees.
pub fn remove_dirs_named(root: &Path, names: &[String]) -> Result<usize> {
    let dirs = find_dirs_named(root, names);
    for dir in &dirs {
        fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    Ok(dirs.len())
}

/// Collect regular files under `dir` whose extension is one of `extensions`.
///
/// The comparison is case-sensitive. Paths come back in walk order.
pub fn collect_files_with_ext(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.contains(&ext))
        })
        .map(|e| e.into_path())
        .collect()
}
