//! Directory enumeration for seeding the watcher.

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every directory under `root`, `root` included, in a stable order.
///
/// Symlinks are not followed. Any unreadable entry fails the whole walk.
pub fn collect_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}
