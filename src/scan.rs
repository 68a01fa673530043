//! Finds the markdown sources under a content root. Both reporters and the
//! listing loaders start here.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The suffix that marks a file as markdown content.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Recursively collects every markdown file under `root`, depth-first. Entries
/// within a directory are visited in file name order so the result doesn't
/// depend on the platform's directory ordering.
///
/// Fails if `root` doesn't exist or if any directory beneath it can't be read.
pub fn scan(root: &Path) -> walkdir::Result<Vec<PathBuf>> {
    walk(WalkDir::new(root))
}

/// Like [`scan`], but descends at most `max_depth` levels. A depth of `1`
/// returns only the markdown files directly inside `root`.
pub fn scan_depth(root: &Path, max_depth: usize) -> walkdir::Result<Vec<PathBuf>> {
    walk(WalkDir::new(root).max_depth(max_depth))
}

fn walk(walker: WalkDir) -> walkdir::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for result in walker.sort_by_file_name() {
        let entry = result?;
        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_string_lossy()
                .ends_with(MARKDOWN_EXTENSION)
        {
            paths.push(entry.into_path());
        }
    }
    log::debug!("found {} markdown files", paths.len());
    Ok(paths)
}
