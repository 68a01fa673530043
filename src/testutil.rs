//! Fixture helpers shared by the unit tests.

use std::fs;
use std::path::{Path, PathBuf};

/// Writes `contents` to `root/relative`, creating parent directories as
/// needed, and returns the full path.
pub(crate) fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Builds a markdown source with a YAML header.
pub(crate) fn markdown(frontmatter: &str, body: &str) -> String {
    format!("---\n{}\n---\n{}", frontmatter, body)
}
