//! Scans a content tree and reads every markdown file in it, in scan order.

use crate::document::{self, load_all, Document, Failure};
use crate::scan::{scan, scan_depth};
use std::fmt;
use std::path::Path;

/// One scanned file: the parsed document, or why its header couldn't be
/// parsed.
pub type Loaded = std::result::Result<Document, Failure>;

/// Scans `root` (at most `max_depth` levels deep when given) and reads each
/// markdown file for which `skip` returns `false`.
pub fn load_tree(
    root: &Path,
    max_depth: Option<usize>,
    skip: &dyn Fn(&Path) -> bool,
) -> Result<Vec<Loaded>> {
    let paths = match max_depth {
        Some(depth) => scan_depth(root, depth)?,
        None => scan(root)?,
    };
    let paths: Vec<_> = paths.into_iter().filter(|p| !skip(p)).collect();
    Ok(load_all(&paths)?)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The fatal errors of loading a content tree.
#[derive(Debug)]
pub enum Error {
    /// Returned when the tree can't be walked.
    Scan(walkdir::Error),

    /// Returned when a file can't be read.
    Read(document::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Scan(err) => write!(f, "{}", err),
            Error::Read(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Scan(err) => Some(err),
            Error::Read(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::Scan(err)
    }
}

impl From<document::Error> for Error {
    /// Converts [`document::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: document::Error) -> Error {
        Error::Read(err)
    }
}
