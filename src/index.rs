//! Generates the year index: a markdown page with one placeholder section per
//! year in which content was written. The sections are filled in later, by
//! hand or by the site's templates; this module only decides which years
//! exist.

use crate::config::{Config, IndexOptions};
use crate::date::{self, Clock};
use crate::document::Document;
use crate::source::{self, load_tree, Loaded};
use chrono::FixedOffset;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// The distinct years of a set of documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct YearIndex(BTreeSet<i32>);

impl YearIndex {
    /// Collects the year of every document. Undated documents count towards
    /// the clock's current year; documents with uninterpretable dates are
    /// skipped with a warning.
    pub fn from_documents<'a, I>(documents: I, clock: &dyn Clock, offset: &FixedOffset) -> YearIndex
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut years = BTreeSet::new();
        for document in documents {
            match date::year(document.frontmatter.date.as_ref(), clock, offset) {
                Ok(year) => {
                    years.insert(year);
                }
                Err(e) => log::warn!("skipping `{}`: {}", document.path.display(), e),
            }
        }
        YearIndex(years)
    }

    /// The years, most recent first.
    pub fn years(&self) -> Vec<i32> {
        self.0.iter().rev().copied().collect()
    }

    /// Renders the index page.
    pub fn render(&self, options: &IndexOptions) -> String {
        let mut content = format!("# {}\n\n{}\n\n", options.title, options.description);
        for year in self.years() {
            let heading = options.year_heading.replace("{year}", &year.to_string());
            content.push_str(&format!("## {}\n\n", heading));
            content.push_str(&format!("<!-- {} -->\n\n", year));
        }
        content
    }
}

/// Scans the content root, renders the year index and overwrites
/// `config.index_file` with it. The previous contents of the file are not
/// kept. Nothing is written if scanning fails.
pub fn generate_year_index(config: &Config, clock: &dyn Clock) -> Result<YearIndex> {
    let loaded = load_tree(&config.docs_directory, None, &|p: &Path| {
        config.is_generated(p)
    })?;
    let documents = loaded.iter().filter_map(|result: &Loaded| match result {
        Ok(document) => Some(document),
        Err(failure) => {
            log::warn!("skipping {}", failure);
            None
        }
    });
    let index = YearIndex::from_documents(documents, clock, &config.listing.locale.offset);

    std::fs::write(&config.index_file, index.render(&config.index)).map_err(|err| {
        Error::Write {
            path: config.index_file.clone(),
            err,
        }
    })?;
    log::info!("wrote {}", config.index_file.display());
    Ok(index)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for generating the year index.
#[derive(Debug)]
pub enum Error {
    /// Returned when the content tree can't be loaded.
    Load(source::Error),

    /// Returned when the index file can't be written.
    Write { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Load(err) => write!(f, "{}", err),
            Error::Write { path, err } => {
                write!(f, "Writing index file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Load(err) => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}

impl From<source::Error> for Error {
    /// Converts [`source::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: source::Error) -> Error {
        Error::Load(err)
    }
}
