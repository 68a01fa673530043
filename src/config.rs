//! Loads project configuration from an optional `quill.yaml`. Every knob the
//! loaders and reporters use lives here so nothing downstream embeds a
//! literal path, rate or locale.

use crate::date::{self, Locale};
use crate::derive::DEFAULT_WORDS_PER_MINUTE;
use anyhow::{anyhow, bail, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "quill.yaml";

#[derive(Deserialize)]
#[serde(default)]
struct Project {
    docs_directory: PathBuf,
    public_directory: PathBuf,
    moments_directory: PathBuf,
    index_file: PathBuf,
    words_per_minute: u32,
    url_extension: String,
    excerpt_separator: String,
    locale: LocaleSection,
    index: IndexOptions,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            docs_directory: PathBuf::from("docs"),
            public_directory: PathBuf::from("public"),
            moments_directory: PathBuf::from("Moments"),
            index_file: PathBuf::from("docs/index-index.md"),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            url_extension: String::new(),
            excerpt_separator: String::from("---"),
            locale: LocaleSection::default(),
            index: IndexOptions::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct LocaleSection {
    utc_offset_minutes: i32,
    post_date_format: String,
    moment_date_format: String,
}

impl Default for LocaleSection {
    fn default() -> Self {
        LocaleSection {
            utc_offset_minutes: date::DEFAULT_UTC_OFFSET_MINUTES,
            post_date_format: date::DEFAULT_POST_DATE_FORMAT.to_owned(),
            moment_date_format: date::DEFAULT_MOMENT_DATE_FORMAT.to_owned(),
        }
    }
}

/// Headings of the generated year index.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// The top-level heading.
    pub title: String,

    /// The paragraph under the title.
    pub description: String,

    /// The heading of each year section. `{year}` is replaced by the year.
    pub year_heading: String,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            title: String::from("📚 内容索引"),
            description: String::from("按时间浏览所有内容"),
            year_heading: String::from("📅 {year}年"),
        }
    }
}

/// Settings that shape listing entries.
#[derive(Clone, Debug)]
pub struct ListingOptions {
    /// Characters read per minute when estimating reading time.
    pub words_per_minute: u32,

    /// Appended to page URLs; empty for clean URLs.
    pub url_extension: String,

    /// The line that ends the automatic excerpt.
    pub excerpt_separator: String,

    pub locale: Locale,
}

impl Default for ListingOptions {
    fn default() -> Self {
        ListingOptions {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            url_extension: String::new(),
            excerpt_separator: String::from("---"),
            locale: Locale::default(),
        }
    }
}

/// Resolved project configuration. All paths are absolute or relative to the
/// current directory, never to the project file.
#[derive(Clone, Debug)]
pub struct Config {
    /// The content root.
    pub docs_directory: PathBuf,

    /// Where absolute image references (`/img/a.png`) are looked up.
    pub public_directory: PathBuf,

    /// The directory holding moment entries.
    pub moments_directory: PathBuf,

    /// The generated year index.
    pub index_file: PathBuf,

    pub listing: ListingOptions,

    pub index: IndexOptions,
}

impl Config {
    /// Searches `dir` and its ancestors for [`PROJECT_FILE`] and loads the first
    /// one found. Without a project file, defaults rooted at `dir` are used.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(candidate) = current {
            let path = candidate.join(PROJECT_FILE);
            if path.is_file() {
                log::debug!("using project file {}", path.display());
                return Config::from_project_file(&path)
                    .map_err(|e| anyhow!("Loading configuration: {:#}", e));
            }
            current = candidate.parent();
        }
        log::debug!("no {} found, using defaults", PROJECT_FILE);
        Config::from_project(dir, Project::default())
    }

    /// Loads the project file at `path`. Relative paths inside it are resolved
    /// against its directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        use crate::util::read_to_string;
        let contents = read_to_string(path, "project")?;
        let project: Project = match contents.trim().is_empty() {
            true => Project::default(),
            false => serde_yaml::from_str(&contents)?,
        };
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Config::from_project(project_root, project),
        }
    }

    /// The default configuration for a project rooted at `root`.
    pub fn with_root(root: &Path) -> Config {
        let project = Project::default();
        Config {
            docs_directory: root.join(&project.docs_directory),
            public_directory: root.join(&project.public_directory),
            moments_directory: root
                .join(&project.docs_directory)
                .join(&project.moments_directory),
            index_file: root.join(&project.index_file),
            listing: ListingOptions::default(),
            index: project.index,
        }
    }

    fn from_project(root: &Path, project: Project) -> Result<Config> {
        if project.words_per_minute == 0 {
            bail!("`words_per_minute` must be greater than zero");
        }
        let offset = project
            .locale
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                anyhow!(
                    "`locale.utc_offset_minutes` out of range: {}",
                    project.locale.utc_offset_minutes
                )
            })?;
        for pattern in &[
            &project.locale.post_date_format,
            &project.locale.moment_date_format,
        ] {
            if !date::is_valid_pattern(pattern) {
                bail!("invalid date format pattern `{}`", pattern);
            }
        }
        if !project.index.year_heading.contains("{year}") {
            bail!("`index.year_heading` must contain `{{year}}`");
        }

        let docs_directory = root.join(&project.docs_directory);
        Ok(Config {
            moments_directory: docs_directory.join(&project.moments_directory),
            docs_directory,
            public_directory: root.join(&project.public_directory),
            index_file: root.join(&project.index_file),
            listing: ListingOptions {
                words_per_minute: project.words_per_minute,
                url_extension: project.url_extension,
                excerpt_separator: project.excerpt_separator,
                locale: Locale {
                    offset,
                    post_date_format: project.locale.post_date_format,
                    moment_date_format: project.locale.moment_date_format,
                },
            },
            index: project.index,
        })
    }

    /// Returns `true` for the generated index file, which is output rather
    /// than content and is left out of every scan.
    pub fn is_generated(&self, path: &Path) -> bool {
        path == self.index_file
    }
}
