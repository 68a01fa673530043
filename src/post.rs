//! Defines [`PostEntry`], the listing record of a tagged article, and
//! [`page_url`], which maps a source path to its URL on the site.

use crate::config::ListingOptions;
use crate::date::{self, format_date, Clock, DisplayDate};
use crate::derive::{reading_time, resolve_cover, resolve_excerpt, resolve_title};
use crate::document::Document;
use crate::markdown;
use crate::scan::MARKDOWN_EXTENSION;
use crate::tag::Tags;
use serde::Serialize;
use std::path::{Component, Path};

/// A post as the site's listing pages see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEntry {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub date: DisplayDate,
    pub tags: Tags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub reading_time: u32,
}

impl PostEntry {
    /// Derives the entry for `document`, whose URL is computed relative to
    /// `root`. Returns `Ok(None)` for documents without tags: those are
    /// standalone pages rather than posts.
    pub fn from_document(
        document: &Document,
        root: &Path,
        options: &ListingOptions,
        clock: &dyn Clock,
    ) -> date::Result<Option<PostEntry>> {
        let frontmatter = &document.frontmatter;
        let tags = match frontmatter.tags() {
            Some(tags) => tags.clone(),
            None => return Ok(None),
        };

        let locale = &options.locale;
        let date = format_date(
            frontmatter.date.as_ref(),
            clock,
            &locale.offset,
            &locale.post_date_format,
        )?;
        let url = page_url(root, &document.path, &options.url_extension);
        let auto_excerpt = markdown::excerpt(&document.body, &options.excerpt_separator);

        Ok(Some(PostEntry {
            title: resolve_title(frontmatter.title.as_deref(), &url),
            excerpt: resolve_excerpt(
                frontmatter.description.as_deref(),
                auto_excerpt.as_deref(),
            ),
            cover: resolve_cover(
                frontmatter.cover.as_deref(),
                frontmatter.cover_image.as_deref(),
            )
            .map(str::to_owned),
            reading_time: reading_time(&document.body, options.words_per_minute),
            url,
            date,
            tags,
        }))
    }
}

/// The site URL of the source file at `path` under `root`: the relative path
/// with `.md` replaced by `extension`. An `index.md` maps to its directory,
/// with a trailing slash.
pub fn page_url(root: &Path, path: &Path, extension: &str) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let (file_name, directories) = match segments.split_last() {
        Some(split) => split,
        None => return String::from("/"),
    };

    let mut url = String::from("/");
    for directory in directories {
        url.push_str(directory);
        url.push('/');
    }
    if file_name != "index.md" {
        url.push_str(file_name.trim_end_matches(MARKDOWN_EXTENSION));
        url.push_str(extension);
    }
    url
}
