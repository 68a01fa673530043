//! Defines [`MomentEntry`], the listing record of a short dated note.

use crate::config::ListingOptions;
use crate::date::{self, format_date, Clock, DisplayDate};
use crate::document::Document;
use crate::markdown;
use crate::util::non_empty;
use serde::Serialize;

/// A moment: rendered body plus when and where it was written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MomentEntry {
    pub html: String,
    pub date: DisplayDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub images: Vec<String>,
}

impl MomentEntry {
    /// Derives the entry for `document`. Moments display both date and time.
    pub fn from_document(
        document: &Document,
        options: &ListingOptions,
        clock: &dyn Clock,
    ) -> date::Result<MomentEntry> {
        let frontmatter = &document.frontmatter;
        let locale = &options.locale;
        Ok(MomentEntry {
            html: markdown::to_html(&document.body),
            date: format_date(
                frontmatter.date.as_ref(),
                clock,
                &locale.offset,
                &locale.moment_date_format,
            )?,
            location: non_empty(frontmatter.location.as_deref()).map(str::to_owned),
            images: frontmatter.images.clone().unwrap_or_default(),
        })
    }
}
