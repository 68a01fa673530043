//! Pure functions that compute the secondary attributes of a listing entry
//! from front-matter values: reading time, excerpt, cover image and title.
//! Empty strings count as missing throughout.

use crate::scan::MARKDOWN_EXTENSION;
use crate::util::non_empty;

/// Reading speed used when no other rate is configured, in characters per
/// minute.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 500;

/// The title used when neither the front-matter nor the URL provides one.
pub const UNTITLED: &str = "Untitled";

/// Markup characters that don't count towards reading time.
const MARKUP: &[char] = &['#', '*', '`', '~', '>', '[', ']', '(', ')', '-', '\n', '\r'];

/// Estimates the minutes needed to read `body` at `words_per_minute`
/// characters per minute, rounding up. An empty body takes 0 minutes; any
/// other body takes at least 1.
pub fn reading_time(body: &str, words_per_minute: u32) -> u32 {
    if body.is_empty() {
        return 0;
    }
    let count = body.chars().filter(|c| !MARKUP.contains(c)).count() as u64;
    let rate = u64::from(words_per_minute.max(1));
    let minutes = (count + rate - 1) / rate;
    minutes.max(1).min(u64::from(u32::MAX)) as u32
}

/// Prefers an explicit `description` over the automatically extracted
/// excerpt.
pub fn resolve_excerpt(description: Option<&str>, auto_excerpt: Option<&str>) -> Option<String> {
    non_empty(description)
        .or_else(|| non_empty(auto_excerpt))
        .map(str::to_owned)
}

/// Prefers `cover`, falling back to `coverImage`.
pub fn resolve_cover<'a>(cover: Option<&'a str>, cover_image: Option<&'a str>) -> Option<&'a str> {
    non_empty(cover).or_else(|| non_empty(cover_image))
}

/// Prefers an explicit `title`; otherwise uses the last segment of `url`
/// without its markdown extension; otherwise [`UNTITLED`].
pub fn resolve_title(title: Option<&str>, url: &str) -> String {
    if let Some(title) = non_empty(title) {
        return title.to_owned();
    }
    url.rsplit('/')
        .next()
        .map(|segment| segment.trim_end_matches(MARKDOWN_EXTENSION))
        .filter(|segment| !segment.is_empty())
        .unwrap_or(UNTITLED)
        .to_owned()
}
