//! Turns documents into the ordered listings the site renders: posts (tagged
//! documents anywhere under the content root) and moments (every document in
//! the moments directory). Both listings are sorted newest first; documents
//! with equal dates keep their scan order.

use crate::config::{Config, ListingOptions};
use crate::date::Clock;
use crate::document::{parsed, Document};
use crate::moment::MomentEntry;
use crate::post::PostEntry;
use crate::source::{load_tree, Result};
use std::path::Path;

/// Builds listings from parsed documents.
pub struct Listing<'a> {
    /// URLs are computed relative to `root`.
    root: &'a Path,

    options: &'a ListingOptions,

    /// Supplies the date of undated documents.
    clock: &'a dyn Clock,
}

impl<'a> Listing<'a> {
    /// Constructs a new listing builder. See fields on [`Listing`] for
    /// argument descriptions.
    pub fn new(root: &'a Path, options: &'a ListingOptions, clock: &'a dyn Clock) -> Listing<'a> {
        Listing {
            root,
            options,
            clock,
        }
    }

    /// The post listing of `documents`. Documents without tags are left out,
    /// as are documents whose date can't be interpreted (with a warning).
    pub fn posts(&self, documents: &[Document]) -> Vec<PostEntry> {
        let mut posts: Vec<PostEntry> = documents
            .iter()
            .filter_map(|document| {
                match PostEntry::from_document(document, self.root, self.options, self.clock) {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("skipping post `{}`: {}", document.path.display(), e);
                        None
                    }
                }
            })
            .collect();
        posts.sort_by(|a, b| b.date.time.cmp(&a.date.time));
        posts
    }

    /// The moment listing of `documents`. Every document becomes a moment
    /// unless its date can't be interpreted (with a warning).
    pub fn moments(&self, documents: &[Document]) -> Vec<MomentEntry> {
        let mut moments: Vec<MomentEntry> = documents
            .iter()
            .filter_map(|document| {
                match MomentEntry::from_document(document, self.options, self.clock) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        log::warn!("skipping moment `{}`: {}", document.path.display(), e);
                        None
                    }
                }
            })
            .collect();
        moments.sort_by(|a, b| b.date.time.cmp(&a.date.time));
        moments
    }
}

/// Scans the content root and returns its post listing.
pub fn load_posts(config: &Config, clock: &dyn Clock) -> Result<Vec<PostEntry>> {
    let documents = parsed(load_tree(&config.docs_directory, None, &|p: &Path| {
        config.is_generated(p)
    })?);
    Ok(Listing::new(&config.docs_directory, &config.listing, clock).posts(&documents))
}

/// Scans the moments directory (not its subdirectories) and returns its
/// moment listing.
pub fn load_moments(config: &Config, clock: &dyn Clock) -> Result<Vec<MomentEntry>> {
    let documents = parsed(load_tree(&config.moments_directory, Some(1), &|p: &Path| {
        config.is_generated(p)
    })?);
    Ok(Listing::new(&config.docs_directory, &config.listing, clock).moments(&documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::FixedClock;
    use crate::testutil::{markdown, write};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
    }

    fn site() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let config = Config::with_root(dir.path());
        let docs = dir.path().join("docs");
        write(&docs, "a-old.md", &markdown("title: Old\ndate: 2023-03-01\ntags: [x]", "old"));
        write(&docs, "b-page.md", &markdown("title: About", "no tags here"));
        write(&docs, "c-new.md", &markdown("title: New\ndate: 2025-01-01\ntags: [y]", "new"));
        write(&docs, "d-empty.md", &markdown("title: Empty\ntags: []", ""));
        write(&docs, "e-tie.md", &markdown("title: Tie\ndate: 2023-03-01\ntags: [x]", ""));
        write(&docs, "notes/f-mid.md", &markdown("date: 2024-07-01\ntags: z", ""));
        write(&docs, "g-broken.md", "---\ntags: [x]\n");
        write(&docs, "h-baddate.md", &markdown("date: someday\ntags: [x]", ""));
        write(&docs, "Moments/m1.md", &markdown("date: 2024-01-01 09:00", "first"));
        write(&docs, "Moments/m2.md", &markdown("date: 2024-02-01 09:00", "second"));
        write(&docs, "Moments/old/m0.md", &markdown("date: 2020-01-01", "nested"));
        (dir, config)
    }

    #[test]
    fn test_posts_filter_and_order() -> Result<()> {
        let (_dir, config) = site();
        let posts = load_posts(&config, &clock())?;
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "f-mid", "Old", "Tie"]);
        assert_eq!(posts[1].url, "/notes/f-mid");
        Ok(())
    }

    #[test]
    fn test_posts_non_increasing_and_idempotent() -> Result<()> {
        let (_dir, config) = site();
        let first = load_posts(&config, &clock())?;
        for pair in first.windows(2) {
            assert!(pair[0].date.time >= pair[1].date.time);
        }
        assert_eq!(first, load_posts(&config, &clock())?);
        Ok(())
    }

    #[test]
    fn test_undated_post_uses_clock() {
        let documents = vec![
            Document::parse("docs/old.md".into(), &markdown("date: 2020-01-01\ntags: [a]", ""))
                .unwrap(),
            Document::parse("docs/undated.md".into(), &markdown("tags: [a]", "")).unwrap(),
        ];
        let options = ListingOptions::default();
        let clock = clock();
        let posts = Listing::new(Path::new("docs"), &options, &clock).posts(&documents);
        assert_eq!(posts[0].url, "/undated");
        assert_eq!(posts[0].date.time, clock.0.timestamp_millis());
    }

    #[test]
    fn test_blank_date_post_is_listed() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let config = Config::with_root(dir.path());
        write(
            &dir.path().join("docs"),
            "a.md",
            &markdown("title: A\ndate: ''\ntags: [x]", ""),
        );

        let posts = load_posts(&config, &clock())?;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].date.time, clock().0.timestamp_millis());
        Ok(())
    }

    #[test]
    fn test_moments_are_shallow_and_sorted() -> Result<()> {
        let (_dir, config) = site();
        let moments = load_moments(&config, &clock())?;
        let bodies: Vec<&str> = moments.iter().map(|m| m.html.as_str()).collect();
        assert_eq!(bodies, vec!["<p>second</p>\n", "<p>first</p>\n"]);
        Ok(())
    }

    #[test]
    fn test_missing_moments_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("docs"), "a.md", "");
        let config = Config::with_root(dir.path());
        assert!(load_moments(&config, &clock()).is_err());
    }
}
