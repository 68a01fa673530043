//! The library code for `quill`, the build-time companion of a markdown
//! blog. Content lives as markdown files with YAML front-matter under a `docs`
//! root. The architecture is a small pipeline:
//!
//! 1. Scanning the content tree for markdown files ([`crate::scan`])
//! 2. Splitting each file into front-matter and body ([`crate::document`])
//! 3. Deriving display fields such as dates, excerpts and reading time
//!    ([`crate::date`], [`crate::derive`], [`crate::markdown`])
//! 4. Consuming the documents
//!
//! There are three consumers. The listing builder ([`crate::listing`]) turns
//! documents into the sorted post and moment records the site's pages render.
//! The index reporter ([`crate::index`]) writes a year-grouped index page. The
//! validator ([`crate::validate`]) reports missing fields and broken image
//! references.
//!
//! Every run recomputes everything from disk; nothing is cached between runs.
//! Time is always passed in through a [`crate::date::Clock`], and every
//! setting comes from [`crate::config::Config`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod date;
pub mod derive;
pub mod document;
pub mod index;
pub mod listing;
pub mod markdown;
pub mod moment;
pub mod post;
pub mod scan;
pub mod source;
pub mod tag;
pub mod util;
pub mod validate;

#[cfg(test)]
mod testutil;
