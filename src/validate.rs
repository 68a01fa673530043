//! Checks every document under the content root and reports problems without
//! changing anything. Errors are content defects that should fail a build;
//! warnings are advisory. One broken document never hides findings in the
//! others.

use crate::config::Config;
use crate::date;
use crate::document::Document;
use crate::source::{load_tree, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The outcome of [`Validator::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// `true` iff `errors` is empty.
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// What's wrong with a document.
enum Problem<'a> {
    MalformedFrontmatter(String),
    MissingTitle,
    InvalidDate(date::Error),
    MissingDate,
    MissingTags,
    MissingImage(&'a str),
}

impl fmt::Display for Problem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Problem::MalformedFrontmatter(err) => write!(f, "front-matter 解析失败: {}", err),
            Problem::MissingTitle => write!(f, "缺少 title 字段"),
            Problem::InvalidDate(err) => write!(f, "date 字段无效: {}", err),
            Problem::MissingDate => {
                write!(f, "缺少 date 字段，将使用文件修改时间")
            }
            Problem::MissingTags => write!(f, "缺少 tags 字段，建议添加标签分类"),
            Problem::MissingImage(image) => write!(f, "图片路径可能无效 {}", image),
        }
    }
}

/// Accumulates findings in scan order.
#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn error(&mut self, path: &Path, problem: Problem) {
        self.errors.push(format!("文件 {}: {}", path.display(), problem));
    }

    fn warning(&mut self, path: &Path, problem: Problem) {
        self.warnings.push(format!("文件 {}: {}", path.display(), problem));
    }

    fn finish(self) -> ValidationReport {
        ValidationReport {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

/// Validates the content tree described by a [`Config`].
pub struct Validator<'a> {
    config: &'a Config,
    image: Regex,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a Config) -> Validator<'a> {
        Validator {
            config,
            // the pattern is a literal; compiling it can't fail
            image: Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap(),
        }
    }

    /// Checks every markdown file under the content root. Only failing to
    /// scan or read the tree is an `Err`; everything else is a finding.
    pub fn validate(&self) -> Result<ValidationReport> {
        let loaded = load_tree(&self.config.docs_directory, None, &|p: &Path| {
            self.config.is_generated(p)
        })?;

        let mut findings = Findings::default();
        for result in &loaded {
            match result {
                Ok(document) => self.check(document, &mut findings),
                Err(failure) => findings.error(
                    &failure.path,
                    Problem::MalformedFrontmatter(failure.error.to_string()),
                ),
            }
        }
        let report = findings.finish();
        log::debug!(
            "validated {} files: {} errors, {} warnings",
            loaded.len(),
            report.errors.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn check(&self, document: &Document, findings: &mut Findings) {
        let path = &document.path;
        let frontmatter = &document.frontmatter;

        if frontmatter.title().is_none() {
            findings.error(path, Problem::MissingTitle);
        }

        match &frontmatter.date {
            Some(raw) if !raw.is_blank() => {
                if let Err(e) = date::interpret(raw, &self.config.listing.locale.offset) {
                    findings.error(path, Problem::InvalidDate(e));
                }
            }
            _ => findings.warning(path, Problem::MissingDate),
        }

        if frontmatter.tags().is_none() {
            findings.warning(path, Problem::MissingTags);
        }

        for captures in self.image.captures_iter(&document.body) {
            if let Some(target) = captures.get(2) {
                if !self.image_exists(target.as_str()) {
                    findings.warning(path, Problem::MissingImage(target.as_str()));
                }
            }
        }
    }

    /// Absolute site paths must exist in the public directory. Relative paths
    /// are resolved by the site's bundler and are not checked.
    fn image_exists(&self, image: &str) -> bool {
        match image.strip_prefix('/') {
            Some(relative) => self.config.public_directory.join(relative).exists(),
            None => true,
        }
    }
}
