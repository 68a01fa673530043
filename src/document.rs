//! Defines the [`Document`], [`Frontmatter`] and [`Error`] types and the logic
//! for reading markdown sources from disk. A source file may begin with a
//! YAML header fenced by `---` lines:
//!
//! ```md
//! ---
//! title: Hello, world!
//! date: 2024-04-16
//! tags: [greet]
//! ---
//! # Hello
//!
//! World
//! ```
//!
//! A file without an opening fence has an empty header and is all body.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;

use crate::date::RawDate;
use crate::tag::Tags;
use crate::util::{non_empty, scalar_to_string};

const FENCE: &str = "---";

/// A markdown source file split into its header and body.
#[derive(Clone, Debug)]
pub struct Document {
    /// The path the document was read from.
    pub path: PathBuf,

    /// The parsed YAML header.
    pub frontmatter: Frontmatter,

    /// Everything after the header.
    pub body: String,
}

/// The YAML header of a [`Document`]. Keys that are absent deserialize to
/// `None`, so absent and empty values stay distinguishable. Keys without a
/// dedicated field are kept in `extra`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    #[serde(default, deserialize_with = "scalar")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "optional_date")]
    pub date: Option<RawDate>,

    #[serde(default)]
    pub tags: Option<Tags>,

    #[serde(default, deserialize_with = "scalar")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "scalar")]
    pub cover: Option<String>,

    #[serde(default, deserialize_with = "scalar")]
    pub cover_image: Option<String>,

    #[serde(default, deserialize_with = "scalar")]
    pub location: Option<String>,

    #[serde(default)]
    pub images: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Frontmatter {
    /// The title, unless it's missing or empty.
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    /// The tags, unless they're missing or empty.
    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref().filter(|tags| !tags.is_empty())
    }
}

/// Deserializes an optional scalar as text so that e.g. `title: 2024` reads
/// as `"2024"`.
fn scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom("expected a string")),
    }
}

/// Deserializes an optional date, reading blank text as no date.
fn optional_date<'de, D>(deserializer: D) -> std::result::Result<Option<RawDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawDate>::deserialize(deserializer)?.filter(|raw| !raw.is_blank()))
}

impl Document {
    /// Reads and parses the document at `path`.
    pub fn read(path: &Path) -> Result<Document> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Annotated(format!("reading `{}`", path.display()), Box::new(e.into()))
        })?;
        Document::parse(path.to_owned(), &contents)
    }

    /// Parses a document from its source text.
    pub fn parse(path: PathBuf, input: &str) -> Result<Document> {
        match Document::_parse(input) {
            Ok((frontmatter, body)) => Ok(Document {
                path,
                frontmatter,
                body: body.to_owned(),
            }),
            Err(e) => Err(Error::Annotated(
                format!("parsing `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse(input: &str) -> Result<(Frontmatter, &str)> {
        let input = input.trim_start_matches('\u{feff}');
        match frontmatter_indices(input)? {
            None => Ok((Frontmatter::default(), input)),
            Some((yaml_start, yaml_stop, body_start)) => {
                let yaml = &input[yaml_start..yaml_stop];
                let frontmatter = match yaml.trim().is_empty() {
                    true => Frontmatter::default(),
                    false => serde_yaml::from_str(yaml)?,
                };
                Ok((frontmatter, &input[body_start..]))
            }
        }
    }
}

/// Locates the YAML header. Returns `(yaml_start, yaml_stop, body_start)`, or
/// `None` if the input doesn't open with a fence line.
fn frontmatter_indices(input: &str) -> Result<Option<(usize, usize, usize)>> {
    let mut lines = input.split_inclusive('\n');
    let yaml_start = match lines.next() {
        Some(first) if first.trim_end() == FENCE => first.len(),
        _ => return Ok(None),
    };

    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == FENCE {
            return Ok(Some((yaml_start, offset, offset + line.len())));
        }
        offset += line.len();
    }
    Err(Error::FrontmatterMissingEndFence)
}

/// A document that couldn't be parsed.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: Error,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Reads every path in order. An unreadable file aborts the whole load, but a
/// file with a malformed header only yields a [`Failure`] in its slot so the
/// remaining documents are still read.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<std::result::Result<Document, Failure>>> {
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        match Document::read(path) {
            Ok(document) => loaded.push(Ok(document)),
            Err(e) if e.is_parse() => loaded.push(Err(Failure {
                path: path.clone(),
                error: e,
            })),
            Err(e) => return Err(e),
        }
    }
    Ok(loaded)
}

/// Keeps the successfully parsed documents, logging each failure.
pub fn parsed(loaded: Vec<std::result::Result<Document, Failure>>) -> Vec<Document> {
    loaded
        .into_iter()
        .filter_map(|result| match result {
            Ok(document) => Some(document),
            Err(failure) => {
                log::warn!("skipping {}", failure);
                None
            }
        })
        .collect()
}

/// Represents the result of a [`Document`]-read operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading a [`Document`].
#[derive(Debug)]
pub enum Error {
    /// Returned when a header's opening fence (`---`) has no closing fence.
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the header as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl Error {
    /// Returns `true` for errors caused by malformed document contents, as
    /// opposed to I/O failures.
    pub fn is_parse(&self) -> bool {
        match self {
            Error::FrontmatterMissingEndFence | Error::DeserializeYaml(_) => true,
            Error::Io(_) => false,
            Error::Annotated(_, err) => err.is_parse(),
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingEndFence => {
                write!(f, "front-matter is missing its closing `---`")
            }
            Error::DeserializeYaml(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "{}", err),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{markdown, write};
    use tempfile::TempDir;

    fn parse(input: &str) -> Result<Document> {
        Document::parse(PathBuf::from("docs/test.md"), input)
    }

    #[test]
    fn test_parse_recognized_keys() -> Result<()> {
        let doc = parse(&markdown(
            "title: Hello\ndate: 2024-01-05\ntags: [a, b]\ncoverImage: /c.png\nlayout: doc",
            "# Body\n",
        ))?;
        let fm = &doc.frontmatter;
        assert_eq!(fm.title(), Some("Hello"));
        assert_eq!(fm.date, Some(RawDate::Text("2024-01-05".to_owned())));
        assert_eq!(fm.tags().map(Tags::len), Some(2));
        assert_eq!(fm.cover, None);
        assert_eq!(fm.cover_image.as_deref(), Some("/c.png"));
        assert_eq!(fm.extra.get("layout"), Some(&Value::String("doc".to_owned())));
        assert_eq!(doc.body, "# Body\n");
        Ok(())
    }

    #[test]
    fn test_parse_distinguishes_missing_from_empty() -> Result<()> {
        let doc = parse(&markdown("title: ''\ntags: []", ""))?;
        assert_eq!(doc.frontmatter.title.as_deref(), Some(""));
        assert_eq!(doc.frontmatter.title(), None);
        assert_eq!(doc.frontmatter.tags, Some(Tags::default()));
        assert!(doc.frontmatter.tags().is_none());
        assert!(doc.frontmatter.date.is_none());
        Ok(())
    }

    #[test]
    fn test_parse_blank_date_as_missing() -> Result<()> {
        for header in &["date: ''", "date: '  '", "date:"] {
            let doc = parse(&markdown(header, ""))?;
            assert!(doc.frontmatter.date.is_none(), "{}", header);
        }
        Ok(())
    }

    #[test]
    fn test_parse_epoch_date_and_numeric_title() -> Result<()> {
        let doc = parse(&markdown("title: 2024\ndate: 1704412800000", ""))?;
        assert_eq!(doc.frontmatter.title(), Some("2024"));
        assert_eq!(doc.frontmatter.date, Some(RawDate::Epoch(1_704_412_800_000)));
        Ok(())
    }

    #[test]
    fn test_parse_without_header() -> Result<()> {
        let doc = parse("# Just a page\n\n---\n\nwith a rule\n")?;
        assert!(doc.frontmatter.title.is_none());
        assert_eq!(doc.body, "# Just a page\n\n---\n\nwith a rule\n");
        Ok(())
    }

    #[test]
    fn test_parse_empty_header_crlf_and_bom() -> Result<()> {
        let doc = parse("\u{feff}---\r\n---\r\nbody")?;
        assert!(doc.frontmatter.tags.is_none());
        assert_eq!(doc.body, "body");
        Ok(())
    }

    #[test]
    fn test_parse_body_keeps_later_rules() -> Result<()> {
        let doc = parse("---\ntitle: x\n---\nabove\n\n---\n\nbelow\n")?;
        assert_eq!(doc.body, "above\n\n---\n\nbelow\n");
        Ok(())
    }

    #[test]
    fn test_parse_unterminated_header() {
        let err = parse("---\ntitle: x\nno closing fence\n").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("docs/test.md"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse(&markdown("title: [unclosed", "")).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_load_all_isolates_parse_failures() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let good = write(dir.path(), "good.md", &markdown("title: Good", ""));
        let bad = write(dir.path(), "bad.md", "---\ntitle: Bad\n");

        let loaded = load_all(&[bad.clone(), good.clone()])?;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].as_ref().unwrap_err().path, bad);
        assert_eq!(loaded[1].as_ref().unwrap().path, good);

        let documents = parsed(loaded);
        assert_eq!(documents.len(), 1);
        Ok(())
    }

    #[test]
    fn test_load_all_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = load_all(&[dir.path().join("missing.md")]).unwrap_err();
        assert!(!err.is_parse());
    }
}
