use pulldown_cmark::{html, Options, Parser};

/// The markdown extensions enabled for every rendered document.
fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Converts markdown to HTML.
pub fn to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options()));
    out
}

/// Extracts the automatic excerpt of `body`: everything above the first line
/// that consists of `separator` alone, rendered to HTML. Returns `None` when
/// the separator never appears or nothing but whitespace precedes it.
pub fn excerpt(body: &str, separator: &str) -> Option<String> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_end() == separator {
            let head = &body[..offset];
            return match head.trim().is_empty() {
                true => None,
                false => Some(to_html(head)),
            };
        }
        offset += line.len();
    }
    None
}
