//! Per-pass compilation state and text helpers.
//!
//! The compiler keeps one of each tracker per pass; the helpers are shared by
//! every markup renderer.

use std::borrow::Cow;
use std::collections::HashMap;

use pulldown_cmark::Alignment;

use crate::node::TextAlign;

/// Open fenced or indented code block.
struct OpenCode {
    language: Option<String>,
    body: String,
}

/// Code block being collected. Body text bypasses the frame stack.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    open: Option<OpenCode>,
}

impl CodeBlockState {
    pub(crate) fn open(&mut self, language: Option<String>) {
        self.open = Some(OpenCode {
            language,
            body: String::new(),
        });
    }

    /// Close the block, returning its language and raw body.
    pub(crate) fn close(&mut self) -> Option<(Option<String>, String)> {
        self.open.take().map(|code| (code.language, code.body))
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        if let Some(code) = &mut self.open {
            code.body.push_str(text);
        }
    }
}

/// Position inside the current table.
#[derive(Default)]
pub(crate) struct TableState {
    /// Explicit alignment per column.
    columns: Vec<Option<TextAlign>>,
    head: bool,
    column: usize,
}

impl TableState {
    pub(crate) fn begin(&mut self, alignments: &[Alignment]) {
        self.columns = alignments
            .iter()
            .map(|&align| (align != Alignment::None).then(|| align.into()))
            .collect();
        self.head = false;
        self.column = 0;
    }

    pub(crate) fn enter_head(&mut self) {
        self.head = true;
        self.column = 0;
    }

    pub(crate) fn leave_head(&mut self) {
        self.head = false;
    }

    pub(crate) fn enter_row(&mut self) {
        self.column = 0;
    }

    /// Move on to the next cell of the row.
    pub(crate) fn advance(&mut self) {
        self.column += 1;
    }

    pub(crate) fn in_head(&self) -> bool {
        self.head
    }

    /// Explicit alignment of the current column, if the source gives one.
    pub(crate) fn alignment(&self) -> Option<TextAlign> {
        self.columns.get(self.column).copied().flatten()
    }
}

/// Alt text of the image being collected.
///
/// Markup nested inside the alt text is flattened; nested images only
/// contribute their own alt text.
#[derive(Default)]
pub(crate) struct ImageState {
    depth: usize,
    alt: String,
}

impl ImageState {
    /// Enter an image. Returns `true` for the outermost one.
    pub(crate) fn start(&mut self) -> bool {
        self.depth += 1;
        let outermost = self.depth == 1;
        if outermost {
            self.alt.clear();
        }
        outermost
    }

    /// Leave an image. Returns the alt text when the outermost one closes.
    pub(crate) fn end(&mut self) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        (self.depth == 0).then(|| std::mem::take(&mut self.alt))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt.push_str(text);
    }
}

/// Heading anchor ids, unique within one pass.
#[derive(Default)]
pub(crate) struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    /// Slug `text`; repeats get `-1`, `-2`, ... appended.
    pub(crate) fn unique_id(&mut self, text: &str) -> String {
        let slug = slugify(text);
        match self.seen.get_mut(&slug) {
            Some(repeats) => {
                *repeats += 1;
                format!("{slug}-{repeats}")
            }
            None => {
                self.seen.insert(slug.clone(), 0);
                slug
            }
        }
    }
}

/// Lowercase ASCII words of `text` joined by dashes.
///
/// Whitespace, dashes and underscores separate words; every other
/// non-alphanumeric character is dropped.
pub(crate) fn slugify(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        _ => None,
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    for (i, c) in s.char_indices() {
        if let Some(entity) = escape_char(c) {
            out.push_str(&s[copied..i]);
            out.push_str(entity);
            copied = i + c.len_utf8();
        }
    }
    out.push_str(&s[copied..]);
    out
}

/// Decode HTML entities (named and numeric).
#[must_use]
pub fn unescape(s: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("a  -  b"), "a-b");
        assert_eq!(slugify("snake_case-name"), "snake-case-name");
        assert_eq!(slugify("¿Qué?"), "qu");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugger_deduplicates() {
        let mut slugger = Slugger::default();
        assert_eq!(slugger.unique_id("FAQ"), "faq");
        assert_eq!(slugger.unique_id("FAQ"), "faq-1");
        assert_eq!(slugger.unique_id("faq"), "faq-2");
        assert_eq!(slugger.unique_id("Other"), "other");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_html("x & y"), "x &amp; y");
        assert_eq!(escape_html(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_html("don't"), "don&#x27;t");
        assert_eq!(escape_html("naïve"), "naïve");
    }

    #[test]
    fn test_unescape_reverses_escape() {
        let raw = r#"<a href="x">it's & more</a>"#;
        assert_eq!(unescape(&escape_html(raw)), raw);
        assert_eq!(unescape("&#58;&#x3A;"), "::");
        assert_eq!(unescape("plain & simple"), "plain & simple");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        state.push_str("ignored");
        assert!(!state.is_open());

        state.open(Some("sh".to_owned()));
        state.push_str("ls\n");
        state.push_str("pwd\n");
        assert!(state.is_open());
        assert_eq!(
            state.close(),
            Some((Some("sh".to_owned()), "ls\npwd\n".to_owned()))
        );
        assert_eq!(state.close(), None);
    }

    #[test]
    fn test_table_state_alignment() {
        let mut state = TableState::default();
        state.begin(&[Alignment::Center, Alignment::None]);

        state.enter_head();
        assert!(state.in_head());
        assert_eq!(state.alignment(), Some(TextAlign::Center));
        state.advance();
        assert_eq!(state.alignment(), None);
        state.advance();
        assert_eq!(state.alignment(), None);

        state.leave_head();
        state.enter_row();
        assert!(!state.in_head());
        assert_eq!(state.alignment(), Some(TextAlign::Center));
    }

    #[test]
    fn test_nested_image_alt() {
        let mut state = ImageState::default();
        assert!(state.start());
        state.push_str("outer ");
        assert!(!state.start());
        state.push_str("inner");
        assert_eq!(state.end(), None);
        assert!(state.is_active());
        assert_eq!(state.end(), Some("outer inner".to_owned()));
        assert!(!state.is_active());
    }
}
