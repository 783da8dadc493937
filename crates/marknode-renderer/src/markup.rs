//! Markup renderer contract.
//!
//! The [`Compiler`](crate::Compiler) walks markdown bottom-up and asks a
//! [`MarkupRenderer`] to turn each construct into a string. A container's
//! callback receives the concatenated strings its children returned.
//!
//! Inline text, code spans, titles, destinations and alt text arrive
//! HTML-escaped. Code block bodies and raw HTML arrive as written.

use crate::node::TextAlign;

/// Table cell metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellFlags {
    /// Cell belongs to the header row.
    pub header: bool,
    /// Explicit column alignment, `None` when the source has none.
    pub align: Option<TextAlign>,
}

/// String-in, string-out callbacks, one per markdown construct.
pub trait MarkupRenderer {
    /// Fenced or indented code block.
    fn code(&mut self, code: &str, language: Option<&str>) -> String;

    fn blockquote(&mut self, quote: &str) -> String;

    /// Raw HTML block or inline tag.
    fn html(&mut self, html: &str) -> String;

    /// Heading. `raw` is the plain heading text, unescaped.
    fn heading(&mut self, text: &str, level: u8, raw: &str) -> String;

    /// Thematic break.
    fn hr(&mut self) -> String;

    /// `start` is the first number of an ordered list.
    fn list(&mut self, body: &str, ordered: bool, start: Option<u64>) -> String;

    fn listitem(&mut self, text: &str) -> String;

    /// Task list marker at the start of a list item.
    fn checkbox(&mut self, checked: bool) -> String;

    fn paragraph(&mut self, text: &str) -> String;

    /// `header` is one rendered row, `body` the rendered body rows.
    fn table(&mut self, header: &str, body: &str) -> String;

    fn tablerow(&mut self, content: &str) -> String;

    fn tablecell(&mut self, content: &str, flags: CellFlags) -> String;

    fn strong(&mut self, text: &str) -> String;

    fn em(&mut self, text: &str) -> String;

    fn codespan(&mut self, text: &str) -> String;

    /// Hard line break.
    fn br(&mut self) -> String;

    /// Strikethrough.
    fn del(&mut self, text: &str) -> String;

    fn link(&mut self, href: &str, title: Option<&str>, text: &str) -> String;

    /// `text` is the image alt text.
    fn image(&mut self, href: &str, title: Option<&str>, text: &str) -> String;

    fn text(&mut self, text: &str) -> String;
}
