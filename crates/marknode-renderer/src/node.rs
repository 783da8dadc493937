//! Output node model.
//!
//! A rendered document is a tree of [`Node`] values: a closed set of kinds,
//! each carrying only the attributes relevant to it. Sibling identity is the
//! node's position in its parent's children.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Callback invoked by the display surface when an image finishes loading.
pub type ImageLoadCallback = Arc<dyn Fn() + Send + Sync>;

/// Horizontal alignment of a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextAlign {
    /// Natural alignment of the surface (no explicit alignment in the source).
    #[default]
    Auto,
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// CSS `text-align` value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl From<pulldown_cmark::Alignment> for TextAlign {
    fn from(align: pulldown_cmark::Alignment) -> Self {
        match align {
            pulldown_cmark::Alignment::None => Self::Auto,
            pulldown_cmark::Alignment::Left => Self::Left,
            pulldown_cmark::Alignment::Center => Self::Center,
            pulldown_cmark::Alignment::Right => Self::Right,
        }
    }
}

/// One renderable unit of output.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "value", rename_all = "snake_case")
)]
pub enum Node {
    /// Root container of a rendered text.
    Document(Vec<Node>),
    /// Plain text span.
    Text(String),
    LineBreak,
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    InlineCode(String),
    BlockQuote(Vec<Node>),
    Heading {
        /// Level 1-6.
        level: u8,
        /// Anchor id, unique within one rendered text.
        id: String,
        children: Vec<Node>,
    },
    Rule,
    List {
        ordered: bool,
        /// First number of an ordered list.
        start: Option<u64>,
        items: Vec<Node>,
    },
    ListItem(Vec<Node>),
    /// Task list marker.
    Checkbox { checked: bool },
    Paragraph(Vec<Node>),
    Table {
        /// Header row.
        head: Vec<Node>,
        /// Body rows.
        body: Vec<Node>,
    },
    TableRow(Vec<Node>),
    HeaderCell {
        align: TextAlign,
        children: Vec<Node>,
    },
    BodyCell {
        align: TextAlign,
        children: Vec<Node>,
    },
    Strong(Vec<Node>),
    Emphasis(Vec<Node>),
    Strikethrough(Vec<Node>),
    Link {
        href: String,
        title: Option<String>,
        /// Always set: links open in a new browsing context.
        new_tab: bool,
        children: Vec<Node>,
    },
    Image(Image),
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Kind name, as used in tree dumps and serialized output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Document(_) => "document",
            Self::Text(_) => "text",
            Self::LineBreak => "line_break",
            Self::CodeBlock { .. } => "code_block",
            Self::InlineCode(_) => "inline_code",
            Self::BlockQuote(_) => "block_quote",
            Self::Heading { .. } => "heading",
            Self::Rule => "rule",
            Self::List { .. } => "list",
            Self::ListItem(_) => "list_item",
            Self::Checkbox { .. } => "checkbox",
            Self::Paragraph(_) => "paragraph",
            Self::Table { .. } => "table",
            Self::TableRow(_) => "table_row",
            Self::HeaderCell { .. } => "header_cell",
            Self::BodyCell { .. } => "body_cell",
            Self::Strong(_) => "strong",
            Self::Emphasis(_) => "emphasis",
            Self::Strikethrough(_) => "strikethrough",
            Self::Link { .. } => "link",
            Self::Image(_) => "image",
        }
    }

    /// Direct children. Tables yield the header row followed by the body rows.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        let none: &[Node] = &[];
        let (first, second) = match self {
            Self::Document(children)
            | Self::BlockQuote(children)
            | Self::ListItem(children)
            | Self::Paragraph(children)
            | Self::TableRow(children)
            | Self::Strong(children)
            | Self::Emphasis(children)
            | Self::Strikethrough(children)
            | Self::Heading { children, .. }
            | Self::HeaderCell { children, .. }
            | Self::BodyCell { children, .. }
            | Self::Link { children, .. } => (children.as_slice(), none),
            Self::List { items, .. } => (items.as_slice(), none),
            Self::Table { head, body } => (head.as_slice(), body.as_slice()),
            Self::Text(_)
            | Self::LineBreak
            | Self::CodeBlock { .. }
            | Self::InlineCode(_)
            | Self::Rule
            | Self::Checkbox { .. }
            | Self::Image(_) => (none, none),
        };
        first.iter().chain(second)
    }

    /// Visit this node and all descendants in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Concatenated text content of the subtree.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| match node {
            Self::Text(text) | Self::InlineCode(text) => out.push_str(text),
            Self::CodeBlock { code, .. } => out.push_str(code),
            Self::LineBreak => out.push('\n'),
            Self::Image(image) => out.push_str(&image.alt),
            _ => {}
        });
        out
    }
}

/// Image node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Image {
    pub src: String,
    pub title: Option<String>,
    pub alt: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub on_load: LoadHook,
}

impl Image {
    /// Report that the underlying resource finished loading.
    ///
    /// Invokes the image-load callback, if any, the first time it is called
    /// for this image (and its clones); later calls do nothing. Returns
    /// whether this was the first load notification.
    pub fn loaded(&self) -> bool {
        self.on_load.fire()
    }
}

/// One-shot image load notification.
///
/// Clones share the fired flag, so a node and its copies notify at most once.
#[derive(Clone, Default)]
pub struct LoadHook {
    callback: Option<ImageLoadCallback>,
    fired: Arc<AtomicBool>,
}

impl LoadHook {
    #[must_use]
    pub fn new(callback: Option<ImageLoadCallback>) -> Self {
        Self {
            callback,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the hook has already fired.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        if let Some(callback) = &self.callback {
            callback();
        }
        true
    }
}

impl fmt::Debug for LoadHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadHook")
            .field("callback", &self.callback.is_some())
            .field("fired", &self.has_fired())
            .finish()
    }
}

// Hooks carry behavior, not content: two images are equal when their data is.
impl PartialEq for LoadHook {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for LoadHook {}
