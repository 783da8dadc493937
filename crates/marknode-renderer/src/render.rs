//! Rendering entry points.
//!
//! A [`Renderer`] turns one input text into one [`Node`] tree. Plain text
//! becomes lines separated by line breaks; everything else is compiled as
//! markdown through [`NodeRenderer`].

use std::borrow::Cow;
use std::sync::LazyLock;

use marknode_config::{Format, OptionOverrides, RenderOptions};
use regex::Regex;

use crate::adapter::NodeRenderer;
use crate::compiler::Compiler;
use crate::error::RenderError;
use crate::html::HtmlRenderer;
use crate::node::{ImageLoadCallback, Node};
use crate::util::normalize_newlines;

/// Inline `<br>` tags in any spelling: `<br>`, `<BR/>`, `<br />`.
static BR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

/// Heading of the document produced for a failed pass in silent mode.
const ERROR_HEADING: &str = "An error occurred:";

/// Configured renderer for input texts.
///
/// # Example
///
/// ```
/// use marknode_config::Format;
/// use marknode_renderer::{Node, Renderer};
///
/// let renderer = Renderer::new().with_format(Format::Plain);
/// let tree = renderer.render("one\ntwo").unwrap().unwrap();
///
/// assert_eq!(
///     tree,
///     Node::Document(vec![
///         Node::text("one"),
///         Node::LineBreak,
///         Node::text("two"),
///         Node::LineBreak,
///     ])
/// );
/// assert_eq!(renderer.render("").unwrap(), None);
/// ```
#[derive(Clone, Default)]
pub struct Renderer {
    format: Format,
    options: RenderOptions,
    on_image_load: Option<ImageLoadCallback>,
}

impl Renderer {
    /// Markdown renderer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Use the default options with `overrides` applied on top.
    #[must_use]
    pub fn with_options(mut self, overrides: &OptionOverrides) -> Self {
        self.options = RenderOptions::merged(overrides);
        self
    }

    /// Use fully resolved options.
    #[must_use]
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Callback for images of rendered trees that finish loading.
    #[must_use]
    pub fn with_image_load(mut self, callback: ImageLoadCallback) -> Self {
        self.on_image_load = Some(callback);
        self
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `text` into a document tree.
    ///
    /// Returns `Ok(None)` for empty input. Compiler failures surface as
    /// errors unless the `silent` option turns them into an error document.
    pub fn render(&self, text: &str) -> Result<Option<Node>, RenderError> {
        if text.is_empty() {
            return Ok(None);
        }
        let document = match self.format {
            Format::Plain => render_plain(text),
            Format::Markdown => self.recover(self.render_markdown(text))?,
        };
        Ok(Some(document))
    }

    fn render_markdown(&self, text: &str) -> Result<Node, RenderError> {
        let markdown = prepare_markdown(text);
        let mut renderer = NodeRenderer::new(&self.options, self.on_image_load.clone());
        let stream = Compiler::new(self.options).compile(&markdown, &mut renderer)?;
        Ok(Node::Document(renderer.finish(&stream)))
    }

    fn recover(&self, result: Result<Node, RenderError>) -> Result<Node, RenderError> {
        match result {
            Err(e) if self.options.silent => {
                tracing::warn!(error = %e, "Markdown rendering failed");
                Ok(error_document(&e))
            }
            other => other,
        }
    }
}

/// Render `text` with a one-off [`Renderer`].
///
/// `None` and empty input both yield `Ok(None)`.
pub fn render(
    text: Option<&str>,
    format: Format,
    overrides: &OptionOverrides,
    on_image_load: Option<ImageLoadCallback>,
) -> Result<Option<Node>, RenderError> {
    let Some(text) = text else {
        return Ok(None);
    };
    let mut renderer = Renderer::new().with_format(format).with_options(overrides);
    renderer.on_image_load = on_image_load;
    renderer.render(text)
}

/// Compile markdown `text` to an HTML string.
///
/// # Example
///
/// ```
/// use marknode_config::RenderOptions;
///
/// let html = marknode_renderer::render_html("a<br>b", &RenderOptions::default()).unwrap();
/// assert_eq!(html, "<p>a</p><p>b</p>");
/// ```
pub fn render_html(text: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let mut renderer = HtmlRenderer::new(options);
    Compiler::new(*options).compile(&prepare_markdown(text), &mut renderer)
}

/// One text node and one line break per line.
fn render_plain(text: &str) -> Node {
    let children = normalize_newlines(text)
        .split('\n')
        .flat_map(|line| [Node::text(line), Node::LineBreak])
        .collect();
    Node::Document(children)
}

/// Inline breaks separate paragraphs.
fn prepare_markdown(text: &str) -> Cow<'_, str> {
    BR_TAG.replace_all(text, "\n\n")
}

fn error_document(error: &RenderError) -> Node {
    Node::Document(vec![
        Node::Paragraph(vec![Node::text(ERROR_HEADING)]),
        Node::CodeBlock {
            language: None,
            code: error.to_string(),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TextAlign;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn markdown(text: &str) -> Vec<Node> {
        markdown_with(text, &OptionOverrides::default())
    }

    fn markdown_with(text: &str, overrides: &OptionOverrides) -> Vec<Node> {
        match render(Some(text), Format::Markdown, overrides, None) {
            Ok(Some(Node::Document(children))) => children,
            other => panic!("expected a document, got {other:?}"),
        }
    }

    fn sanitize() -> OptionOverrides {
        OptionOverrides {
            sanitize: Some(true),
            ..OptionOverrides::default()
        }
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let overrides = OptionOverrides::default();
        for format in [Format::Plain, Format::Markdown] {
            assert_eq!(render(None, format, &overrides, None).unwrap(), None);
            assert_eq!(render(Some(""), format, &overrides, None).unwrap(), None);
        }
    }

    #[test]
    fn test_plain_one_break_per_line() {
        for text in ["one", "one\ntwo", "a\r\nb\r\nc", "trailing\n", "\n\n"] {
            let tree = Renderer::new()
                .with_format(Format::Plain)
                .render(text)
                .unwrap()
                .unwrap();
            let mut breaks = 0;
            tree.walk(&mut |node| {
                if *node == Node::LineBreak {
                    breaks += 1;
                }
            });
            assert_eq!(breaks, normalize_newlines(text).split('\n').count(), "{text:?}");
        }
    }

    #[test]
    fn test_plain_keeps_markup_literal() {
        let tree = Renderer::new()
            .with_format(Format::Plain)
            .render("**not bold** &amp;")
            .unwrap();
        assert_eq!(
            tree,
            Some(Node::Document(vec![
                Node::text("**not bold** &amp;"),
                Node::LineBreak,
            ]))
        );
    }

    #[test]
    fn test_paragraph_with_spans() {
        assert_eq!(
            markdown("Hello **bold** *it* ~~gone~~ `c&d`"),
            vec![Node::Paragraph(vec![
                Node::text("Hello "),
                Node::Strong(vec![Node::text("bold")]),
                Node::text(" "),
                Node::Emphasis(vec![Node::text("it")]),
                Node::text(" "),
                Node::Strikethrough(vec![Node::text("gone")]),
                Node::text(" "),
                Node::InlineCode("c&d".to_owned()),
            ])]
        );
    }

    #[test]
    fn test_soft_break_leaks_into_text() {
        assert_eq!(
            markdown("a\nb"),
            vec![Node::Paragraph(vec![
                Node::text("a"),
                Node::text("\n"),
                Node::text("b"),
            ])]
        );
    }

    #[test]
    fn test_breaks_option_hard_breaks() {
        let overrides = OptionOverrides {
            breaks: Some(true),
            ..OptionOverrides::default()
        };
        assert_eq!(
            markdown_with("a\nb", &overrides),
            vec![Node::Paragraph(vec![
                Node::text("a"),
                Node::LineBreak,
                Node::text("b"),
            ])]
        );
    }

    #[test]
    fn test_br_tags_split_paragraphs() {
        assert_eq!(
            markdown("one<br>two<BR />three"),
            vec![
                Node::Paragraph(vec![Node::text("one")]),
                Node::Paragraph(vec![Node::text("two")]),
                Node::Paragraph(vec![Node::text("three")]),
            ]
        );
    }

    #[test]
    fn test_accepted_link() {
        assert_eq!(
            markdown("[go](https://example.com \"t\")"),
            vec![Node::Paragraph(vec![Node::Link {
                href: "https://example.com".to_owned(),
                title: Some("t".to_owned()),
                new_tab: true,
                children: vec![Node::text("go")],
            }])]
        );
    }

    #[test]
    fn test_unsafe_link_dropped() {
        for text in [
            "[go](javascript:alert(1))",
            "[go](javascript:alert(1) \"title\")",
            "[**bold** text](javascript:alert(1))",
        ] {
            assert_eq!(
                markdown_with(text, &sanitize()),
                vec![Node::Paragraph(vec![])],
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_unsafe_link_kept_without_sanitize() {
        let nodes = markdown("[go](javascript:alert(1))");
        assert!(matches!(
            nodes.as_slice(),
            [Node::Paragraph(children)] if matches!(children.as_slice(), [Node::Link { .. }])
        ));
    }

    #[test]
    fn test_table_structure() {
        let nodes = markdown("| A | B |\n|---|---|\n| 1 | 2 |");
        let header = |text: &str| Node::HeaderCell {
            align: TextAlign::Auto,
            children: vec![Node::text(text)],
        };
        let cell = |text: &str| Node::BodyCell {
            align: TextAlign::Auto,
            children: vec![Node::text(text)],
        };
        assert_eq!(
            nodes,
            vec![Node::Table {
                head: vec![Node::TableRow(vec![header("A"), header("B")])],
                body: vec![Node::TableRow(vec![cell("1"), cell("2")])],
            }]
        );
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            markdown("# Title\n\n> - one\n> - [x] two\n\n---\n\n```sh\nls\n```"),
            vec![
                Node::Heading {
                    level: 1,
                    id: "title".to_owned(),
                    children: vec![Node::text("Title")],
                },
                Node::BlockQuote(vec![Node::List {
                    ordered: false,
                    start: None,
                    items: vec![
                        Node::ListItem(vec![Node::text("one")]),
                        Node::ListItem(vec![
                            Node::Checkbox { checked: true },
                            Node::text("two"),
                        ]),
                    ],
                }]),
                Node::Rule,
                Node::CodeBlock {
                    language: Some("sh".to_owned()),
                    code: "ls".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_raw_html_is_text() {
        assert_eq!(
            markdown("a <b>x</b>"),
            vec![Node::Paragraph(vec![
                Node::text("a "),
                Node::text("<b>"),
                Node::text("x"),
                Node::text("</b>"),
            ])]
        );
    }

    #[test]
    fn test_every_node_consumed() {
        let options = RenderOptions::default();
        let mut renderer = NodeRenderer::new(&options, None);
        let stream = Compiler::new(options)
            .compile(
                "# T\n\n* a\n* **b** [l](https://x.io)\n\n| h |\n|---|\n| `c` |\n\n![i](i.png)",
                &mut renderer,
            )
            .unwrap();
        renderer.finish(&stream);
        assert_eq!(renderer.registry().unconsumed(), 0);
    }

    #[test]
    fn test_image_hook_fires_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let renderer = Renderer::new().with_image_load(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let tree = renderer.render("![alt](a.png) ![b](b.png)").unwrap().unwrap();
        let mut images = Vec::new();
        tree.walk(&mut |node| {
            if let Node::Image(image) = node {
                images.push(image.clone());
            }
        });

        assert_eq!(images.len(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(images[0].loaded());
        assert!(!images[0].loaded());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(images[1].loaded());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rejected_image_never_fires() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let tree = Renderer::new()
            .with_options(&sanitize())
            .with_image_load(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .render("![x](javascript:alert(1))")
            .unwrap()
            .unwrap();

        let mut found = false;
        tree.walk(&mut |node| found |= matches!(node, Node::Image(_)));
        assert!(!found);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_silent_turns_failure_into_document() {
        let renderer = Renderer::new().with_options(&OptionOverrides {
            silent: Some(true),
            ..OptionOverrides::default()
        });
        let error = RenderError::Unclosed { open: 1 };
        let message = error.to_string();

        assert_eq!(
            renderer.recover(Err(error)).unwrap(),
            Node::Document(vec![
                Node::Paragraph(vec![Node::text("An error occurred:")]),
                Node::CodeBlock {
                    language: None,
                    code: message,
                },
            ])
        );
    }

    #[test]
    fn test_failure_propagates_without_silent() {
        let result = Renderer::new().recover(Err(RenderError::Unclosed { open: 1 }));
        assert!(matches!(result, Err(RenderError::Unclosed { open: 1 })));
    }

    #[test]
    fn test_render_html() {
        assert_eq!(
            render_html("# Hi", &RenderOptions::default()).unwrap(),
            r#"<h1 id="hi">Hi</h1>"#
        );
    }
}
