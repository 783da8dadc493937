//! Node-producing markup renderer.
//!
//! [`NodeRenderer`] answers every compiler callback with a placeholder token
//! instead of markup. Each callback decodes its content into children, builds
//! one [`Node`] around them, registers it and returns the node's token. The
//! final compiler output is then decoded once more into the document's
//! top-level nodes.

use marknode_config::RenderOptions;

use crate::codec::{decode, encode};
use crate::markup::{CellFlags, MarkupRenderer};
use crate::node::{Image, ImageLoadCallback, LoadHook, Node};
use crate::registry::NodeRegistry;
use crate::sanitize::sanitize_destination;
use crate::state::{Slugger, unescape};

/// Markup renderer building a [`Node`] tree through a [`NodeRegistry`].
///
/// One instance serves exactly one rendering pass.
///
/// # Example
///
/// ```
/// use marknode_config::RenderOptions;
/// use marknode_renderer::{Compiler, Node, NodeRenderer};
///
/// let options = RenderOptions::default();
/// let mut renderer = NodeRenderer::new(&options, None);
/// let stream = Compiler::new(options).compile("*hi*", &mut renderer).unwrap();
///
/// assert_eq!(
///     renderer.finish(&stream),
///     vec![Node::Paragraph(vec![Node::Emphasis(vec![Node::text("hi")])])]
/// );
/// ```
pub struct NodeRenderer {
    registry: NodeRegistry,
    sanitize: bool,
    slugger: Slugger,
    on_image_load: Option<ImageLoadCallback>,
}

impl NodeRenderer {
    #[must_use]
    pub fn new(options: &RenderOptions, on_image_load: Option<ImageLoadCallback>) -> Self {
        Self {
            registry: NodeRegistry::new(),
            sanitize: options.sanitize,
            slugger: Slugger::default(),
            on_image_load,
        }
    }

    /// Registry backing this pass.
    #[must_use]
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Decode the compiler's final output into top-level nodes.
    pub fn finish(&mut self, stream: &str) -> Vec<Node> {
        let nodes = decode(stream, &mut self.registry);
        let unconsumed = self.registry.unconsumed();
        if unconsumed > 0 {
            tracing::debug!(
                unconsumed,
                registered = self.registry.len(),
                "Rendering pass left nodes unconsumed"
            );
        }
        nodes
    }

    fn children(&mut self, content: &str) -> Vec<Node> {
        decode(content, &mut self.registry)
    }

    fn emit(&mut self, node: Node) -> String {
        encode(self.registry.register(node))
    }
}

impl MarkupRenderer for NodeRenderer {
    fn code(&mut self, code: &str, language: Option<&str>) -> String {
        let code = code.strip_suffix('\n').unwrap_or(code);
        self.emit(Node::CodeBlock {
            language: language.map(str::to_owned),
            code: code.to_owned(),
        })
    }

    fn blockquote(&mut self, quote: &str) -> String {
        let children = self.children(quote);
        self.emit(Node::BlockQuote(children))
    }

    fn html(&mut self, html: &str) -> String {
        self.emit(Node::text(html))
    }

    fn heading(&mut self, text: &str, level: u8, raw: &str) -> String {
        let id = self.slugger.unique_id(raw);
        let children = self.children(text);
        self.emit(Node::Heading {
            level,
            id,
            children,
        })
    }

    fn hr(&mut self) -> String {
        self.emit(Node::Rule)
    }

    fn list(&mut self, body: &str, ordered: bool, start: Option<u64>) -> String {
        let items = self.children(body);
        self.emit(Node::List {
            ordered,
            start,
            items,
        })
    }

    fn listitem(&mut self, text: &str) -> String {
        let children = self.children(text);
        self.emit(Node::ListItem(children))
    }

    fn checkbox(&mut self, checked: bool) -> String {
        self.emit(Node::Checkbox { checked })
    }

    fn paragraph(&mut self, text: &str) -> String {
        let children = self.children(text);
        self.emit(Node::Paragraph(children))
    }

    fn table(&mut self, header: &str, body: &str) -> String {
        let head = self.children(header);
        let body = self.children(body);
        self.emit(Node::Table { head, body })
    }

    fn tablerow(&mut self, content: &str) -> String {
        let cells = self.children(content);
        self.emit(Node::TableRow(cells))
    }

    fn tablecell(&mut self, content: &str, flags: CellFlags) -> String {
        let children = self.children(content);
        let align = flags.align.unwrap_or_default();
        if flags.header {
            self.emit(Node::HeaderCell { align, children })
        } else {
            self.emit(Node::BodyCell { align, children })
        }
    }

    fn strong(&mut self, text: &str) -> String {
        let children = self.children(text);
        self.emit(Node::Strong(children))
    }

    fn em(&mut self, text: &str) -> String {
        let children = self.children(text);
        self.emit(Node::Emphasis(children))
    }

    fn codespan(&mut self, text: &str) -> String {
        self.emit(Node::InlineCode(unescape(text).into_owned()))
    }

    fn br(&mut self) -> String {
        self.emit(Node::LineBreak)
    }

    fn del(&mut self, text: &str) -> String {
        let children = self.children(text);
        self.emit(Node::Strikethrough(children))
    }

    fn link(&mut self, href: &str, title: Option<&str>, text: &str) -> String {
        let Some(href) = sanitize_destination(href, self.sanitize) else {
            return String::new();
        };
        let children = self.children(text);
        self.emit(Node::Link {
            href,
            title: title.map(|t| unescape(t).into_owned()),
            new_tab: true,
            children,
        })
    }

    fn image(&mut self, href: &str, title: Option<&str>, text: &str) -> String {
        let Some(src) = sanitize_destination(href, self.sanitize) else {
            return String::new();
        };
        self.emit(Node::Image(Image {
            src,
            title: title.map(|t| unescape(t).into_owned()),
            alt: unescape(text).into_owned(),
            on_load: LoadHook::new(self.on_image_load.clone()),
        }))
    }

    fn text(&mut self, text: &str) -> String {
        self.emit(Node::text(unescape(text)))
    }
}
