//! Indented text dump of node trees.

use std::fmt::Write;

use marknode_renderer::Node;

/// Format `node` and its descendants, one node per line, two spaces per level.
pub(crate) fn format_tree(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = depth * 2;
    let _ = writeln!(out, "{:indent$}{}{}", "", node.kind(), attributes(node));
    for child in node.children() {
        write_node(out, child, depth + 1);
    }
}

fn attributes(node: &Node) -> String {
    let mut attrs = String::new();
    match node {
        Node::Text(text) | Node::InlineCode(text) => {
            let _ = write!(attrs, " {text:?}");
        }
        Node::CodeBlock { language, code } => {
            if let Some(language) = language {
                let _ = write!(attrs, " lang={language}");
            }
            let _ = write!(attrs, " {code:?}");
        }
        Node::Heading { level, id, .. } => {
            let _ = write!(attrs, " level={level} id={id:?}");
        }
        Node::List { ordered, start, .. } => {
            if *ordered {
                attrs.push_str(" ordered");
            }
            if let Some(start) = start {
                let _ = write!(attrs, " start={start}");
            }
        }
        Node::Checkbox { checked: true } => attrs.push_str(" checked"),
        Node::HeaderCell { align, .. } | Node::BodyCell { align, .. } => {
            let _ = write!(attrs, " align={}", align.as_css());
        }
        Node::Link {
            href,
            title,
            new_tab,
            ..
        } => {
            let _ = write!(attrs, " href={href:?}");
            if let Some(title) = title {
                let _ = write!(attrs, " title={title:?}");
            }
            if *new_tab {
                attrs.push_str(" new_tab");
            }
        }
        Node::Image(image) => {
            let _ = write!(attrs, " src={:?} alt={:?}", image.src, image.alt);
            if let Some(title) = &image.title {
                let _ = write!(attrs, " title={title:?}");
            }
        }
        _ => {}
    }
    attrs
}
