//! Placeholder tokens.
//!
//! Rich nodes travel through the string-only markup contract as `{{<index>}}`
//! tokens pointing into a [`NodeRegistry`]. [`decode`] turns a token stream
//! back into nodes, absorbing any raw text the compiler wrote between tokens.

use crate::node::Node;
use crate::registry::NodeRegistry;
use crate::state::unescape;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Encode a registry index as a placeholder token.
///
/// # Examples
///
/// ```
/// assert_eq!(marknode_renderer::encode(42), "{{42}}");
/// ```
#[must_use]
pub fn encode(index: usize) -> String {
    format!("{OPEN}{index}{CLOSE}")
}

/// Expand a placeholder stream into nodes, taking them out of `registry`.
///
/// Tokens resolve to their registered node; tokens whose slot is already
/// consumed or was never registered are skipped. Text between tokens is a
/// leak: it is entity-decoded and emitted as a text node in place. A `{{`
/// that does not start a well-formed token ends decoding: the rest of the
/// stream becomes one trailing leak.
///
/// Decoding depends only on the stream and the registry state, so builders
/// may decode their own content while an outer decode is pending.
///
/// # Examples
///
/// ```
/// use marknode_renderer::{Node, NodeRegistry, decode, encode};
///
/// let mut registry = NodeRegistry::new();
/// let index = registry.register(Node::Rule);
/// let stream = format!("{}a &amp; b", encode(index));
///
/// assert_eq!(
///     decode(&stream, &mut registry),
///     vec![Node::Rule, Node::text("a & b")]
/// );
/// ```
pub fn decode(stream: &str, registry: &mut NodeRegistry) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut rest = stream;

    while !rest.is_empty() {
        while let Some((digits, len)) = leading_token(rest) {
            match digits.parse::<usize>().ok().and_then(|i| registry.take(i)) {
                Some(node) => nodes.push(node),
                None => tracing::debug!(token = &rest[..len], "Skipping unresolvable placeholder"),
            }
            rest = &rest[len..];
        }
        if rest.is_empty() {
            break;
        }

        // No token and no progress possible: the remainder is one trailing leak
        let end = rest
            .find(OPEN)
            .filter(|&pos| pos > 0)
            .unwrap_or(rest.len());
        let (leak, tail) = rest.split_at(end);
        nodes.push(Node::text(unescape(leak)));
        rest = tail;
    }

    nodes
}

/// Match a well-formed token at the start of `stream`.
///
/// Returns the index digits and the token's byte length.
fn leading_token(stream: &str) -> Option<(&str, usize)> {
    let body = stream.strip_prefix(OPEN)?;
    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || !body[digits..].starts_with(CLOSE) {
        return None;
    }
    Some((&body[..digits], OPEN.len() + digits + CLOSE.len()))
}
