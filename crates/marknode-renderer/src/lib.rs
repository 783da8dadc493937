//! Markdown to renderable node trees.
//!
//! This crate compiles markdown into a tree of [`Node`] values that a display
//! surface can mount directly, instead of into an HTML string.
//!
//! # Architecture
//!
//! The [`Compiler`] drives pulldown-cmark and talks to its output side through
//! the string-only [`MarkupRenderer`] contract:
//! - [`HtmlRenderer`]: produces semantic HTML5
//! - [`NodeRenderer`]: builds nodes, registers them in a [`NodeRegistry`] and
//!   returns `{{index}}` placeholder tokens in place of markup
//!
//! Because children are rendered before their parents, a container callback
//! receives a string of its children's tokens and decodes it back into nodes
//! with [`decode`]. Raw text the compiler writes between tokens is absorbed
//! into text nodes.
//!
//! # Example
//!
//! ```
//! use marknode_renderer::{Node, Renderer};
//!
//! let tree = Renderer::new().render("Hello **world**").unwrap();
//! assert_eq!(
//!     tree,
//!     Some(Node::Document(vec![Node::Paragraph(vec![
//!         Node::text("Hello "),
//!         Node::Strong(vec![Node::text("world")]),
//!     ])]))
//! );
//! ```

mod adapter;
mod codec;
mod compiler;
mod error;
mod html;
mod markup;
mod node;
mod registry;
mod render;
mod sanitize;
mod state;
mod util;

pub use adapter::NodeRenderer;
pub use codec::{decode, encode};
pub use compiler::Compiler;
pub use error::RenderError;
pub use html::HtmlRenderer;
pub use markup::{CellFlags, MarkupRenderer};
pub use marknode_config::{Format, OptionOverrides, RenderOptions};
pub use node::{Image, ImageLoadCallback, LoadHook, Node, TextAlign};
pub use registry::NodeRegistry;
pub use render::{Renderer, render, render_html};
pub use sanitize::sanitize_destination;
pub use state::{escape_html, unescape};
