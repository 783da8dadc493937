//! Append-only side table of produced nodes.

use crate::node::Node;

/// Indexed store of nodes produced during one rendering pass.
///
/// Indices are dense and assigned in registration order starting at 0.
/// Every slot can be taken exactly once; afterwards it reads as absent.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    slots: Vec<Option<Node>>,
}

impl NodeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node and return its index.
    pub fn register(&mut self, node: Node) -> usize {
        self.slots.push(Some(node));
        self.slots.len() - 1
    }

    /// Take the node at `index`, leaving the slot consumed.
    ///
    /// Returns `None` for consumed or never-registered indices.
    pub fn take(&mut self, index: usize) -> Option<Node> {
        self.slots.get_mut(index)?.take()
    }

    /// Number of nodes ever registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing was ever registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of registered nodes that were never taken.
    #[must_use]
    pub fn unconsumed(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
