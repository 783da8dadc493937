//! Error types for markdown compilation.

/// Compiler-internal failure. A failed pass produces no output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An end event did not close the innermost open construct.
    #[error("unbalanced markdown events: expected {expected}, found end of {found}")]
    Unbalanced {
        /// What the compiler expected to close next.
        expected: String,
        /// The end event that arrived instead.
        found: String,
    },

    /// The event stream ended while constructs were still open.
    #[error("markdown events ended with {open} construct(s) still open")]
    Unclosed {
        /// Number of constructs left open.
        open: usize,
    },
}
