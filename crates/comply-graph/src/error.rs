//! Error types for graph building

/// Errors during graph building
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Step tree nesting is deeper than the flatten guard
    #[error("step '{step}' nests deeper than maximum depth of {max_depth}")]
    DepthExceeded {
        /// Step being flattened
        step: String,
        /// Configured guard
        max_depth: usize,
    },
}
