//! Error types for filtering

/// Errors during tree filtering
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Tree nesting is deeper than the recursion guard
    #[error("filter recursion exceeded maximum depth of {max_depth}")]
    DepthExceeded {
        /// Configured guard
        max_depth: usize,
    },
}
