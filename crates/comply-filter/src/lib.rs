//! Comply Filter Engine
//!
//! Prunes a questionnaire schema tree by two independent facets: the
//! user's role and the selected trust dimension.
//!
//! # Rules
//!
//! - A facet filter is active only when a non-blank value is selected
//! - With no active filter a tree is returned unchanged
//! - A node matches directly when it passes every active facet test
//! - The wildcard dimension (`Comply` by default) satisfies any dimension
//! - A node survives if it matches directly or any descendant survives
//!
//! # Example
//!
//! ```rust
//! use comply_filter::{FilterEngine, Selection};
//! use comply_schema::{FieldNode, NodeId};
//! use std::sync::Arc;
//!
//! let tree = Arc::new(
//!     FieldNode::new(NodeId(0))
//!         .with_roles("Auditor")
//!         .with_child(FieldNode::new(NodeId(1)).with_roles("Admin")),
//! );
//!
//! let selection = Selection::all().with_role("Admin");
//! let filtered = FilterEngine::new().filter(&tree, &selection).unwrap().unwrap();
//! assert_eq!(filtered.children().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod engine;
pub mod error;
pub mod selection;

// Re-exports
pub use catalog::FacetCatalog;
pub use engine::{filter, FilterEngine, DEFAULT_WILDCARD_DIMENSION};
pub use error::FilterError;
pub use selection::Selection;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
