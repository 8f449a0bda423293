//! Comply Graph Builder
//!
//! Turns a questionnaire schema into a four-level compliance hierarchy:
//!
//! ```text
//! Step name → Group name → Requirement key → {Implementation nodes}
//! ```
//!
//! Only steps whose name starts with the article prefix take part in the
//! hierarchy, but implementation references are harvested from every step.
//! An implementation is linked to a requirement only while the
//! requirement's captured status reads as applicable; that status is read
//! fresh on every build.
//!
//! # Example
//!
//! ```rust
//! use comply_graph::GraphBuilder;
//! use comply_schema::{FieldNode, NodeId, Schema, Step, ValueStore};
//!
//! let group = FieldNode::new(NodeId(0))
//!     .with_field_type("fieldGroup")
//!     .with_field_name("Governance")
//!     .with_child(
//!         FieldNode::new(NodeId(1))
//!             .with_field_type("requirement")
//!             .with_requirement_control_number("21.2(a)"),
//!     );
//! let risk = FieldNode::new(NodeId(2))
//!     .with_field_type("risk")
//!     .with_field_name("risk-1")
//!     .with_requirement_control_number("21.2(a)");
//!
//! let schema = Schema::new().with_step("Preparation", Step::named("Article 21", vec![group, risk]));
//! let values = ValueStore::new().with_status("21.2(a)", "Applicable");
//!
//! let graph = GraphBuilder::new().build(&schema, &values).unwrap();
//! let requirement = graph.steps.requirement("Article 21", "Governance", "21.2(a)").unwrap();
//! assert_eq!(requirement.implementation_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod builder;
pub mod error;
pub mod flatten;
pub mod index;

// Re-exports
pub use builder::{
    build, GraphBuilder, LinkScope, DEFAULT_APPLICABLE_STATUS, DEFAULT_ARTICLE_PREFIX,
    DEFAULT_STEP_NAME, UNNAMED_GROUP,
};
pub use error::GraphError;
pub use flatten::flatten;
pub use index::{
    ComplianceGraph, GraphRow, GroupEntry, GroupMap, ImplementationIndex, ImplementationSet,
    RequirementEntry, RequirementMap, StepGroups,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
