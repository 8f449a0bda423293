//! Comply Schema
//!
//! Typed, normalized model of a declarative compliance questionnaire.
//!
//! # Core Concepts
//!
//! - [`FieldNode`]: one schema node with parsed facets and a single child list
//! - [`NodeKind`]: Group / Requirement / Implementation / Leaf tag
//! - [`FacetList`]: comma-separated values parsed once into trimmed tokens
//! - [`Schema`]: ordered `phase → [Step]` mapping
//! - [`parsers`]: JSON and YAML ingestion into [`Schema`]
//! - [`CapturedValues`]: read-only lookup into the host's captured answers
//!
//! # Example
//!
//! ```rust
//! use comply_schema::parsers::{JsonSchemaParser, SchemaParser};
//! use comply_schema::NodeKind;
//!
//! let schema = JsonSchemaParser
//!     .parse(r#"{"Plan": [{"StepName": "Article 5", "Fields": [
//!         {"FieldType": "risk", "requirement_control_number": "5.1, 5.2"}
//!     ]}]}"#)
//!     .unwrap();
//!
//! let (_, step) = schema.steps().next().unwrap();
//! assert_eq!(step.fields[0].kind(), NodeKind::Implementation);
//! assert_eq!(step.fields[0].target_keys().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod facet;
pub mod node;
pub mod normalize;
pub mod parsers;
pub mod schema;
pub mod values;

// Re-exports
pub use error::{SchemaError, SchemaResult};
pub use facet::FacetList;
pub use node::{FieldNode, NodeId, NodeIdAllocator, NodeKind, FIELD_GROUP_TYPE, REQUIREMENT_TYPE};
pub use normalize::{normalize, Normalizer, DEFAULT_MAX_DEPTH};
pub use schema::{Schema, Step};
pub use values::{sanitize_field_id, CapturedField, CapturedValues, NoValues, ValueSlot, ValueStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with schemas
    pub use crate::parsers::{JsonSchemaParser, SchemaParser, YamlSchemaParser};
    pub use crate::{
        CapturedValues, FacetList, FieldNode, NodeId, NodeKind, Schema, SchemaError, Step,
        ValueSlot, ValueStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
