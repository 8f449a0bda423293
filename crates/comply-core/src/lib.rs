//! Comply Core
//!
//! Ties the stages together behind [`ComplianceEngine`]:
//!
//! ```text
//! schema text → Schema → filter(Selection) → GraphBuilder → ProgressReport
//! ```
//!
//! Captured values are passed into every call and never stored, so the
//! host can re-run a pass after each edit and see the change.
//!
//! # Example
//!
//! ```rust
//! use comply_core::{ComplianceEngine, EngineConfig};
//! use comply_filter::Selection;
//! use comply_schema::ValueStore;
//! use std::path::Path;
//!
//! let engine = ComplianceEngine::new(EngineConfig::default());
//! let schema = engine
//!     .parse_schema(
//!         Path::new("soa.json"),
//!         r#"{"Plan": [{"StepName": "Article 5", "Fields": [
//!             {"FieldType": "fieldGroup", "FieldName": "G", "controls": [
//!                 {"FieldType": "requirement", "requirement_control_number": "5.1"}]},
//!             {"FieldType": "risk", "FieldName": "r", "requirement_control_number": "5.1"}
//!         ]}]}"#,
//!     )
//!     .unwrap();
//!
//! let values = ValueStore::new()
//!     .with_status("5.1", "Applicable")
//!     .with_evidence("r", "register.xlsx");
//! let snapshot = engine.render_pass(&schema, &Selection::all(), &values).unwrap();
//! assert_eq!(snapshot.progress.global.percent, 100);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

// Re-exports
pub use config::EngineConfig;
pub use engine::{ComplianceEngine, RenderSnapshot};
pub use error::{EngineError, EngineResult};
pub use telemetry::{init_tracing, LogFormat};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{ComplianceEngine, EngineConfig, EngineError, RenderSnapshot};
    pub use comply_filter::Selection;
    pub use comply_graph::{ComplianceGraph, LinkScope};
    pub use comply_progress::{Progress, ProgressReport};
    pub use comply_schema::{CapturedValues, Schema, ValueStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
