//! Comply Progress Calculator
//!
//! Derives evidence coverage from a compliance graph and the captured
//! values, at requirement, group, step and global scope. Every scope uses
//! the same reduction:
//!
//! - `total`: distinct implementation nodes reachable in scope
//! - `with_evidence`: those with non-blank evidence
//! - `percent`: `round(100 * with_evidence / total)`, or 100 when `total` is 0
//!
//! A requirement is complete only when it has at least one implementation
//! and every one of them has evidence.
//!
//! # Example
//!
//! ```rust
//! use comply_progress::{percent_of, Progress};
//!
//! assert_eq!(percent_of(2, 3), 67);
//! assert_eq!(Progress::new(0, 0).percent, 100);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod progress;
pub mod report;

// Re-exports
pub use progress::{percent_of, Progress, RequirementProgress};
pub use report::{
    group_progress, progress, progress_at, requirement_progress, step_progress, GroupReport,
    ProgressReport, Scope, StepReport,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
