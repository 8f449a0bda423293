//! Evidence coverage values
//!
//! [`Progress`] is the single reduction used at every scope: how many
//! implementation nodes are reachable, how many have evidence, and the
//! rounded percentage of the two.

use comply_schema::{CapturedValues, FieldNode, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Evidence coverage for one scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Implementation nodes in scope
    pub total: usize,
    /// Those with non-blank evidence
    pub with_evidence: usize,
    /// Rounded percentage, 100 when `total` is zero
    pub percent: u8,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Progress {
    /// Create from counts
    ///
    /// `with_evidence` is clamped to `total`.
    #[must_use]
    pub fn new(total: usize, with_evidence: usize) -> Self {
        let with_evidence = with_evidence.min(total);
        Self {
            total,
            with_evidence,
            percent: percent_of(with_evidence, total),
        }
    }

    /// Count distinct implementations and their evidence
    ///
    /// Nodes are deduplicated by id, so an implementation linked to
    /// several requirements in scope counts once.
    pub fn tally<'a, I, V>(implementations: I, values: &V) -> Self
    where
        I: IntoIterator<Item = &'a Arc<FieldNode>>,
        V: CapturedValues + ?Sized,
    {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut total = 0;
        let mut with_evidence = 0;
        for node in implementations {
            if !seen.insert(node.id()) {
                continue;
            }
            total += 1;
            if values.has_evidence(node) {
                with_evidence += 1;
            }
        }
        Self::new(total, with_evidence)
    }

    /// Check for an empty scope
    #[inline]
    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.total == 0
    }

    /// Implementations still missing evidence
    #[inline]
    #[must_use]
    pub fn missing(&self) -> usize {
        self.total.saturating_sub(self.with_evidence)
    }
}

/// `round(100 * part / total)`, or 100 for an empty total
///
/// Halves round up.
#[must_use]
pub fn percent_of(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let part = part.min(total) as u128;
    let total = total as u128;
    let rounded = (200 * part + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

/// Progress of one requirement plus its completeness flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequirementProgress {
    /// Coverage over the requirement's implementations
    pub progress: Progress,
    /// At least one implementation, and every one has evidence
    pub complete: bool,
}

impl RequirementProgress {
    /// Derive completeness from coverage
    #[must_use]
    pub fn from_progress(progress: Progress) -> Self {
        Self {
            progress,
            complete: progress.total > 0 && progress.with_evidence == progress.total,
        }
    }
}
