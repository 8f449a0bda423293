//! Captured value lookup contract
//!
//! The questionnaire host owns the answers users type in. The engine only
//! reads them, through the narrow [`CapturedValues`] capability passed into
//! every call. [`ValueStore`] is an in-memory implementation keyed by
//! sanitized field identifier.

use crate::node::FieldNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which stored value a lookup wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSlot {
    /// Applicability / implementation status (`jkSoa`)
    Status,
    /// Evidence or free-text value
    Evidence,
}

impl ValueSlot {
    /// Slot for the boolean `want_status` form of the contract
    #[inline]
    #[must_use]
    pub fn from_want_status(want_status: bool) -> Self {
        if want_status {
            Self::Status
        } else {
            Self::Evidence
        }
    }
}

/// Read access to captured answers
pub trait CapturedValues {
    /// Stored value for `node` in `slot`, if any
    fn lookup(&self, node: &FieldNode, slot: ValueSlot) -> Option<String>;

    /// Stored status, trimmed
    fn status(&self, node: &FieldNode) -> Option<String> {
        self.lookup(node, ValueSlot::Status)
            .map(|s| s.trim().to_string())
    }

    /// Check whether non-blank evidence is stored
    fn has_evidence(&self, node: &FieldNode) -> bool {
        self.lookup(node, ValueSlot::Evidence)
            .is_some_and(|e| !e.trim().is_empty())
    }
}

impl<F> CapturedValues for F
where
    F: Fn(&FieldNode, ValueSlot) -> Option<String>,
{
    fn lookup(&self, node: &FieldNode, slot: ValueSlot) -> Option<String> {
        self(node, slot)
    }
}

/// Store that never has a value
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValues;

impl CapturedValues for NoValues {
    fn lookup(&self, _node: &FieldNode, _slot: ValueSlot) -> Option<String> {
        None
    }
}

/// Sanitize a field identifier into a store key
///
/// Characters other than ASCII alphanumerics, `_` and `-` become `_`.
#[must_use]
pub fn sanitize_field_id(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Status and evidence captured for one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedField {
    /// Status value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Evidence value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

/// In-memory captured value store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    fields: IndexMap<String, CapturedField>,
}

impl ValueStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field's status
    pub fn set_status(&mut self, field_id: &str, status: impl Into<String>) {
        self.entry(field_id).status = Some(status.into());
    }

    /// Set a field's evidence
    pub fn set_evidence(&mut self, field_id: &str, evidence: impl Into<String>) {
        self.entry(field_id).evidence = Some(evidence.into());
    }

    /// Builder form of [`ValueStore::set_status`]
    #[must_use]
    pub fn with_status(mut self, field_id: &str, status: impl Into<String>) -> Self {
        self.set_status(field_id, status);
        self
    }

    /// Builder form of [`ValueStore::set_evidence`]
    #[must_use]
    pub fn with_evidence(mut self, field_id: &str, evidence: impl Into<String>) -> Self {
        self.set_evidence(field_id, evidence);
        self
    }

    /// Drop everything stored for a field
    pub fn clear(&mut self, field_id: &str) -> Option<CapturedField> {
        self.fields.shift_remove(&sanitize_field_id(field_id))
    }

    /// Values stored for a field id
    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&CapturedField> {
        self.fields.get(&sanitize_field_id(field_id))
    }

    /// Number of fields with stored values
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn entry(&mut self, field_id: &str) -> &mut CapturedField {
        self.fields.entry(sanitize_field_id(field_id)).or_default()
    }
}

impl CapturedValues for ValueStore {
    fn lookup(&self, node: &FieldNode, slot: ValueSlot) -> Option<String> {
        let field = self.get(node.field_id()?)?;
        match slot {
            ValueSlot::Status => field.status.clone(),
            ValueSlot::Evidence => field.evidence.clone(),
        }
    }
}
