//! Active filter selection

use serde::{Deserialize, Serialize};

/// The (role, dimension) pair a user picked
///
/// A facet is active only when its value is present and non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSelection")]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dimension: Option<String>,
}

impl Selection {
    /// No active filters
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from optional raw values
    #[must_use]
    pub fn new(role: Option<&str>, dimension: Option<&str>) -> Self {
        Self {
            role: active(role),
            dimension: active(dimension),
        }
    }

    /// With role filter
    #[must_use]
    pub fn with_role(mut self, role: impl AsRef<str>) -> Self {
        self.role = active(Some(role.as_ref()));
        self
    }

    /// With dimension filter
    #[must_use]
    pub fn with_dimension(mut self, dimension: impl AsRef<str>) -> Self {
        self.dimension = active(Some(dimension.as_ref()));
        self
    }

    /// Active role, if any
    #[inline]
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Active dimension, if any
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> Option<&str> {
        self.dimension.as_deref()
    }

    /// Check if any facet filter is active
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.role.is_some() || self.dimension.is_some()
    }
}

/// Selection as sent by a host, before blank facets are dropped
#[derive(Deserialize)]
struct RawSelection {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    dimension: Option<String>,
}

impl From<RawSelection> for Selection {
    fn from(raw: RawSelection) -> Self {
        Self::new(raw.role.as_deref(), raw.dimension.as_deref())
    }
}

fn active(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
