//! Multi-valued facet lists
//!
//! Provides [`FacetList`], the parsed form of comma-separated schema values
//! such as `Role`, `TrustDimension`, `Control` and `requirement_control_number`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Ordered list of trimmed, non-empty tokens
///
/// Parsed once at ingestion so membership tests never re-split strings.
/// Order of first appearance is kept; repeated tokens are dropped.
///
/// # Examples
/// - `"Admin, Auditor"` → `["Admin", "Auditor"]`
/// - `" ,R1,,R1 "` → `["R1"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetList(SmallVec<[String; 4]>);

impl FacetList {
    /// Empty list ("no value")
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    /// Parse a comma-separated value
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from_tokens(raw.split(','))
    }

    /// Build from individual tokens, trimming and deduplicating
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::empty();
        for token in tokens {
            list.push(token.as_ref());
        }
        list
    }

    /// Append a token if it is non-empty and not already present
    pub fn push(&mut self, token: &str) {
        let token = token.trim();
        if !token.is_empty() && !self.contains(token) {
            self.0.push(token.to_string());
        }
    }

    /// Append every token of `other` not already present
    pub fn merge(&mut self, other: &Self) {
        for token in other.iter() {
            self.push(token);
        }
    }

    /// Set-membership test (exact, case-sensitive)
    #[inline]
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Check whether any of `tokens` is present
    #[must_use]
    pub fn contains_any<'a>(&self, mut tokens: impl Iterator<Item = &'a str>) -> bool {
        tokens.any(|t| self.contains(t))
    }

    /// Number of tokens
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if list holds no tokens
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First token, if any
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Iterator over tokens in order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Display for FacetList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

impl FromStr for FacetList {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FacetList {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Vec<String>> for FacetList {
    fn from(tokens: Vec<String>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl<'a> IntoIterator for &'a FacetList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
