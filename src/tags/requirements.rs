//! Tag collections and require/ignore requirements.
//!
//! A `TagSet` is the union of tags granted to a character at a moment in
//! time. `TagRequirements` is the require/ignore pair used by effect
//! application, ongoing and removal checks, and by ability gating:
//! every `require` tag must be present, no `ignore` tag may be.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tag::TagId;

/// A collection of granted tags.
///
/// Duplicates are kept: two effects granting the same tag both contribute,
/// which keeps union building cheap. Membership is by exact `TagId`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    tags: SmallVec<[TagId; 8]>,
}

impl TagSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag.
    pub fn insert(&mut self, tag: TagId) {
        self.tags.push(tag);
    }

    /// Check whether a tag is present.
    #[must_use]
    pub fn contains(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }

    /// Check whether every tag is present.
    #[must_use]
    pub fn contains_all(&self, tags: &[TagId]) -> bool {
        tags.iter().all(|tag| self.contains(*tag))
    }

    /// Check whether any tag is present.
    #[must_use]
    pub fn contains_any(&self, tags: &[TagId]) -> bool {
        tags.iter().any(|tag| self.contains(*tag))
    }

    /// Number of entries, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = TagId> + '_ {
        self.tags.iter().copied()
    }
}

impl Extend<TagId> for TagSet {
    fn extend<I: IntoIterator<Item = TagId>>(&mut self, iter: I) {
        self.tags.extend(iter);
    }
}

impl FromIterator<TagId> for TagSet {
    fn from_iter<I: IntoIterator<Item = TagId>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

/// Require/ignore tag requirements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRequirements {
    /// All of these tags must be present.
    #[serde(default)]
    pub require: SmallVec<[TagId; 4]>,

    /// None of these tags may be present.
    #[serde(default)]
    pub ignore: SmallVec<[TagId; 4]>,
}

impl TagRequirements {
    /// Create empty requirements (always satisfied).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a tag (builder pattern).
    #[must_use]
    pub fn require(mut self, tag: TagId) -> Self {
        self.require.push(tag);
        self
    }

    /// Forbid a tag (builder pattern).
    #[must_use]
    pub fn ignore(mut self, tag: TagId) -> Self {
        self.ignore.push(tag);
        self
    }

    /// Check whether there are no requirements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.require.is_empty() && self.ignore.is_empty()
    }

    /// Check the requirements against a set of granted tags.
    #[must_use]
    pub fn is_satisfied_by(&self, tags: &TagSet) -> bool {
        tags.contains_all(&self.require) && !tags.contains_any(&self.ignore)
    }
}
