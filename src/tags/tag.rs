//! Tag identity and the tag hierarchy.
//!
//! Tags are opaque `TagId`s registered in a `TagRegistry` together with an
//! optional parent. The registry answers hierarchy questions with a
//! bounded walk up the parent chain, so authored data containing a cycle
//! still terminates.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

/// Default number of ancestors visited by [`TagRegistry::is_descendant_of`].
pub const DEFAULT_SEARCH_LIMIT: usize = 4;

/// Tag identifier. Games define what tags exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(pub u32);

impl TagId {
    /// Create a new tag ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

#[derive(Clone, Debug)]
struct TagNode {
    name: String,
    parent: Option<TagId>,
}

/// Registry of tags and their parents.
///
/// ## Example
///
/// ```
/// use rust_gas::tags::TagRegistry;
///
/// let mut tags = TagRegistry::new();
/// let fire = tags.register_path("Damage.Elemental.Fire").unwrap();
/// let damage = tags.find("Damage").unwrap();
///
/// assert!(tags.is_descendant_of(fire, damage));
/// assert!(!tags.is_descendant_of(damage, fire));
/// assert!(!tags.is_descendant_of(fire, fire));
/// ```
#[derive(Clone, Debug)]
pub struct TagRegistry {
    nodes: Vec<TagNode>,
    by_name: FxHashMap<String, TagId>,
    search_limit: usize,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::with_search_limit(DEFAULT_SEARCH_LIMIT)
    }
}

impl TagRegistry {
    /// Create an empty registry with the default search limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with a custom search limit.
    #[must_use]
    pub fn with_search_limit(search_limit: usize) -> Self {
        Self {
            nodes: Vec::new(),
            by_name: FxHashMap::default(),
            search_limit,
        }
    }

    /// The number of ancestors visited by [`Self::is_descendant_of`].
    #[must_use]
    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    /// Register a tag under `parent`.
    ///
    /// Registering an existing name returns the existing ID and leaves its
    /// parent untouched.
    pub fn register(&mut self, name: impl Into<String>, parent: Option<TagId>) -> TagId {
        let name = name.into();
        if let Some(&existing) = self.by_name.get(&name) {
            return existing;
        }

        let id = TagId::new(self.nodes.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.nodes.push(TagNode { name, parent });
        id
    }

    /// Register a dotted path, creating every missing ancestor.
    ///
    /// `"Ability.Cooldown.Fireball"` registers `Ability`, `Ability.Cooldown`
    /// and `Ability.Cooldown.Fireball`, each parented to the previous one,
    /// and returns the ID of the last segment.
    pub fn register_path(&mut self, path: &str) -> Result<TagId, ConfigError> {
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(ConfigError::InvalidTagPath(path.to_string()));
        }

        let mut parent = None;
        let mut end = 0;
        for segment in path.split('.') {
            end += segment.len();
            let id = self.register(&path[..end], parent);
            parent = Some(id);
            end += 1;
        }

        parent.ok_or_else(|| ConfigError::InvalidTagPath(path.to_string()))
    }

    /// Re-parent a tag.
    ///
    /// No cycle check is performed; hierarchy queries stay bounded by the
    /// search limit regardless. Returns `false` if `tag` is not registered.
    pub fn set_parent(&mut self, tag: TagId, parent: Option<TagId>) -> bool {
        match self.nodes.get_mut(tag.0 as usize) {
            Some(node) => {
                node.parent = parent;
                true
            }
            None => false,
        }
    }

    /// Look up a tag by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<TagId> {
        self.by_name.get(name).copied()
    }

    /// Get a tag's name.
    #[must_use]
    pub fn name(&self, tag: TagId) -> Option<&str> {
        self.nodes.get(tag.0 as usize).map(|node| node.name.as_str())
    }

    /// Get a tag's parent.
    #[must_use]
    pub fn parent(&self, tag: TagId) -> Option<TagId> {
        self.nodes.get(tag.0 as usize).and_then(|node| node.parent)
    }

    /// Check whether `tag` descends from `other`, visiting at most
    /// [`Self::search_limit`] ancestors.
    #[must_use]
    pub fn is_descendant_of(&self, tag: TagId, other: TagId) -> bool {
        self.is_descendant_of_within(tag, other, self.search_limit)
    }

    /// Check whether `tag` descends from `other`, visiting at most `limit` ancestors.
    ///
    /// The walk starts at `tag`'s parent. It returns `false` when the root
    /// is reached or the limit is exhausted; neither is an error.
    #[must_use]
    pub fn is_descendant_of_within(&self, tag: TagId, other: TagId, limit: usize) -> bool {
        let mut current = self.parent(tag);
        for _ in 0..limit {
            match current {
                None => return false,
                Some(ancestor) if ancestor == other => return true,
                Some(ancestor) => current = self.parent(ancestor),
            }
        }
        false
    }

    /// Check whether `tag` is `query` or one of its descendants.
    #[must_use]
    pub fn matches(&self, tag: TagId, query: TagId) -> bool {
        tag == query || self.is_descendant_of(tag, query)
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all tags and their names.
    pub fn iter(&self) -> impl Iterator<Item = (TagId, &str)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (TagId::new(i as u32), node.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_find() {
        let mut tags = TagRegistry::new();
        let stun = tags.register("Stunned", None);

        assert_eq!(tags.find("Stunned"), Some(stun));
        assert_eq!(tags.name(stun), Some("Stunned"));
        assert_eq!(tags.parent(stun), None);
        assert!(tags.find("Rooted").is_none());
    }

    #[test]
    fn test_register_duplicate_returns_existing() {
        let mut tags = TagRegistry::new();
        let first = tags.register("Stunned", None);
        let second = tags.register("Stunned", Some(TagId::new(99)));

        assert_eq!(first, second);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.parent(first), None);
    }

    #[test]
    fn test_register_path_creates_ancestors() {
        let mut tags = TagRegistry::new();
        let fireball = tags.register_path("Ability.Cooldown.Fireball").unwrap();
        let frostbolt = tags.register_path("Ability.Cooldown.Frostbolt").unwrap();

        assert_eq!(tags.len(), 4);
        let cooldown = tags.find("Ability.Cooldown").unwrap();
        assert_eq!(tags.parent(fireball), Some(cooldown));
        assert_eq!(tags.parent(frostbolt), Some(cooldown));
        assert_eq!(tags.parent(cooldown), tags.find("Ability"));
    }

    #[test]
    fn test_register_path_rejects_empty_segments() {
        let mut tags = TagRegistry::new();
        assert!(tags.register_path("").is_err());
        assert!(tags.register_path("A..B").is_err());
        assert!(tags.register_path(".A").is_err());
        assert!(tags.is_empty());
    }

    #[test]
    fn test_is_descendant_of() {
        let mut tags = TagRegistry::new();
        let leaf = tags.register_path("A.B.C").unwrap();
        let a = tags.find("A").unwrap();
        let b = tags.find("A.B").unwrap();

        assert!(tags.is_descendant_of(leaf, b));
        assert!(tags.is_descendant_of(leaf, a));
        assert!(tags.is_descendant_of(b, a));
        assert!(!tags.is_descendant_of(a, leaf));
        assert!(!tags.is_descendant_of(leaf, leaf));
    }

    #[test]
    fn test_search_limit_bounds_depth() {
        let mut tags = TagRegistry::new();
        let leaf = tags.register_path("L0.L1.L2.L3.L4.L5").unwrap();
        let root = tags.find("L0").unwrap();
        let l1 = tags.find("L0.L1").unwrap();

        // L5 -> L4 -> L3 -> L2 -> L1 is four steps, L0 is the fifth.
        assert!(tags.is_descendant_of(leaf, l1));
        assert!(!tags.is_descendant_of(leaf, root));
        assert!(tags.is_descendant_of_within(leaf, root, 5));
        assert!(!tags.is_descendant_of_within(leaf, l1, 3));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut tags = TagRegistry::new();
        let a = tags.register("A", None);
        let b = tags.register("B", Some(a));
        let unrelated = tags.register("Unrelated", None);
        tags.set_parent(a, Some(b));

        assert!(tags.is_descendant_of(a, b));
        assert!(tags.is_descendant_of(b, a));
        assert!(!tags.is_descendant_of(a, unrelated));
        assert!(!tags.is_descendant_of_within(a, unrelated, 10_000));
    }

    #[test]
    fn test_self_parent_cycle() {
        let mut tags = TagRegistry::new();
        let a = tags.register("A", None);
        tags.set_parent(a, Some(a));

        assert!(tags.is_descendant_of(a, a));
        assert!(!tags.is_descendant_of_within(a, a, 0));
    }

    #[test]
    fn test_unknown_tag() {
        let tags = TagRegistry::new();
        assert!(!tags.is_descendant_of(TagId::new(3), TagId::new(4)));
        assert!(tags.name(TagId::new(3)).is_none());
    }

    #[test]
    fn test_set_parent_unknown_tag() {
        let mut tags = TagRegistry::new();
        assert!(!tags.set_parent(TagId::new(0), None));
    }

    #[test]
    fn test_matches() {
        let mut tags = TagRegistry::new();
        let fire = tags.register_path("Damage.Fire").unwrap();
        let damage = tags.find("Damage").unwrap();

        assert!(tags.matches(fire, fire));
        assert!(tags.matches(fire, damage));
        assert!(!tags.matches(damage, fire));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TagId(9)), "Tag(9)");
    }
}
