use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::constants::PATH_SEPARATOR;

/// A set of dotted field paths folded into a tree.
///
/// Keys are field names, or decimal indices for sequence elements. A
/// [`PathNode::Leaf`] selects the whole field; a [`PathNode::Branch`]
/// descends into it.
///
/// Serializes as the nested-map form, with `null` leaves:
///
/// ```rust
/// use call_logging::PathTree;
///
/// let tree = PathTree::from_paths(["user.name", "user.age", "id"]);
/// assert_eq!(
///     serde_json::to_value(&tree).unwrap(),
///     serde_json::json!({"id": null, "user": {"age": null, "name": null}})
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathTree {
    nodes: BTreeMap<String, PathNode>,
}

/// A node of a [`PathTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathNode {
    /// The field is selected as a whole; nothing below it is inspected.
    Leaf,
    /// Descend into the field with the nested tree.
    Branch(PathTree),
}

impl PathNode {
    /// Returns true for [`PathNode::Leaf`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, PathNode::Leaf)
    }
}

impl PathTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from dotted paths.
    ///
    /// Never fails: empty segments become literal empty-string keys and
    /// duplicate paths collapse.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    /// Adds one dotted path.
    ///
    /// A leaf absorbs any deeper path under it, and a shorter path replaces
    /// an existing subtree with a leaf, so the result does not depend on
    /// insertion order.
    pub fn insert(&mut self, path: &str) {
        let mut segments = path.split(PATH_SEPARATOR).peekable();
        let mut current = self;

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.nodes.insert(segment.to_string(), PathNode::Leaf);
                return;
            }

            let node = current
                .nodes
                .entry(segment.to_string())
                .or_insert_with(|| PathNode::Branch(PathTree::new()));

            match node {
                PathNode::Leaf => return,
                PathNode::Branch(subtree) => current = subtree,
            }
        }
    }

    /// Returns the node stored under `key`.
    pub fn get(&self, key: &str) -> Option<&PathNode> {
        self.nodes.get(key)
    }

    /// Returns true if `key` has a node.
    pub fn contains_key(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Iterates over `(key, node)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PathNode> {
        self.nodes.iter()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree selects nothing.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the direct children whose keys are sequence indices.
    pub(crate) fn indexed(&self) -> impl Iterator<Item = (usize, &PathNode)> {
        self.nodes
            .iter()
            .filter_map(|(key, node)| parse_index(key).map(|index| (index, node)))
    }
}

impl<S: AsRef<str>> FromIterator<S> for PathTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_paths(iter)
    }
}

impl<'a> IntoIterator for &'a PathTree {
    type Item = (&'a String, &'a PathNode);
    type IntoIter = btree_map::Iter<'a, String, PathNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parses a canonical decimal sequence index (`"0"`, `"12"`, never `"+1"`
/// or `"01"`).
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical { key.parse().ok() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_gives_empty_tree() {
        let tree = PathTree::from_paths(Vec::<String>::new());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_siblings_share_prefix() {
        let tree = PathTree::from_paths(["a.b.c", "a.b.d", "a.e"]);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"a": {"b": {"c": null, "d": null}, "e": null}})
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let once = PathTree::from_paths(["x.y"]);
        let twice = PathTree::from_paths(["x.y", "x.y"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_leaf_absorbs_deeper_paths_in_any_order() {
        let shorter_first = PathTree::from_paths(["a", "a.b"]);
        let longer_first = PathTree::from_paths(["a.b", "a"]);
        assert_eq!(shorter_first, longer_first);
        assert_eq!(shorter_first.get("a"), Some(&PathNode::Leaf));
    }

    #[test]
    fn test_empty_segments_are_literal_keys() {
        let tree = PathTree::from_paths(["a..b", ""]);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"": null, "a": {"": {"b": null}}})
        );
    }

    #[test]
    fn test_deserialize_nested_form() {
        let tree: PathTree = serde_json::from_value(json!({"user": {"name": null}})).unwrap();
        assert_eq!(tree, PathTree::from_paths(["user.name"]));
    }

    #[test]
    fn test_parse_index_is_canonical() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("17"), Some(17));
        assert_eq!(parse_index("01"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index(""), None);
    }
}
