//! Include and exclude projections over JSON values.
//!
//! Both projections borrow the source value and allocate a fresh result, so
//! the source is never modified. Exclusion tracks whether anything was
//! removed and only rebuilds the containers on the path to a removal;
//! untouched subtrees are cloned once.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::tree::{PathNode, PathTree};

/// Returns a copy of `value` holding only the fields reached by `tree`.
///
/// Scalars are returned unchanged. Paths that do not exist in `value`
/// are ignored, as are branches that point at a scalar field. Selected
/// sequence elements keep their index; unselected slots before the last
/// selected one are `null`.
pub fn project(value: &Value, tree: &PathTree) -> Value {
    match value {
        Value::Object(map) => {
            let mut result = Map::new();
            for (key, field) in map {
                match tree.get(key) {
                    Some(PathNode::Leaf) => {
                        result.insert(key.clone(), field.clone());
                    }
                    Some(PathNode::Branch(subtree)) if is_container(field) => {
                        result.insert(key.clone(), project(field, subtree));
                    }
                    _ => {}
                }
            }
            Value::Object(result)
        }
        Value::Array(items) => {
            let selected: Vec<(usize, Value)> = tree
                .indexed()
                .filter_map(|(index, node)| {
                    let item = items.get(index)?;
                    match node {
                        PathNode::Leaf => Some((index, item.clone())),
                        PathNode::Branch(subtree) if is_container(item) => {
                            Some((index, project(item, subtree)))
                        }
                        PathNode::Branch(_) => None,
                    }
                })
                .collect();

            let len = selected.iter().map(|(index, _)| index + 1).max().unwrap_or(0);
            let mut result = vec![Value::Null; len];
            for (index, item) in selected {
                result[index] = item;
            }
            Value::Array(result)
        }
        scalar => scalar.clone(),
    }
}

/// Returns a copy of `value` without the fields named by leaves of `tree`.
///
/// A field is removed only when a leaf matches it at that exact depth;
/// branches are followed into containers and ignored on scalars. A removed
/// sequence element leaves a `null` hole so later indices stay stable.
pub fn exclude(value: &Value, tree: &PathTree) -> Value {
    exclude_internal(value, tree).unwrap_or_else(|| value.clone())
}

/// Exclusion with change tracking. Returns None when nothing was removed.
fn exclude_internal(value: &Value, tree: &PathTree) -> Option<Value> {
    if tree.is_empty() {
        return None;
    }

    match value {
        Value::Object(map) => {
            let mut result = Map::new();
            let mut any_changed = false;

            for (key, field) in map {
                match tree.get(key) {
                    Some(PathNode::Leaf) => any_changed = true,
                    Some(PathNode::Branch(subtree)) => match exclude_internal(field, subtree) {
                        Some(pruned) => {
                            result.insert(key.clone(), pruned);
                            any_changed = true;
                        }
                        None => {
                            result.insert(key.clone(), field.clone());
                        }
                    },
                    None => {
                        result.insert(key.clone(), field.clone());
                    }
                }
            }

            any_changed.then_some(Value::Object(result))
        }
        Value::Array(items) => {
            let nodes: BTreeMap<usize, &PathNode> = tree.indexed().collect();
            if nodes.is_empty() {
                return None;
            }

            let mut result = Vec::with_capacity(items.len());
            let mut any_changed = false;

            for (index, item) in items.iter().enumerate() {
                match nodes.get(&index) {
                    Some(PathNode::Leaf) => {
                        result.push(Value::Null);
                        any_changed = true;
                    }
                    Some(PathNode::Branch(subtree)) => match exclude_internal(item, subtree) {
                        Some(pruned) => {
                            result.push(pruned);
                            any_changed = true;
                        }
                        None => result.push(item.clone()),
                    },
                    None => result.push(item.clone()),
                }
            }

            any_changed.then_some(Value::Array(result))
        }
        _ => None,
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}
