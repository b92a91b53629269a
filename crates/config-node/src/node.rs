//! The config node tree and its name-group primitives

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::NAME_KEY;

/// A tagged block of scalar fields and nested child blocks.
///
/// Fields and children are grouped by name. Group order is not significant
/// for equality; order inside a group is. Groups are never left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    /// Block tag (e.g. `SUBCONFIG`, `Gimbal`)
    tag: String,

    /// Scalar fields grouped by field name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    values: IndexMap<String, Vec<String>>,

    /// Child blocks grouped by tag
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    nodes: IndexMap<String, Vec<ConfigNode>>,
}

impl ConfigNode {
    /// Create an empty node with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            values: IndexMap::new(),
            nodes: IndexMap::new(),
        }
    }

    /// Builder form of [`ConfigNode::add_value`]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_value(name, value);
        self
    }

    /// Builder form of [`ConfigNode::add_node`]
    pub fn with_node(mut self, node: ConfigNode) -> Self {
        self.add_node(node);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The `name` field, if present
    pub fn name(&self) -> Option<&str> {
        self.get_value(NAME_KEY)
    }

    /// First value stored under `name`
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|group| group.first())
            .map(String::as_str)
    }

    /// Every value stored under `name`, in insertion order
    pub fn get_values(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Append a value, keeping any existing entries of the same name
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Overwrite the first entry of `name`.
    ///
    /// Returns `false` and leaves the node untouched when no such field exists.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(name).and_then(|group| group.first_mut()) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Replace the whole group for `name`. An empty `values` removes the group.
    pub fn replace_values(&mut self, name: &str, values: Vec<String>) {
        if values.is_empty() {
            self.values.shift_remove(name);
        } else {
            self.values.insert(name.to_string(), values);
        }
    }

    /// Remove every entry named `name`, returning how many were removed
    pub fn remove_values(&mut self, name: &str) -> usize {
        self.values.shift_remove(name).map_or(0, |group| group.len())
    }

    /// First child block tagged `tag`
    pub fn get_node(&self, tag: &str) -> Option<&ConfigNode> {
        self.nodes.get(tag).and_then(|group| group.first())
    }

    /// Every child block tagged `tag`, in insertion order
    pub fn get_nodes(&self, tag: &str) -> &[ConfigNode] {
        self.nodes.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_node(&self, tag: &str) -> bool {
        self.nodes.contains_key(tag)
    }

    /// Append a child block under its own tag
    pub fn add_node(&mut self, node: ConfigNode) {
        self.nodes.entry(node.tag.clone()).or_default().push(node);
    }

    /// Remove every child block tagged `tag`, returning how many were removed
    pub fn remove_nodes(&mut self, tag: &str) -> usize {
        self.nodes.shift_remove(tag).map_or(0, |group| group.len())
    }

    /// Distinct field names in first-appearance order
    pub fn distinct_value_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Distinct child tags in first-appearance order
    pub fn distinct_node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// All `(name, value)` pairs, group by group
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().flat_map(|(name, group)| {
            group
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// All child blocks, group by group
    pub fn nodes(&self) -> impl Iterator<Item = &ConfigNode> {
        self.nodes.values().flatten()
    }

    /// Append copies of every field and child of `self` onto `target`.
    ///
    /// Existing entries on `target` are kept; callers wanting replacement
    /// must remove the affected names first.
    pub fn copy_to(&self, target: &mut ConfigNode) {
        for (name, group) in &self.values {
            target
                .values
                .entry(name.clone())
                .or_default()
                .extend(group.iter().cloned());
        }
        for (tag, group) in &self.nodes {
            target
                .nodes
                .entry(tag.clone())
                .or_default()
                .extend(group.iter().cloned());
        }
    }

    /// Number of field entries, counting repeats
    pub fn value_count(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    /// Number of child blocks, counting repeats
    pub fn node_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.nodes.is_empty()
    }
}
