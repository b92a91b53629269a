//! Hierarchical configuration nodes.
//!
//! A [`ConfigNode`] is a tagged block holding named scalar fields and named
//! child blocks. Both are stored as ordered name-groups: every entry sharing a
//! name lives in one group, so "remove everything called X" and "append the
//! entries of another node" are the only primitives override logic needs.

mod convert;
mod node;
mod render;

pub use convert::ConvertError;
pub use node::ConfigNode;

/// Field holding the identity of base configurations and patches.
pub const NAME_KEY: &str = "name";
