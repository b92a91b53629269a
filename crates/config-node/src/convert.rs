//! Conversion from TOML documents
//!
//! Mapping rules:
//! - scalars become fields (numbers and booleans are stringified; integral
//!   floats keep their `.0`)
//! - arrays of scalars become repeated fields
//! - tables become child blocks tagged with their key
//! - arrays of tables become repeated child blocks

use crate::ConfigNode;

/// Errors raised while converting a TOML table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("Key '{key}' mixes tables and scalar values in one array")]
    MixedArray { key: String },

    #[error("Key '{key}' contains a nested array, which has no field representation")]
    NestedArray { key: String },

    #[error("Key '{key}' is an empty array, which has no field representation")]
    EmptyArray { key: String },
}

impl ConfigNode {
    /// Build a node tagged `tag` from a TOML table
    pub fn from_toml_table(tag: impl Into<String>, table: &toml::Table) -> Result<Self, ConvertError> {
        let mut node = ConfigNode::new(tag);

        for (key, value) in table {
            match value {
                toml::Value::Table(child) => {
                    node.add_node(ConfigNode::from_toml_table(key.as_str(), child)?);
                }
                toml::Value::Array(items) => {
                    if items.is_empty() {
                        return Err(ConvertError::EmptyArray { key: key.clone() });
                    }
                    let tables = items.iter().filter(|item| item.is_table()).count();
                    if tables > 0 && tables != items.len() {
                        return Err(ConvertError::MixedArray { key: key.clone() });
                    }

                    for item in items {
                        match item {
                            toml::Value::Table(child) => {
                                node.add_node(ConfigNode::from_toml_table(key.as_str(), child)?);
                            }
                            toml::Value::Array(_) => {
                                return Err(ConvertError::NestedArray { key: key.clone() });
                            }
                            scalar => node.add_value(key.as_str(), scalar_to_string(scalar)),
                        }
                    }
                }
                scalar => node.add_value(key.as_str(), scalar_to_string(scalar)),
            }
        }

        Ok(node)
    }
}

fn scalar_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}", f),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        // Arrays and tables are handled by the caller
        other => other.to_string(),
    }
}
