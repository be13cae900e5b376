//! Content loading from JSON documents.
//!
//! Each JSON object becomes a node. `jcr:primaryType` sets its type (default
//! `nt:unstructured`), `jcr:uuid` its identifier (default: a random one).
//! Nested objects become child nodes in document order; every other member
//! becomes a property: integers as `Long`, other numbers as `Double`, booleans,
//! strings, and arrays of those as multi-valued properties. `null` members are
//! skipped.

use form_status_types::{IDENTIFIER, NodePath, PRIMARY_TYPE, Property, PropertyValue, TreeError};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::tree::{MemoryTree, UNSTRUCTURED_TYPE};

/// Error type for loading JSON content.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected an object for node '{0}'")]
    NotAnObject(String),

    #[error("Unsupported value for property '{name}' of {path}")]
    UnsupportedValue { path: NodePath, name: String },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl MemoryTree {
    /// Load a JSON document as a new child `name` of `parent`.
    pub fn load_json(&mut self, parent: &NodePath, name: &str, json: &str) -> Result<NodePath, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        self.load_value(parent, name, &value)
    }

    /// Load an already parsed JSON value as a new child `name` of `parent`.
    pub fn load_value(&mut self, parent: &NodePath, name: &str, value: &Value) -> Result<NodePath, LoadError> {
        let Value::Object(members) = value else {
            return Err(LoadError::NotAnObject(name.to_string()));
        };
        let path = self.load_object(parent, name, members)?;
        debug!(%path, nodes = self.len(), "Loaded JSON content");
        Ok(path)
    }

    fn load_object(&mut self, parent: &NodePath, name: &str, members: &Map<String, Value>) -> Result<NodePath, LoadError> {
        let primary_type = members
            .get(PRIMARY_TYPE)
            .and_then(Value::as_str)
            .unwrap_or(UNSTRUCTURED_TYPE);
        let identifier = match members.get(IDENTIFIER).and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.add_node_with_id(parent, name, primary_type, &identifier)?;

        for (key, value) in members {
            if key == PRIMARY_TYPE || key == IDENTIFIER {
                continue;
            }
            match value {
                Value::Null => {}
                Value::Object(child) => {
                    self.load_object(&path, key, child)?;
                }
                Value::Array(items) => {
                    let values = items
                        .iter()
                        .map(scalar)
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| unsupported(&path, key))?;
                    self.set(&path, key, Property::Multiple(values))?;
                }
                scalar_value => {
                    let value = scalar(scalar_value).ok_or_else(|| unsupported(&path, key))?;
                    self.set(&path, key, value)?;
                }
            }
        }
        Ok(path)
    }
}

fn scalar(value: &Value) -> Option<PropertyValue> {
    match value {
        Value::Bool(b) => Some(PropertyValue::Boolean(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(PropertyValue::Long)
            .or_else(|| n.as_f64().map(PropertyValue::Double)),
        Value::String(s) => Some(PropertyValue::String(s.clone())),
        _ => None,
    }
}

fn unsupported(path: &NodePath, name: &str) -> LoadError {
    LoadError::UnsupportedValue {
        path: path.clone(),
        name: name.to_string(),
    }
}
