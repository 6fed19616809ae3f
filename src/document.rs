//! Typed access to a single KRM resource.
//!
//! A [`Document`] wraps an ordered YAML tree. Field lookups go through typed
//! accessors that report the [`NodeKind`] actually found when a mapping was
//! expected, so callers never probe node types by hand.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Shape of a node in a document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Explicit YAML null (`~`, `null` or an empty value).
    Null,
    /// String, number or boolean.
    Scalar,
    Mapping,
    Sequence,
}

impl NodeKind {
    /// Classify a YAML value. Tagged values report the kind of their content.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => NodeKind::Null,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => NodeKind::Scalar,
            Value::Sequence(_) => NodeKind::Sequence,
            Value::Mapping(_) => NodeKind::Mapping,
            Value::Tagged(tagged) => NodeKind::of(&tagged.value),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Scalar => "scalar",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
        };
        f.write_str(name)
    }
}

/// View a node as a mapping.
///
/// `Ok(None)` for an explicit null, `Err(kind)` for anything that is neither
/// a mapping nor null.
pub fn as_mapping(value: &Value) -> Result<Option<&Mapping>, NodeKind> {
    match value {
        Value::Null => Ok(None),
        Value::Mapping(mapping) => Ok(Some(mapping)),
        Value::Tagged(tagged) => as_mapping(&tagged.value),
        other => Err(NodeKind::of(other)),
    }
}

/// Mutable counterpart of [`as_mapping`].
pub fn as_mapping_mut(value: &mut Value) -> Result<Option<&mut Mapping>, NodeKind> {
    match value {
        Value::Null => Ok(None),
        Value::Mapping(mapping) => Ok(Some(mapping)),
        Value::Tagged(tagged) => as_mapping_mut(&mut tagged.value),
        other => Err(NodeKind::of(other)),
    }
}

/// Render a mapping key for log lines and error messages.
pub fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("<{}>", NodeKind::of(other))),
    }
}

/// One resource in the function's input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    pub fn new(root: Value) -> Self {
        Self(root)
    }

    /// Parse a single YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text).map(Self)
    }

    pub fn root(&self) -> &Value {
        &self.0
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.0)
    }

    /// Top-level field by name. `None` when absent or when the root is not a mapping.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.0.get_mut(name)
    }

    /// Top-level field that must be a mapping when present.
    pub fn mapping(&self, name: &str) -> Result<Option<&Mapping>, NodeKind> {
        match self.field(name) {
            Some(value) => as_mapping(value),
            None => Ok(None),
        }
    }

    pub fn mapping_mut(&mut self, name: &str) -> Result<Option<&mut Mapping>, NodeKind> {
        match self.field_mut(name) {
            Some(value) => as_mapping_mut(value),
            None => Ok(None),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.field("kind").and_then(Value::as_str)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.field("apiVersion").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.field("metadata")
            .and_then(|metadata| metadata.get(key))
            .and_then(Value::as_str)
    }

    /// `Kind/namespace/name` identity used in logs and errors.
    pub fn display_id(&self) -> String {
        let kind = self.kind().unwrap_or("<unknown>");
        let name = self.name().unwrap_or("<unnamed>");
        match self.namespace() {
            Some(namespace) => format!("{kind}/{namespace}/{name}"),
            None => format!("{kind}/{name}"),
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.0
    }
}
