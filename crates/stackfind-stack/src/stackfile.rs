//! YAML stack file schema.
//!
//! A stack file holds one or more documents (material + stack), each with its layers listed
//! top to bottom:
//!
//! ```yaml
//! active: 0
//! documents:
//!   - material: Rock
//!     layers:
//!       - name: Base Detail
//!         effects:
//!           - name: Base Glow
//!         mask:
//!           - name: Edge Wear
//!       - name: Dirt
//!         kind: group
//!         children:
//!           - name: Grime
//! ```
//!
//! Names are read leniently: any scalar is accepted and rendered as a string, while a missing
//! or null name makes the node's name unreadable.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::StackError;

/// Top-level stack file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StackFile {
    /// Index of the active document.
    #[serde(default)]
    pub active: usize,
    /// When true, the host starts with no document open.
    #[serde(default, skip_serializing_if = "is_false")]
    pub closed: bool,
    /// Documents in the file.
    #[serde(default)]
    pub documents: Vec<DocumentSpec>,
}

/// One document: a material's layer stack.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DocumentSpec {
    /// Material (texture set) name.
    pub material: String,
    /// Stack name, for materials with several stacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Root layers, top to bottom.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

/// A layer or group.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayerSpec {
    /// Display name, any YAML scalar.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub name: Value,
    /// Kind tag (`layer`, `fill`, `paint`, `group`, `folder`).
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Host uid, when the host exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    /// Locked nodes refuse renames.
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    /// Content effects, top to bottom.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectSpec>,
    /// Mask effects. Present (even empty) means the layer has a mask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Vec<EffectSpec>>,
    /// Sub-layers, only meaningful for groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayerSpec>,
}

impl LayerSpec {
    /// A plain layer with the given name.
    pub fn layer(name: &str) -> Self {
        Self {
            name: Value::String(name.to_string()),
            kind: default_kind(),
            uid: None,
            locked: false,
            effects: Vec::new(),
            mask: None,
            children: Vec::new(),
        }
    }

    /// A group with the given name and children.
    pub fn group(name: &str, children: Vec<Self>) -> Self {
        Self {
            kind: "group".to_string(),
            children,
            ..Self::layer(name)
        }
    }

    /// Adds content effects.
    pub fn with_effects(mut self, names: &[&str]) -> Self {
        self.effects.extend(names.iter().map(|n| EffectSpec::named(n)));
        self
    }

    /// Adds a mask with the given effects.
    pub fn with_mask(mut self, names: &[&str]) -> Self {
        self.mask
            .get_or_insert_with(Vec::new)
            .extend(names.iter().map(|n| EffectSpec::named(n)));
        self
    }
}

/// A content or mask effect.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EffectSpec {
    /// Display name, any YAML scalar.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub name: Value,
    /// Host uid, when the host exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    /// Locked nodes refuse renames.
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
}

impl EffectSpec {
    /// An effect with the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: Value::String(name.to_string()),
            uid: None,
            locked: false,
        }
    }
}

impl StackFile {
    /// Reads and parses a stack file from disk.
    pub fn load(path: &Path) -> Result<Self, StackError> {
        let contents = fs::read_to_string(path).map_err(|source| StackError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents, path)
    }

    /// Parses a stack file from a YAML string.
    ///
    /// The `path` parameter is used for error reporting.
    pub fn from_yaml_str(contents: &str, path: &Path) -> Result<Self, StackError> {
        serde_yaml::from_str(contents).map_err(|source| StackError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serializes the stack file to YAML.
    pub fn to_yaml_string(&self) -> Result<String, StackError> {
        serde_yaml::to_string(self).map_err(StackError::Serialize)
    }

    /// Writes the stack file to disk.
    pub fn save(&self, path: &Path) -> Result<(), StackError> {
        let yaml = self.to_yaml_string()?;
        fs::write(path, yaml).map_err(|source| StackError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Default kind tag for layers that omit `kind`.
fn default_kind() -> String {
    "layer".to_string()
}

/// Serde helper for skipping false booleans.
fn is_false(value: &bool) -> bool {
    !*value
}
