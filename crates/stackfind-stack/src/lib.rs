//! Layer stack host boundary for stackfind.
//!
//! The search engine never owns the document it searches. It talks to a host (the document
//! editor) through the small set of traits defined here:
//!
//! - [`LayerStack`] enumerates root nodes, children, effects and reads names and kinds
//! - [`NameEditor`] renames nodes
//! - [`SelectionSink`] receives the nodes to highlight
//! - [`ActiveDocument`] reports whether a document is open and which one
//! - [`ChangeFeed`] delivers tree-change notifications
//!
//! [`MemoryHost`] implements all of them over documents loaded from YAML, which is what the
//! `stackfind` binary and the test suites drive.

#![warn(missing_docs)]

mod error;
mod feed;
mod host;
mod memory;
mod stackfile;

use std::fmt;

use serde::Serialize;

pub use error::{HostError, StackError};
pub use feed::{ChangeDispatcher, ChangeFeed, Subscription, TreeChanged};
pub use host::{ActiveDocument, LayerStack, NameEditor, SelectionSink, StackHost};
pub use memory::{MemoryHost, NodeHandle, OutlineEntry};
pub use stackfile::{DocumentSpec, EffectSpec, LayerSpec, StackFile};

/// The structural kind of a node in a layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A plain layer (paint, fill, ...).
    Layer,
    /// A folder of layers. Searched as a layer, then recursed into.
    Group,
    /// An effect in a layer's content effect list.
    ContentEffect,
    /// An effect in a layer's mask effect list.
    MaskEffect,
}

impl NodeKind {
    /// Parses the kind names accepted in stack files.
    ///
    /// Returns `None` for anything the host does not understand.
    pub fn from_layer_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "layer" | "paint" | "fill" => Some(Self::Layer),
            "group" | "folder" => Some(Self::Group),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Layer => "layer",
            Self::Group => "group",
            Self::ContentEffect => "content effect",
            Self::MaskEffect => "mask effect",
        };
        f.write_str(name)
    }
}

/// Identifies the active document: the material (texture set) name plus the stack name.
///
/// Two notifications that report the same key come from the same document. Materials with a
/// single unnamed stack report `stack: None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentKey {
    /// Material name.
    pub material: String,
    /// Stack name within the material, if the material has several.
    pub stack: Option<String>,
}

impl DocumentKey {
    /// Creates a key for a material and optional stack name.
    pub fn new(material: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            material: material.into(),
            stack,
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stack {
            Some(stack) if !stack.is_empty() => write!(f, "{}/{}", self.material, stack),
            _ => f.write_str(&self.material),
        }
    }
}
