//! In-memory document host.
//!
//! `MemoryHost` holds every document of a stack file in one node arena and implements the full
//! host boundary over it: reads, renames, selection, document switching, and change
//! notifications. Every edit (rename, document switch) fires a notification, just as the real
//! editor does after its own model changes.

use std::{collections::HashSet, path::Path};

use serde_yaml::Value;
use tracing::debug;

use crate::{
    ActiveDocument, ChangeDispatcher, ChangeFeed, DocumentKey, DocumentSpec, EffectSpec, HostError,
    LayerSpec, LayerStack, NameEditor, NodeKind, SelectionSink, StackError, StackFile,
    Subscription,
};

/// Handle to a node in a [`MemoryHost`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

/// How a node's name is stored.
#[derive(Debug, Clone)]
enum NameCell {
    /// A string name.
    Text(String),
    /// A non-string scalar, kept as written so it round-trips on save.
    Scalar(Value),
    /// Missing, null, or structured.
    Unreadable(Value),
}

impl NameCell {
    /// Classifies a YAML value.
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(_) | Value::Bool(_) => Self::Scalar(value.clone()),
            other => Self::Unreadable(other.clone()),
        }
    }

    /// Renders the name as a string, if readable.
    fn read(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Scalar(Value::Number(n)) => Some(n.to_string()),
            Self::Scalar(Value::Bool(b)) => Some(b.to_string()),
            Self::Scalar(_) | Self::Unreadable(_) => None,
        }
    }

    /// The YAML value to write back.
    fn to_value(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Scalar(v) | Self::Unreadable(v) => v.clone(),
        }
    }
}

/// A node in the arena.
#[derive(Debug, Clone)]
struct MemoryNode {
    /// Display name.
    name: NameCell,
    /// Kind tag as written in the stack file (layers only).
    tag: String,
    /// Resolved kind, `None` when the tag is unknown.
    kind: Option<NodeKind>,
    /// Host uid, if any.
    uid: Option<u64>,
    /// Whether renames are refused.
    locked: bool,
    /// Sub-layers.
    children: Vec<NodeHandle>,
    /// Content effects.
    effects: Vec<NodeHandle>,
    /// Mask effects, `None` when the layer has no mask.
    mask: Option<Vec<NodeHandle>>,
}

/// A document's root list.
#[derive(Debug, Clone)]
struct MemoryDocument {
    /// Material name.
    material: String,
    /// Stack name.
    stack: Option<String>,
    /// Root layers, top to bottom.
    roots: Vec<NodeHandle>,
}

/// One line of [`MemoryHost::outline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Nesting depth (roots are 0, their effects 1).
    pub depth: usize,
    /// The node.
    pub node: NodeHandle,
    /// Resolved kind, `None` for unknown tags.
    pub kind: Option<NodeKind>,
    /// Readable name, `None` when unreadable.
    pub name: Option<String>,
}

/// A document host backed by in-memory stack documents.
#[derive(Debug, Default)]
pub struct MemoryHost {
    /// Node arena shared by all documents.
    nodes: Vec<MemoryNode>,
    /// Documents in file order.
    documents: Vec<MemoryDocument>,
    /// Index of the open document.
    active: Option<usize>,
    /// Current host selection.
    selection: Vec<NodeHandle>,
    /// Every selection call received, oldest first.
    selection_log: Vec<Vec<NodeHandle>>,
    /// Change notification fan-out.
    dispatcher: ChangeDispatcher,
}

impl MemoryHost {
    /// Builds a host from a parsed stack file.
    pub fn from_stack_file(file: &StackFile) -> Result<Self, StackError> {
        let mut host = Self::default();
        for doc in &file.documents {
            let roots = doc.layers.iter().map(|l| host.insert_layer(l)).collect();
            host.documents.push(MemoryDocument {
                material: doc.material.clone(),
                stack: doc.stack.clone(),
                roots,
            });
        }

        host.check_unique_uids()?;

        if !file.documents.is_empty() && file.active >= file.documents.len() {
            return Err(StackError::ActiveOutOfRange {
                index: file.active,
                count: file.documents.len(),
            });
        }
        host.active = (!file.closed && !file.documents.is_empty()).then_some(file.active);
        Ok(host)
    }

    /// Loads a host from a stack file on disk.
    pub fn load(path: &Path) -> Result<Self, StackError> {
        Self::from_stack_file(&StackFile::load(path)?)
    }

    /// Converts the current state back into a stack file.
    pub fn to_stack_file(&self) -> StackFile {
        let documents = self
            .documents
            .iter()
            .map(|doc| DocumentSpec {
                material: doc.material.clone(),
                stack: doc.stack.clone(),
                layers: doc.roots.iter().map(|h| self.layer_spec(*h)).collect(),
            })
            .collect();
        StackFile {
            active: self.active.unwrap_or(0),
            closed: self.active.is_none(),
            documents,
        }
    }

    /// Writes the current state to disk.
    pub fn save(&self, path: &Path) -> Result<(), StackError> {
        self.to_stack_file().save(path)
    }

    /// Number of documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Index of the open document.
    pub fn active_document(&self) -> Option<usize> {
        self.active
    }

    /// Makes another document active and notifies subscribers.
    pub fn open_document(&mut self, index: usize) -> Result<(), StackError> {
        if index >= self.documents.len() {
            return Err(StackError::ActiveOutOfRange {
                index,
                count: self.documents.len(),
            });
        }
        self.active = Some(index);
        self.selection.clear();
        debug!(index, "opened document");
        self.dispatcher.notify();
        Ok(())
    }

    /// Closes the open document and notifies subscribers.
    pub fn close_document(&mut self) {
        self.active = None;
        self.selection.clear();
        debug!("closed document");
        self.dispatcher.notify();
    }

    /// Finds the first node in the open document whose name is exactly `name`.
    ///
    /// Nodes are searched in stack order: layer, its effects, its mask effects, its children.
    pub fn find_node(&self, name: &str) -> Option<NodeHandle> {
        self.outline()
            .into_iter()
            .find(|entry| entry.name.as_deref() == Some(name))
            .map(|entry| entry.node)
    }

    /// Flattens the open document in stack order.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut out = Vec::new();
        if let Some(doc) = self.active.and_then(|i| self.documents.get(i)) {
            for root in &doc.roots {
                self.outline_into(*root, 0, &mut out);
            }
        }
        out
    }

    /// The current host selection.
    pub fn selection(&self) -> &[NodeHandle] {
        &self.selection
    }

    /// Every selection call received so far.
    pub fn selection_log(&self) -> &[Vec<NodeHandle>] {
        &self.selection_log
    }

    /// Clears the selection call log.
    pub fn clear_selection_log(&mut self) {
        self.selection_log.clear();
    }

    /// Readable name of a node, for display.
    pub fn label(&self, node: NodeHandle) -> String {
        self.node_name(&node).unwrap_or_else(|_| "<unnamed>".to_string())
    }

    /// Number of live change subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.dispatcher.subscriber_count()
    }

    /// Fails on the first uid carried by more than one node.
    fn check_unique_uids(&self) -> Result<(), StackError> {
        let mut seen = HashSet::new();
        for uid in self.nodes.iter().filter_map(|n| n.uid) {
            if !seen.insert(uid) {
                return Err(StackError::DuplicateUid { uid });
            }
        }
        Ok(())
    }

    /// Inserts a layer and its subtree into the arena.
    fn insert_layer(&mut self, spec: &LayerSpec) -> NodeHandle {
        let effects = spec
            .effects
            .iter()
            .map(|e| self.insert_effect(e, NodeKind::ContentEffect))
            .collect();
        let mask = spec.mask.as_ref().map(|effects| {
            effects
                .iter()
                .map(|e| self.insert_effect(e, NodeKind::MaskEffect))
                .collect()
        });
        let children = spec.children.iter().map(|c| self.insert_layer(c)).collect();
        self.push(MemoryNode {
            name: NameCell::from_value(&spec.name),
            tag: spec.kind.clone(),
            kind: NodeKind::from_layer_tag(&spec.kind),
            uid: spec.uid,
            locked: spec.locked,
            children,
            effects,
            mask,
        })
    }

    /// Inserts an effect into the arena.
    fn insert_effect(&mut self, spec: &EffectSpec, kind: NodeKind) -> NodeHandle {
        self.push(MemoryNode {
            name: NameCell::from_value(&spec.name),
            tag: String::new(),
            kind: Some(kind),
            uid: spec.uid,
            locked: spec.locked,
            children: Vec::new(),
            effects: Vec::new(),
            mask: None,
        })
    }

    /// Appends a node to the arena.
    fn push(&mut self, node: MemoryNode) -> NodeHandle {
        self.nodes.push(node);
        NodeHandle(self.nodes.len() - 1)
    }

    /// Looks up a node, failing for handles outside the arena.
    fn node(&self, handle: &NodeHandle) -> Result<&MemoryNode, HostError> {
        self.nodes.get(handle.0).ok_or_else(|| HostError::StaleNode {
            node: format!("{handle:?}"),
        })
    }

    /// Rebuilds a layer spec from the arena.
    fn layer_spec(&self, handle: NodeHandle) -> LayerSpec {
        let node = &self.nodes[handle.0];
        LayerSpec {
            name: node.name.to_value(),
            kind: node.tag.clone(),
            uid: node.uid,
            locked: node.locked,
            effects: node.effects.iter().map(|h| self.effect_spec(*h)).collect(),
            mask: node
                .mask
                .as_ref()
                .map(|m| m.iter().map(|h| self.effect_spec(*h)).collect()),
            children: node.children.iter().map(|h| self.layer_spec(*h)).collect(),
        }
    }

    /// Rebuilds an effect spec from the arena.
    fn effect_spec(&self, handle: NodeHandle) -> EffectSpec {
        let node = &self.nodes[handle.0];
        EffectSpec {
            name: node.name.to_value(),
            uid: node.uid,
            locked: node.locked,
        }
    }

    /// Appends a layer's outline entries.
    fn outline_into(&self, handle: NodeHandle, depth: usize, out: &mut Vec<OutlineEntry>) {
        let node = &self.nodes[handle.0];
        let entry = |h: NodeHandle, depth: usize| OutlineEntry {
            depth,
            node: h,
            kind: self.nodes[h.0].kind,
            name: self.nodes[h.0].name.read(),
        };
        out.push(entry(handle, depth));
        for effect in &node.effects {
            out.push(entry(*effect, depth + 1));
        }
        for effect in node.mask.iter().flatten() {
            out.push(entry(*effect, depth + 1));
        }
        if node.kind == Some(NodeKind::Group) {
            for child in &node.children {
                self.outline_into(*child, depth + 1, out);
            }
        }
    }
}

impl LayerStack for MemoryHost {
    type Node = NodeHandle;

    fn root_nodes(&self) -> Result<Vec<NodeHandle>, HostError> {
        Ok(self
            .active
            .and_then(|i| self.documents.get(i))
            .map(|doc| doc.roots.clone())
            .unwrap_or_default())
    }

    fn node_kind(&self, node: &NodeHandle) -> Result<NodeKind, HostError> {
        let n = self.node(node)?;
        n.kind.ok_or_else(|| HostError::UnknownKind {
            node: format!("{node:?}"),
            kind: n.tag.clone(),
        })
    }

    fn node_name(&self, node: &NodeHandle) -> Result<String, HostError> {
        self.node(node)?
            .name
            .read()
            .ok_or_else(|| HostError::UnreadableName {
                node: format!("{node:?}"),
            })
    }

    fn child_nodes(&self, node: &NodeHandle) -> Result<Vec<NodeHandle>, HostError> {
        let n = self.node(node)?;
        if n.kind == Some(NodeKind::Group) {
            Ok(n.children.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn content_effects(&self, node: &NodeHandle) -> Result<Vec<NodeHandle>, HostError> {
        Ok(self.node(node)?.effects.clone())
    }

    fn has_mask(&self, node: &NodeHandle) -> Result<bool, HostError> {
        Ok(self.node(node)?.mask.is_some())
    }

    fn mask_effects(&self, node: &NodeHandle) -> Result<Vec<NodeHandle>, HostError> {
        Ok(self.node(node)?.mask.clone().unwrap_or_default())
    }

    fn node_uid(&self, node: &NodeHandle) -> Option<u64> {
        self.nodes.get(node.0).and_then(|n| n.uid)
    }
}

impl NameEditor for MemoryHost {
    fn set_node_name(&mut self, node: &NodeHandle, name: &str) -> Result<(), HostError> {
        let slot = self
            .nodes
            .get_mut(node.0)
            .ok_or_else(|| HostError::StaleNode {
                node: format!("{node:?}"),
            })?;
        if slot.locked {
            return Err(HostError::RenameRejected {
                node: format!("{node:?}"),
                reason: "node is locked".to_string(),
            });
        }
        slot.name = NameCell::Text(name.to_string());
        self.dispatcher.notify();
        Ok(())
    }
}

impl SelectionSink<NodeHandle> for MemoryHost {
    fn set_selected_nodes(&mut self, nodes: &[NodeHandle]) {
        self.selection = nodes.to_vec();
        self.selection_log.push(nodes.to_vec());
    }
}

impl ActiveDocument for MemoryHost {
    fn is_document_open(&self) -> bool {
        self.active.is_some()
    }

    fn active_document_key(&self) -> Option<DocumentKey> {
        let doc = self.documents.get(self.active?)?;
        Some(DocumentKey::new(doc.material.clone(), doc.stack.clone()))
    }
}

impl ChangeFeed for MemoryHost {
    fn subscribe(&mut self) -> Subscription {
        self.dispatcher.subscribe()
    }

    fn unsubscribe(&mut self, subscription: &Subscription) {
        self.dispatcher.unsubscribe(subscription.id());
    }
}
