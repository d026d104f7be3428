//! Capabilities the search engine consumes from the document host.

use std::{fmt::Debug, hash::Hash};

use crate::{ChangeFeed, DocumentKey, HostError, NodeKind};

/// Read access to the active document's layer stack.
///
/// `Node` is an opaque handle owned by the host. The engine clones handles into its result
/// lists but never creates or destroys nodes. All lists are returned top to bottom.
pub trait LayerStack {
    /// Opaque node handle. Equality and hashing stand in for reference identity.
    type Node: Clone + Eq + Hash + Debug;

    /// Root nodes of the active stack, top to bottom. Empty when no document is open.
    fn root_nodes(&self) -> Result<Vec<Self::Node>, HostError>;

    /// The node's structural kind.
    fn node_kind(&self, node: &Self::Node) -> Result<NodeKind, HostError>;

    /// The node's display name.
    fn node_name(&self, node: &Self::Node) -> Result<String, HostError>;

    /// Sub-layers of a group, top to bottom. Empty for non-groups.
    fn child_nodes(&self, node: &Self::Node) -> Result<Vec<Self::Node>, HostError>;

    /// Content effects of a layer, top to bottom.
    fn content_effects(&self, node: &Self::Node) -> Result<Vec<Self::Node>, HostError>;

    /// Whether the layer carries a mask.
    fn has_mask(&self, node: &Self::Node) -> Result<bool, HostError>;

    /// Mask effects of a layer, top to bottom.
    fn mask_effects(&self, node: &Self::Node) -> Result<Vec<Self::Node>, HostError>;

    /// Stable host identifier for the node, if the host exposes one.
    fn node_uid(&self, node: &Self::Node) -> Option<u64>;
}

/// Renames nodes.
///
/// A successful rename also makes the host emit a change notification, but the engine treats
/// the new name as effective as soon as this returns.
pub trait NameEditor: LayerStack {
    /// Replaces the node's name.
    fn set_node_name(&mut self, node: &Self::Node, name: &str) -> Result<(), HostError>;
}

/// Accepts the nodes the host should highlight.
pub trait SelectionSink<N> {
    /// Replaces the host selection with `nodes`.
    fn set_selected_nodes(&mut self, nodes: &[N]);
}

/// Reports which document, if any, is active.
pub trait ActiveDocument {
    /// Whether a document is open at all.
    fn is_document_open(&self) -> bool;

    /// Key of the active document, or `None` when none is open or the host cannot tell.
    fn active_document_key(&self) -> Option<DocumentKey>;
}

/// Everything a search session needs from its host.
pub trait StackHost:
    NameEditor + SelectionSink<<Self as LayerStack>::Node> + ActiveDocument + ChangeFeed
{
}

impl<T> StackHost for T where
    T: NameEditor + SelectionSink<<T as LayerStack>::Node> + ActiveDocument + ChangeFeed
{
}
