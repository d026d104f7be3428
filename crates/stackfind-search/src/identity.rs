//! Stable node identities.
//!
//! Hosts that expose a uid get [`NodeId::Host`]. Everything else gets a synthetic id issued
//! per node handle, which stays stable until the map is cleared on a document switch.

use std::{collections::HashMap, fmt, hash::Hash};

use stackfind_stack::LayerStack;

/// Comparable identity of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    /// Uid reported by the host.
    Host(u64),
    /// Id issued by an [`IdentityMap`] for a host without uids.
    Synthetic(u64),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(uid) => write!(f, "uid:{uid}"),
            Self::Synthetic(id) => write!(f, "ref:{id}"),
        }
    }
}

/// Issues identities for node handles.
#[derive(Debug)]
pub struct IdentityMap<N> {
    /// Synthetic ids by node handle.
    issued: HashMap<N, u64>,
    /// Next synthetic id to hand out.
    next: u64,
}

impl<N> Default for IdentityMap<N> {
    fn default() -> Self {
        Self {
            issued: HashMap::new(),
            next: 0,
        }
    }
}

impl<N: Clone + Eq + Hash> IdentityMap<N> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identity of `node`, preferring the host uid.
    pub fn identity<S>(&mut self, stack: &S, node: &N) -> NodeId
    where
        S: LayerStack<Node = N>,
    {
        if let Some(uid) = stack.node_uid(node) {
            return NodeId::Host(uid);
        }
        if let Some(id) = self.issued.get(node) {
            return NodeId::Synthetic(*id);
        }
        let id = self.next;
        self.next += 1;
        self.issued.insert(node.clone(), id);
        NodeId::Synthetic(id)
    }

    /// Number of synthetic ids issued since the last clear.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Returns true if no synthetic ids are live.
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// Forgets every synthetic id.
    pub fn clear(&mut self) {
        self.issued.clear();
        self.next = 0;
    }
}
