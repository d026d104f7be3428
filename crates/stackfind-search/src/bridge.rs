//! Selection bridging between effect categories.
//!
//! The host cannot select a mask effect right after a content effect (or the reverse) unless
//! the owning layer is selected in between. The bridge remembers the category of the last
//! real selection and inserts that intermediate step when needed.

use stackfind_stack::SelectionSink;
use tracing::debug;

use crate::MatchCategory;

/// The selection calls needed to make a node current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction<N> {
    /// Select the node directly.
    Single(N),
    /// Select the owning layer first, then the node.
    Bridged {
        /// The owning layer.
        parent: N,
        /// The target node.
        node: N,
    },
}

impl<N: Clone> SelectionAction<N> {
    /// The target node.
    pub fn node(&self) -> &N {
        match self {
            Self::Single(node) | Self::Bridged { node, .. } => node,
        }
    }

    /// Issues the selection calls in order.
    pub fn apply<S: SelectionSink<N> + ?Sized>(&self, sink: &mut S) {
        match self {
            Self::Single(node) => sink.set_selected_nodes(&[node.clone()]),
            Self::Bridged { parent, node } => {
                sink.set_selected_nodes(&[parent.clone()]);
                sink.set_selected_nodes(&[node.clone()]);
            }
        }
    }
}

/// Tracks the last selected category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionBridge {
    /// Category of the last node actually selected.
    last_category: Option<MatchCategory>,
}

impl SelectionBridge {
    /// Creates a bridge with no selection history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Category of the last real selection.
    pub fn last_category(&self) -> Option<MatchCategory> {
        self.last_category
    }

    /// Decides the selection calls for `node` without issuing them.
    ///
    /// Bridging applies only between the two effect categories. A missing parent degrades to a
    /// direct selection.
    pub fn plan<N: Clone>(
        &self,
        node: &N,
        category: MatchCategory,
        parent: Option<&N>,
    ) -> SelectionAction<N> {
        let crossing = self
            .last_category
            .is_some_and(|last| last.is_effect() && category.is_effect() && last != category);

        match (crossing, parent) {
            (true, Some(parent)) => SelectionAction::Bridged {
                parent: parent.clone(),
                node: node.clone(),
            },
            (true, None) => {
                debug!(%category, "no owning layer recorded; selecting directly");
                SelectionAction::Single(node.clone())
            }
            (false, _) => SelectionAction::Single(node.clone()),
        }
    }

    /// Selects `node` through `sink` and records its category.
    pub fn select<N, S>(
        &mut self,
        sink: &mut S,
        node: &N,
        category: MatchCategory,
        parent: Option<&N>,
    ) -> SelectionAction<N>
    where
        N: Clone,
        S: SelectionSink<N> + ?Sized,
    {
        let action = self.plan(node, category, parent);
        action.apply(sink);
        self.last_category = Some(category);
        action
    }

    /// Forgets the last category.
    pub fn reset(&mut self) {
        self.last_category = None;
    }
}
