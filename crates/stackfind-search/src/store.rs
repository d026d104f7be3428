//! Result sets and the store that recomputes them.

use std::{collections::HashMap, fmt, hash::Hash};

use serde::Serialize;
use stackfind_config::ResultView;
use stackfind_stack::LayerStack;
use tracing::debug;

use crate::{IdentityMap, NameMatcher, NodeId, walker::TreeWalker};

/// Which list a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchCategory {
    /// A layer or group.
    Layer,
    /// A content effect.
    ContentEffect,
    /// A mask effect.
    MaskEffect,
}

impl MatchCategory {
    /// Returns true for the two effect categories.
    pub fn is_effect(self) -> bool {
        matches!(self, Self::ContentEffect | Self::MaskEffect)
    }

    /// The per-category view listing this category.
    pub fn view(self) -> ResultView {
        match self {
            Self::Layer => ResultView::Layers,
            Self::ContentEffect => ResultView::ContentEffects,
            Self::MaskEffect => ResultView::MaskEffects,
        }
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Layer => "layer",
            Self::ContentEffect => "content effect",
            Self::MaskEffect => "mask effect",
        };
        f.write_str(name)
    }
}

/// A matched node and its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<N> {
    /// The node handle.
    pub node: N,
    /// The node's identity at match time.
    pub id: NodeId,
}

/// Where a matched node sits in the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement<N> {
    /// The node's category.
    pub category: MatchCategory,
    /// The owning layer, for effects.
    pub parent: Option<N>,
}

/// All matches for one needle.
///
/// `combined` is the traversal order; the three category lists are its stable partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet<N> {
    /// Layer and group matches.
    layers: Vec<Hit<N>>,
    /// Content effect matches.
    content_effects: Vec<Hit<N>>,
    /// Mask effect matches.
    mask_effects: Vec<Hit<N>>,
    /// Every match in traversal order.
    combined: Vec<Hit<N>>,
    /// Category and owning layer by identity.
    placements: HashMap<NodeId, Placement<N>>,
}

impl<N> Default for ResultSet<N> {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            content_effects: Vec::new(),
            mask_effects: Vec::new(),
            combined: Vec::new(),
            placements: HashMap::new(),
        }
    }
}

impl<N: Clone> ResultSet<N> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a match to its category list and to the combined list.
    pub fn push(&mut self, hit: Hit<N>, category: MatchCategory, parent: Option<N>) {
        self.placements
            .insert(hit.id, Placement { category, parent });
        let list = match category {
            MatchCategory::Layer => &mut self.layers,
            MatchCategory::ContentEffect => &mut self.content_effects,
            MatchCategory::MaskEffect => &mut self.mask_effects,
        };
        list.push(hit.clone());
        self.combined.push(hit);
    }

    /// Layer and group matches.
    pub fn layers(&self) -> &[Hit<N>] {
        &self.layers
    }

    /// Content effect matches.
    pub fn content_effects(&self) -> &[Hit<N>] {
        &self.content_effects
    }

    /// Mask effect matches.
    pub fn mask_effects(&self) -> &[Hit<N>] {
        &self.mask_effects
    }

    /// Every match in traversal order.
    pub fn combined(&self) -> &[Hit<N>] {
        &self.combined
    }

    /// The sequence a view walks.
    pub fn view(&self, view: ResultView) -> &[Hit<N>] {
        match view {
            ResultView::Combined => &self.combined,
            ResultView::Layers => &self.layers,
            ResultView::ContentEffects => &self.content_effects,
            ResultView::MaskEffects => &self.mask_effects,
        }
    }

    /// Category and owner of a matched node.
    pub fn placement(&self, id: &NodeId) -> Option<&Placement<N>> {
        self.placements.get(id)
    }

    /// Category of a matched node.
    pub fn category(&self, id: &NodeId) -> Option<MatchCategory> {
        self.placement(id).map(|p| p.category)
    }

    /// Owning layer of a matched effect.
    pub fn parent(&self, id: &NodeId) -> Option<&N> {
        self.placement(id).and_then(|p| p.parent.as_ref())
    }

    /// Sizes of the layer, content effect and mask effect lists.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (
            self.layers.len(),
            self.content_effects.len(),
            self.mask_effects.len(),
        )
    }

    /// Total number of matches.
    pub fn len(&self) -> usize {
        self.combined.len()
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
    }
}

/// Holds the current result set and recomputes it on demand.
#[derive(Debug)]
pub struct ResultStore<N> {
    /// The needle the current set was computed for, empty when inactive.
    needle: String,
    /// The current set.
    set: ResultSet<N>,
}

impl<N> Default for ResultStore<N> {
    fn default() -> Self {
        Self {
            needle: String::new(),
            set: ResultSet::default(),
        }
    }
}

impl<N: Clone + Eq + Hash> ResultStore<N> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes matches for `needle` over the whole stack.
    ///
    /// A blank needle deactivates the search and empties every list. Otherwise the needle is
    /// used as given and the new set replaces the old one in a single assignment. Returns
    /// whether the category sizes changed, with the new set.
    pub fn recompute<S>(
        &mut self,
        stack: &S,
        needle: &str,
        ids: &mut IdentityMap<N>,
    ) -> (bool, &ResultSet<N>)
    where
        S: LayerStack<Node = N>,
    {
        let before = self.set.sizes();

        if needle.trim().is_empty() {
            self.clear();
        } else {
            let next = TreeWalker::new(&NameMatcher::new(needle)).collect(stack, ids);
            self.needle = needle.to_string();
            self.set = next;
        }

        let after = self.set.sizes();
        debug!(needle, ?before, ?after, "recomputed matches");
        (before != after, &self.set)
    }

    /// The current set.
    pub fn results(&self) -> &ResultSet<N> {
        &self.set
    }

    /// The needle the current set was computed for.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Drops all matches.
    pub fn clear(&mut self) {
        self.needle.clear();
        self.set = ResultSet::new();
    }
}
