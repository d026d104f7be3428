//! Depth-first traversal of a layer stack.

use std::fmt::Debug;

use stackfind_stack::{HostError, LayerStack, NodeKind};
use tracing::warn;

use crate::{
    IdentityMap, NameMatcher,
    store::{Hit, MatchCategory, ResultSet},
};

/// Collects matches from a stack in top-to-bottom order.
///
/// Each node is visited as: the node itself, its content effects, its mask effects, then its
/// children if it is a group. A node whose kind cannot be read is skipped with its subtree.
#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'a> {
    /// The predicate applied to every name.
    matcher: &'a NameMatcher,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker testing names with `matcher`.
    pub fn new(matcher: &'a NameMatcher) -> Self {
        Self { matcher }
    }

    /// Walks every root of `stack` and returns the matches.
    pub fn collect<S>(&self, stack: &S, ids: &mut IdentityMap<S::Node>) -> ResultSet<S::Node>
    where
        S: LayerStack,
    {
        let mut set = ResultSet::new();
        let roots = match stack.root_nodes() {
            Ok(roots) => roots,
            Err(err) => {
                warn!(%err, "cannot list root layers");
                return set;
            }
        };

        // Pending nodes, rightmost pushed first so the top layer pops first
        let mut pending: Vec<S::Node> = roots.into_iter().rev().collect();
        while let Some(node) = pending.pop() {
            let kind = match stack.node_kind(&node) {
                Ok(kind) => kind,
                Err(err) => {
                    warn!(?node, %err, "skipping unreadable node");
                    continue;
                }
            };

            self.visit(stack, ids, &mut set, &node, MatchCategory::Layer, None);

            for effect in read_list(stack.content_effects(&node), &node, "content effects") {
                self.visit(
                    stack,
                    ids,
                    &mut set,
                    &effect,
                    MatchCategory::ContentEffect,
                    Some(&node),
                );
            }

            let has_mask = stack.has_mask(&node).unwrap_or_else(|err| {
                warn!(?node, %err, "cannot read mask state");
                false
            });
            if has_mask {
                for effect in read_list(stack.mask_effects(&node), &node, "mask effects") {
                    self.visit(
                        stack,
                        ids,
                        &mut set,
                        &effect,
                        MatchCategory::MaskEffect,
                        Some(&node),
                    );
                }
            }

            if kind == NodeKind::Group {
                let children = read_list(stack.child_nodes(&node), &node, "children");
                pending.extend(children.into_iter().rev());
            }
        }

        set
    }

    /// Tests one node and records it when it matches.
    fn visit<S>(
        &self,
        stack: &S,
        ids: &mut IdentityMap<S::Node>,
        set: &mut ResultSet<S::Node>,
        node: &S::Node,
        category: MatchCategory,
        parent: Option<&S::Node>,
    ) where
        S: LayerStack,
    {
        if !self.matcher.matches(stack, node) {
            return;
        }
        let hit = Hit {
            node: node.clone(),
            id: ids.identity(stack, node),
        };
        set.push(hit, category, parent.cloned());
    }
}

/// Unwraps a child list, treating a failed read as empty.
fn read_list<N: Debug>(
    list: Result<Vec<N>, HostError>,
    owner: &N,
    what: &str,
) -> Vec<N> {
    list.unwrap_or_else(|err| {
        warn!(?owner, %err, "cannot read {what}");
        Vec::new()
    })
}
