//! Reaction to external tree changes.

use std::mem;

use stackfind_stack::DocumentKey;
use tracing::info;

/// What a change notification calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// A different document is active: drop all search state.
    Reset {
        /// The previously bound document.
        from: Option<DocumentKey>,
        /// The newly bound document.
        to: Option<DocumentKey>,
    },
    /// Same document, edited in place: recompute without selecting.
    Refresh,
    /// Nothing is open: keep the lists empty.
    NoDocument,
}

/// Tracks which document the search state belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReactor {
    /// The document the current state was computed against.
    bound: Option<DocumentKey>,
}

impl ChangeReactor {
    /// Creates an unbound reactor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound document.
    pub fn bound(&self) -> Option<&DocumentKey> {
        self.bound.as_ref()
    }

    /// Binds to `key` without reacting.
    pub fn bind(&mut self, key: Option<DocumentKey>) {
        self.bound = key;
    }

    /// Classifies a notification given the host's current state.
    ///
    /// A closed document leaves the binding alone, so reopening the same document later is
    /// treated as an in-place edit.
    pub fn observe(&mut self, document_open: bool, key: Option<DocumentKey>) -> Reaction {
        if !document_open {
            return Reaction::NoDocument;
        }
        if key == self.bound {
            return Reaction::Refresh;
        }

        let from = mem::replace(&mut self.bound, key.clone());
        info!(from = ?from, to = ?key, "document switched");
        Reaction::Reset { from, to: key }
    }
}
