//! Match counts for display.

use std::fmt;

use serde::Serialize;

/// Position of the cursor and the size of each result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Zero-based index of the current match in the active view.
    pub index: Option<usize>,
    /// Length of the active view.
    pub total: usize,
    /// Layer and group matches.
    pub layers: usize,
    /// Content effect matches.
    pub content_effects: usize,
    /// Mask effect matches.
    pub mask_effects: usize,
}

impl Status {
    /// Returns true when a match is current.
    pub fn has_selection(&self) -> bool {
        self.total > 0 && self.index.is_some()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) if self.total > 0 => write!(f, "{} out of {}", index + 1, self.total),
            _ => f.write_str("0 out of 0"),
        }
    }
}
