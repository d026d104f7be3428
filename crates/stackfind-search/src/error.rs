//! Named no-op results.

use thiserror::Error;

/// Why an operation did nothing.
///
/// None of these are failures of the engine: each one names a transient input condition and
/// leaves the search state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Skip {
    /// No document is open in the host.
    #[error("no document is open")]
    NoDocument,

    /// The find field is empty.
    #[error("find text is empty; nothing to replace")]
    EmptySearch,

    /// The replacement field is empty.
    #[error("replacement text must be filled")]
    EmptyReplacement,

    /// No match is current.
    #[error("no active selection")]
    NoSelection,

    /// The active result view is empty.
    #[error("no matches")]
    NoResults,

    /// The current match does not contain the find text.
    #[error("no occurrences of '{search}' found in '{name}'")]
    NoOccurrence {
        /// The find text.
        search: String,
        /// The node's current name.
        name: String,
    },

    /// The find text could not be compiled into a matcher.
    #[error("cannot search for '{search}': {reason}")]
    InvalidSearch {
        /// The find text.
        search: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The host refused the rename.
    #[error("host rejected rename of '{name}': {reason}")]
    HostRejected {
        /// The node's name before the attempt.
        name: String,
        /// The host's explanation.
        reason: String,
    },
}
