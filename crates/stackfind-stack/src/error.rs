//! Error types for the host boundary and stack files.

use std::{io, path::PathBuf};

use thiserror::Error;

/// A failed read or write against the host's layer stack.
///
/// These are per-node failures. Callers in the search engine skip the offending node and keep
/// going; nothing here is meant to abort a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The node handle does not refer to a live node.
    #[error("node {node} no longer exists")]
    StaleNode {
        /// Debug rendering of the handle.
        node: String,
    },

    /// The host reported a node kind the engine does not know.
    #[error("node {node} has unknown kind '{kind}'")]
    UnknownKind {
        /// Debug rendering of the handle.
        node: String,
        /// The kind tag the host reported.
        kind: String,
    },

    /// The node's name could not be read.
    #[error("node {node} has no readable name")]
    UnreadableName {
        /// Debug rendering of the handle.
        node: String,
    },

    /// The host refused to rename the node.
    #[error("node {node} cannot be renamed: {reason}")]
    RenameRejected {
        /// Debug rendering of the handle.
        node: String,
        /// Host-provided reason.
        reason: String,
    },

    /// No document is open.
    #[error("no document is open")]
    NoDocument,
}

/// Errors that can occur when loading or saving stack files.
#[derive(Debug, Error)]
pub enum StackError {
    /// Failed to read a stack file.
    #[error("failed to read stack file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write a stack file.
    #[error("failed to write stack file {path}: {source}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The stack file is not valid YAML for the stack schema.
    #[error("failed to parse stack file {path}: {source}")]
    Parse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// Serializing the stack back to YAML failed.
    #[error("failed to serialize stack: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// Two nodes in the file share a uid.
    #[error("uid {uid} is used by more than one node")]
    DuplicateUid {
        /// The repeated uid.
        uid: u64,
    },

    /// The `active` index points past the document list.
    #[error("active document index {index} is out of range ({count} documents)")]
    ActiveOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of documents in the file.
        count: usize,
    },
}
