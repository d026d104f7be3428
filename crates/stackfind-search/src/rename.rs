//! Substring renaming.
//!
//! Only the occurrences of the find text are replaced; the rest of the name is kept. The
//! replacement is inserted verbatim, so `$1` or `\n` in it mean nothing special.

use regex::NoExpand;
use stackfind_stack::NameEditor;
use tracing::{info, warn};

use crate::{
    Skip,
    matcher::{best_effort_name, literal_pattern},
};

/// A completed rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    /// The name before.
    pub old_name: String,
    /// The name after.
    pub new_name: String,
}

/// Replaces occurrences of a substring in node names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameEngine {
    /// Match the find text case-sensitively.
    case_sensitive: bool,
}

impl RenameEngine {
    /// Creates an engine; matching is case-insensitive unless `case_sensitive` is set.
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    /// Returns `name` with every occurrence of `search` replaced.
    ///
    /// Returns `None` when nothing changed.
    pub fn substitute(
        &self,
        name: &str,
        search: &str,
        replacement: &str,
    ) -> Result<Option<String>, Skip> {
        let pattern = literal_pattern(search, self.case_sensitive)?;
        let renamed = pattern.replace_all(name, NoExpand(replacement));
        Ok((renamed != name).then(|| renamed.into_owned()))
    }

    /// Renames one node.
    ///
    /// Returns `Ok(None)` when the name has no occurrence of `search`.
    pub fn replace_one<E: NameEditor>(
        &self,
        editor: &mut E,
        node: &E::Node,
        search: &str,
        replacement: &str,
    ) -> Result<Option<Renamed>, Skip> {
        check_inputs(search, replacement)?;
        let old_name = best_effort_name(editor, node);
        let Some(new_name) = self.substitute(&old_name, search, replacement)? else {
            return Ok(None);
        };

        editor
            .set_node_name(node, &new_name)
            .map_err(|err| Skip::HostRejected {
                name: old_name.clone(),
                reason: err.to_string(),
            })?;
        info!(%old_name, %new_name, "renamed");
        Ok(Some(Renamed { old_name, new_name }))
    }

    /// Renames every node in `nodes` that contains `search`.
    ///
    /// Returns how many nodes changed. Nodes the host refuses to rename are logged and left
    /// out of the count.
    pub fn replace_all<E: NameEditor>(
        &self,
        editor: &mut E,
        nodes: &[E::Node],
        search: &str,
        replacement: &str,
    ) -> Result<usize, Skip> {
        check_inputs(search, replacement)?;
        let pattern = literal_pattern(search, self.case_sensitive)?;

        let mut changed = 0;
        for node in nodes {
            let old_name = best_effort_name(editor, node);
            let new_name = pattern.replace_all(&old_name, NoExpand(replacement));
            if new_name == old_name {
                continue;
            }
            match editor.set_node_name(node, &new_name) {
                Ok(()) => {
                    info!(%old_name, %new_name, "renamed");
                    changed += 1;
                }
                Err(err) => warn!(%old_name, %err, "rename rejected"),
            }
        }
        Ok(changed)
    }
}

/// Rejects empty find or replacement text.
pub fn check_inputs(search: &str, replacement: &str) -> Result<(), Skip> {
    if search.is_empty() {
        return Err(Skip::EmptySearch);
    }
    if replacement.is_empty() {
        return Err(Skip::EmptyReplacement);
    }
    Ok(())
}
