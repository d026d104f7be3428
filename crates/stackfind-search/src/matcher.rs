//! Case-insensitive name matching.
//!
//! Search and rename share one literal pattern builder, so a name the search lists is always
//! one the rename can edit. Case-insensitive patterns use Unicode simple case folding.

use regex::{Regex, RegexBuilder};
use stackfind_stack::LayerStack;
use tracing::{debug, warn};

use crate::Skip;

/// Compiles `search` as a literal pattern.
pub fn literal_pattern(search: &str, case_sensitive: bool) -> Result<Regex, Skip> {
    RegexBuilder::new(&regex::escape(search))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| Skip::InvalidSearch {
            search: search.to_string(),
            reason: err.to_string(),
        })
}

/// Reads a node's display name without ever failing.
///
/// An unreadable name becomes the empty string, which no non-empty needle matches.
pub fn best_effort_name<S: LayerStack>(stack: &S, node: &S::Node) -> String {
    match stack.node_name(node) {
        Ok(name) => name,
        Err(err) => {
            debug!(?node, %err, "name unreadable; using placeholder");
            String::new()
        }
    }
}

/// Substring predicate over node names.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    /// The needle as given.
    needle: String,
    /// Compiled needle, `None` when it could not be compiled.
    pattern: Option<Regex>,
}

impl NameMatcher {
    /// Creates a case-insensitive matcher for `needle`.
    ///
    /// A needle too large to compile matches nothing.
    pub fn new(needle: &str) -> Self {
        let pattern = literal_pattern(needle, false)
            .inspect_err(|skip| warn!(%skip, "needle matches nothing"))
            .ok();
        Self {
            needle: needle.to_string(),
            pattern,
        }
    }

    /// The needle as given.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Tests a raw name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(name))
    }

    /// Tests a node's name.
    pub fn matches<S: LayerStack>(&self, stack: &S, node: &S::Node) -> bool {
        self.matches_name(&best_effort_name(stack, node))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use stackfind_stack::{MemoryHost, StackFile};

    use super::*;

    #[test]
    fn test_case_insensitive_substring() {
        let matcher = NameMatcher::new("BASE");
        assert_eq!(matcher.needle(), "BASE");
        assert!(matcher.matches_name("Base Detail"));
        assert!(matcher.matches_name("database"));
        assert!(!matcher.matches_name("Grime"));
    }

    #[test]
    fn test_unicode_folding() {
        let matcher = NameMatcher::new("ÉCLAT");
        assert!(matcher.matches_name("Gros éclat"));
        assert!(NameMatcher::new("K").matches_name("\u{212A}elvin"));
    }

    #[test]
    fn test_needle_is_literal() {
        let matcher = NameMatcher::new("a.b");
        assert!(matcher.matches_name("Wear A.B"));
        assert!(!matcher.matches_name("Wear AxB"));
    }

    #[test]
    fn test_odd_names() {
        let yaml = r"
documents:
  - material: Rock
    layers:
      - name: 2048
      - name: true
      - kind: layer
";
        let file = StackFile::from_yaml_str(yaml, Path::new("odd.yaml")).unwrap();
        let host = MemoryHost::from_stack_file(&file).unwrap();
        let roots = host.root_nodes().unwrap();

        assert!(NameMatcher::new("04").matches(&host, &roots[0]));
        assert!(NameMatcher::new("TRUE").matches(&host, &roots[1]));

        // Unreadable names fall back to the empty placeholder
        assert_eq!(best_effort_name(&host, &roots[2]), "");
        assert!(!NameMatcher::new("a").matches(&host, &roots[2]));
    }
}
