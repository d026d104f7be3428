//! Terminal styling for stackfind.
//!
//! Headers and status colours, per-category colours for matches, emphasis for the matched
//! part of a name, and syntax highlighting for the TOML and YAML files stackfind reads.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML and YAML.
    syntax_set: SyntaxSet,
    /// Colour themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML, such as the effective configuration.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights YAML, such as a stack file.
    pub fn highlight_yaml(&self, content: &str) -> String {
        self.highlight(content, "yaml")
    }

    /// Highlights content with the named syntax, falling back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI escape codes.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Underlined text.
    pub const UNDERLINE: &str = "\x1b[4m";
    /// Cyan text (headers, layers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (success).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Magenta text (content effects).
    pub const MAGENTA: &str = "\x1b[35m";
    /// Blue text (mask effects).
    pub const BLUE: &str = "\x1b[34m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps `text` in `code` and a reset.
fn paint(code: &str, text: &str) -> String {
    format!("{code}{text}{}", colors::RESET)
}

/// Formats a header (bold cyan).
pub fn header(text: &str) -> String {
    paint(&format!("{}{}", colors::BOLD, colors::CYAN), text)
}

/// Formats a subheader (bold).
pub fn subheader(text: &str) -> String {
    paint(colors::BOLD, text)
}

/// Formats less important text.
pub fn dim(text: &str) -> String {
    paint(colors::DIM, text)
}

/// Formats a success message (green).
pub fn success(text: &str) -> String {
    paint(colors::GREEN, text)
}

/// Formats a warning (yellow).
pub fn warning(text: &str) -> String {
    paint(colors::YELLOW, text)
}

/// Colours a layer or group name.
pub fn layer(text: &str) -> String {
    paint(colors::CYAN, text)
}

/// Colours a content effect name.
pub fn content_effect(text: &str) -> String {
    paint(colors::MAGENTA, text)
}

/// Colours a mask effect name.
pub fn mask_effect(text: &str) -> String {
    paint(colors::BLUE, text)
}

/// Underlines every case-insensitive occurrence of `needle` in `name`.
///
/// Returns `name` unchanged when the needle is blank or absent.
pub fn emphasize_match(name: &str, needle: &str) -> String {
    let spans = match_spans(name, needle);
    if spans.is_empty() {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + spans.len() * 12);
    let mut last = 0;
    for (start, end) in spans {
        out.push_str(&name[last..start]);
        out.push_str(colors::BOLD);
        out.push_str(colors::UNDERLINE);
        out.push_str(&name[start..end]);
        out.push_str(colors::RESET);
        last = end;
    }
    out.push_str(&name[last..]);
    out
}

/// Byte ranges of non-overlapping case-insensitive occurrences of `needle` in `name`.
pub fn match_spans(name: &str, needle: &str) -> Vec<(usize, usize)> {
    let folded: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if folded.is_empty() || needle.trim().is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut resume = 0;
    for (start, _) in name.char_indices() {
        if start < resume {
            continue;
        }
        if let Some(end) = occurrence_end(&name[start..], &folded) {
            spans.push((start, start + end));
            resume = start + end;
        }
    }
    spans
}

/// Byte length of the prefix of `text` that folds to exactly `folded`.
fn occurrence_end(text: &str, folded: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, c) in text.char_indices() {
        for lower in c.to_lowercase() {
            if folded.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == folded.len() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighter_toml() {
        let hl = Highlighter::new();
        let output = hl.highlight_toml("[search]\nview = \"layers\"\n");
        assert!(output.contains("\x1b["));
        assert!(output.ends_with(colors::RESET));
    }

    #[test]
    fn test_highlighter_yaml() {
        let hl = Highlighter::new();
        let output = hl.highlight_yaml("documents:\n  - material: Rock\n");
        assert!(output.contains("\x1b["));
        assert!(output.contains("Rock"));
    }

    #[test]
    fn test_syntaxes_available() {
        let ss = extra_syntaxes();
        assert!(ss.find_syntax_by_extension("toml").is_some());
        assert!(ss.find_syntax_by_extension("yaml").is_some());
    }

    #[test]
    fn test_header_formatting() {
        let h = header("Matches");
        assert!(h.contains(colors::BOLD));
        assert!(h.contains(colors::CYAN));
        assert!(h.ends_with(colors::RESET));
        assert!(h.contains("Matches"));
    }

    #[test]
    fn test_category_colours_differ() {
        assert_ne!(layer("x"), content_effect("x"));
        assert_ne!(content_effect("x"), mask_effect("x"));
    }

    #[test]
    fn test_match_spans() {
        assert_eq!(match_spans("Base Detail base", "BASE"), [(0, 4), (12, 16)]);
        assert_eq!(match_spans("aaaa", "aa"), [(0, 2), (2, 4)]);
        assert!(match_spans("Grime", "base").is_empty());
        assert!(match_spans("Grime", "  ").is_empty());
    }

    #[test]
    fn test_match_spans_unicode() {
        assert_eq!(match_spans("Gros Éclat", "éclat"), [(5, 11)]);
    }

    #[test]
    fn test_emphasize_match() {
        let out = emphasize_match("Base Glow", "glow");
        assert!(out.starts_with("Base "));
        assert!(out.contains(&format!("{}{}Glow{}", colors::BOLD, colors::UNDERLINE, colors::RESET)));
        assert_eq!(emphasize_match("Grime", "glow"), "Grime");
    }
}
