//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use stackfind_config::ResultView;
use stackfind_highlight::{content_effect, layer, mask_effect};
pub use stackfind_highlight::{dim, emphasize_match, header, subheader, success, warning};
use stackfind_search::{MatchCategory, SearchSession, Status};
use stackfind_stack::{DocumentKey, MemoryHost, NodeHandle, NodeKind, OutlineEntry};

/// One match as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRow {
    /// 1-based position in the view.
    pub position: usize,
    /// The node's name.
    pub name: String,
    /// Which list the match belongs to.
    pub category: MatchCategory,
    /// Owning layer, for effects.
    pub owner: Option<String>,
    /// Whether this is the current match.
    pub current: bool,
}

/// JSON output for `stackfind find`.
#[derive(Serialize)]
pub struct FindOutput<'a> {
    /// The searched document.
    pub document: Option<&'a DocumentKey>,
    /// The find text as searched.
    pub needle: &'a str,
    /// The listed view.
    pub view: ResultView,
    /// Cursor and list sizes.
    pub status: Status,
    /// Matches in view order.
    pub matches: Vec<MatchRow>,
}

/// Builds display rows for the session's active view.
pub fn match_rows(session: &SearchSession<MemoryHost>, host: &MemoryHost) -> Vec<MatchRow> {
    let results = session.results();
    let current = session.current().map(|hit| hit.id);
    results
        .view(session.view())
        .iter()
        .enumerate()
        .map(|(i, hit)| MatchRow {
            position: i + 1,
            name: host.label(hit.node),
            category: results.category(&hit.id).unwrap_or(MatchCategory::Layer),
            owner: results.parent(&hit.id).map(|p| host.label(*p)),
            current: current == Some(hit.id),
        })
        .collect()
}

/// Prints matches as a table.
pub fn print_match_table(rows: &[MatchRow]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["", "#", "Name", "Category", "Owner"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(if row.current { "▶" } else { "" }),
            Cell::new(row.position),
            Cell::new(&row.name),
            Cell::new(row.category),
            Cell::new(row.owner.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
}

/// Formats the status line with per-category counts.
pub fn status_line(status: &Status) -> String {
    format!(
        "{status}  {}",
        dim(&format!(
            "(layers: {}, content effects: {}, mask effects: {})",
            status.layers, status.content_effects, status.mask_effects
        ))
    )
}

/// Colours a name by match category.
pub fn paint_category(name: &str, category: MatchCategory) -> String {
    match category {
        MatchCategory::Layer => layer(name),
        MatchCategory::ContentEffect => content_effect(name),
        MatchCategory::MaskEffect => mask_effect(name),
    }
}

/// Formats one host selection call.
pub fn selection_line(host: &MemoryHost, nodes: &[NodeHandle]) -> String {
    let labels: Vec<String> = nodes.iter().map(|n| host.label(*n)).collect();
    format!("select: {}", labels.join(", "))
}

/// Formats one outline entry, indented by depth.
pub fn outline_line(entry: &OutlineEntry) -> String {
    let indent = "  ".repeat(entry.depth + 1);
    let name = entry.name.as_deref().unwrap_or("<unnamed>");
    let (painted, tag) = match entry.kind {
        Some(NodeKind::Layer) => (layer(name), ""),
        Some(NodeKind::Group) => (layer(name), " (group)"),
        Some(NodeKind::ContentEffect) => (content_effect(name), " (effect)"),
        Some(NodeKind::MaskEffect) => (mask_effect(name), " (mask)"),
        None => (warning(name), " (unknown kind)"),
    };
    format!("{indent}{painted}{}", dim(tag))
}

/// Serializes `value` as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}
