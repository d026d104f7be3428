//! The line-oriented script language of `stackfind session`.

use stackfind_config::ResultView;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Set the find text.
    Find(String),
    /// Step forward.
    Next,
    /// Step backward.
    Prev,
    /// Rename the current match.
    Replace(String),
    /// Rename every match in the view.
    ReplaceAll(String),
    /// Switch the result view.
    View(ResultView),
    /// Make the host open another document.
    Open(usize),
    /// Make the host close its document.
    Close,
    /// Rename a node directly in the host.
    SetName {
        /// Current name of the node.
        old: String,
        /// Name to give it.
        new: String,
    },
    /// Print the status line.
    Status,
}

/// Parses one script line.
///
/// Blank lines and `#` comments yield `Ok(None)`. Text arguments keep their inner and trailing
/// whitespace; only the single space after the keyword is consumed.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let command = match keyword {
        "find" => ScriptCommand::Find(rest.to_string()),
        "next" => ScriptCommand::Next,
        "prev" => ScriptCommand::Prev,
        "replace" => ScriptCommand::Replace(rest.to_string()),
        "replace-all" => ScriptCommand::ReplaceAll(rest.to_string()),
        "view" => ScriptCommand::View(rest.parse()?),
        "open" => ScriptCommand::Open(
            rest.trim()
                .parse()
                .map_err(|_| format!("open expects a document index, got '{}'", rest.trim()))?,
        ),
        "close" => ScriptCommand::Close,
        "set-name" => {
            let (old, new) = rest
                .split_once(" -> ")
                .ok_or_else(|| "set-name expects 'OLD -> NEW'".to_string())?;
            ScriptCommand::SetName {
                old: old.trim().to_string(),
                new: new.trim().to_string(),
            }
        }
        "status" => ScriptCommand::Status,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}
