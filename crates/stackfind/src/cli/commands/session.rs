//! Implementation of `stackfind session`.
//!
//! Each script line is echoed, executed, and followed by the selection calls the host received
//! and the status line. Host edits (`open`, `close`, `set-name`) bypass the session; it only
//! learns about them from change notifications, pumped after every line.

use std::{
    io::{self, BufRead},
    process::ExitCode,
};

use stackfind_search::{Reaction, SearchSession, Skip};
use stackfind_stack::{MemoryHost, NameEditor};

use crate::cli::{
    args::SessionCommand,
    context::CommandContext,
    output::{dim, emphasize_match, paint_category, selection_line, status_line, warning},
    script::{ScriptCommand, parse_line},
};

/// Runs a search session driven by a script on stdin.
pub fn run(ctx: &CommandContext, cmd: &SessionCommand) -> ExitCode {
    let path = match ctx.stack_path(cmd.doc.as_deref()) {
        Ok(path) => path,
        Err(code) => return code,
    };
    let mut host = match ctx.open_host(&path, &cmd.document) {
        Ok(host) => host,
        Err(code) => return code,
    };

    let mut session = SearchSession::from_config(&ctx.config);
    session.attach(&mut host);

    let mut bad_lines = 0;
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: failed to read script: {e}");
                return ExitCode::FAILURE;
            }
        };
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                println!("> {}", line.trim_end());
                run_line(&mut session, &mut host, command);
            }
            Err(msg) => {
                println!("> {}", line.trim_end());
                println!("  {}", warning(&format!("error: {msg}")));
                bad_lines += 1;
            }
        }
    }
    session.detach(&mut host);

    if cmd.save
        && let Err(e) = host.save(&path)
    {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    if bad_lines > 0 {
        eprintln!("error: {bad_lines} script line(s) could not be parsed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Executes one command and reports what the host saw.
fn run_line(
    session: &mut SearchSession<MemoryHost>,
    host: &mut MemoryHost,
    command: ScriptCommand,
) {
    let show_counts = command == ScriptCommand::Status;
    for note in execute(session, host, command) {
        println!("  {note}");
    }

    match session.pump(host) {
        Some(Reaction::Reset { to, .. }) => {
            let to = to.map_or_else(|| "(unnamed)".to_string(), |key| key.to_string());
            println!("  {}", dim(&format!("document: {to}")));
        }
        Some(Reaction::NoDocument) => println!("  {}", dim("document: (none)")),
        Some(Reaction::Refresh) | None => {}
    }

    for call in host.selection_log() {
        println!("  {}", selection_line(host, call));
    }
    host.clear_selection_log();

    if let Some(hit) = session.current() {
        let name = emphasize_match(&host.label(hit.node), session.search_text());
        match session.current_category() {
            Some(category) => println!(
                "  current: {name} ({})",
                paint_category(&category.to_string(), category)
            ),
            None => println!("  current: {name}"),
        }
    }

    let status = session.status();
    if show_counts {
        println!("  {}", status_line(&status));
    } else {
        println!("  {status}");
    }
}

/// Runs the command, returning notes to print.
fn execute(
    session: &mut SearchSession<MemoryHost>,
    host: &mut MemoryHost,
    command: ScriptCommand,
) -> Vec<String> {
    let outcome: Result<Option<String>, Skip> = match command {
        ScriptCommand::Find(text) => session.set_search_text(host, &text).map(|_| None),
        ScriptCommand::Next => session.step_next(host).map(|_| None),
        ScriptCommand::Prev => session.step_prev(host).map(|_| None),
        ScriptCommand::View(view) => session.set_view(host, view).map(|_| None),
        ScriptCommand::Replace(text) => session
            .rename_current(host, &text)
            .map(|r| Some(format!("renamed: {} -> {}", r.old_name, r.new_name))),
        ScriptCommand::ReplaceAll(text) => session
            .rename_all(host, &text)
            .map(|count| Some(format!("renamed {count}"))),
        ScriptCommand::Open(index) => {
            return host
                .open_document(index)
                .err()
                .map(|e| warning(&format!("error: {e}")))
                .into_iter()
                .collect();
        }
        ScriptCommand::Close => {
            host.close_document();
            Ok(None)
        }
        ScriptCommand::SetName { old, new } => return set_name(host, &old, &new),
        ScriptCommand::Status => Ok(None),
    };

    match outcome {
        Ok(note) => note.into_iter().collect(),
        Err(skip) => vec![dim(&format!("skip: {skip}"))],
    }
}

/// Renames a node directly in the host, as an external editor would.
fn set_name(host: &mut MemoryHost, old: &str, new: &str) -> Vec<String> {
    let Some(node) = host.find_node(old) else {
        return vec![warning(&format!("error: no node named '{old}'"))];
    };
    match host.set_node_name(&node, new) {
        Ok(()) => Vec::new(),
        Err(e) => vec![warning(&format!("error: {e}"))],
    }
}
