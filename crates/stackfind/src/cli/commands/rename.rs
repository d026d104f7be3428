//! Implementation of `stackfind rename`.

use std::process::ExitCode;

use stackfind_search::SearchSession;
use stackfind_stack::{MemoryHost, NodeHandle};

use super::shared::{skip_failure, start_search};
use crate::cli::{
    args::RenameCommand,
    context::CommandContext,
    output::{dim, success},
};

/// A name before and after renaming.
type Change = (String, String);

/// Renames matches and writes the stack file back.
pub fn run(ctx: &CommandContext, cmd: &RenameCommand) -> ExitCode {
    let path = match ctx.stack_path(Some(&cmd.doc)) {
        Ok(path) => path,
        Err(code) => return code,
    };
    let mut host = match ctx.open_host(&path, &cmd.document) {
        Ok(host) => host,
        Err(code) => return code,
    };

    let mut session = SearchSession::from_config(&ctx.config);
    let status = match start_search(&mut session, &mut host, &cmd.find, cmd.view) {
        Ok(status) => status,
        Err(code) => return code,
    };
    if status.total == 0 {
        eprintln!("error: nothing matches '{}'", session.search_text());
        return ExitCode::FAILURE;
    }

    let changes = if cmd.all {
        rename_all(&mut session, &mut host, &cmd.replace)
    } else {
        rename_one(&mut session, &mut host, cmd.index, &cmd.replace)
    };
    let changes = match changes {
        Ok(changes) => changes,
        Err(code) => return code,
    };

    for (old, new) in &changes {
        println!("{old} -> {new}");
    }
    if changes.is_empty() {
        println!("{}", dim("No names changed."));
        return ExitCode::SUCCESS;
    }
    if cmd.dry_run {
        println!("{}", dim(&format!("dry run: {} not written", path.display())));
        return ExitCode::SUCCESS;
    }

    if let Err(e) = host.save(&path) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    let noun = if changes.len() == 1 { "name" } else { "names" };
    println!(
        "{}",
        success(&format!("Renamed {} {noun} in {}", changes.len(), path.display()))
    );
    ExitCode::SUCCESS
}

/// Renames every match in the active view.
fn rename_all(
    session: &mut SearchSession<MemoryHost>,
    host: &mut MemoryHost,
    replacement: &str,
) -> Result<Vec<Change>, ExitCode> {
    let before: Vec<(NodeHandle, String)> = session
        .results()
        .view(session.view())
        .iter()
        .map(|hit| (hit.node, host.label(hit.node)))
        .collect();

    session
        .rename_all(host, replacement)
        .map_err(|skip| skip_failure(&skip))?;

    Ok(before
        .into_iter()
        .filter_map(|(node, old)| {
            let new = host.label(node);
            (new != old).then_some((old, new))
        })
        .collect())
}

/// Renames the match at `index` (1-based), or the first one.
fn rename_one(
    session: &mut SearchSession<MemoryHost>,
    host: &mut MemoryHost,
    index: Option<usize>,
    replacement: &str,
) -> Result<Vec<Change>, ExitCode> {
    if let Some(index) = index {
        let total = session.status().total;
        if index == 0 || index > total {
            eprintln!("error: --index {index} is out of range (1..={total})");
            return Err(ExitCode::FAILURE);
        }
        for _ in 1..index {
            session
                .step_next(host)
                .map_err(|skip| skip_failure(&skip))?;
        }
    }

    let renamed = session
        .rename_current(host, replacement)
        .map_err(|skip| skip_failure(&skip))?;
    Ok(vec![(renamed.old_name, renamed.new_name)])
}
