//! Implementation of `stackfind find`.

use std::process::ExitCode;

use stackfind_search::SearchSession;

use super::shared::start_search;
use crate::cli::{
    args::FindCommand,
    context::CommandContext,
    output::{FindOutput, dim, match_rows, print_json, print_match_table, status_line},
};

/// Lists the matches for a needle in stack order.
pub fn run(ctx: &CommandContext, cmd: &FindCommand) -> ExitCode {
    let path = match ctx.stack_path(Some(&cmd.doc)) {
        Ok(path) => path,
        Err(code) => return code,
    };
    let mut host = match ctx.open_host(&path, &cmd.document) {
        Ok(host) => host,
        Err(code) => return code,
    };

    let mut session = SearchSession::from_config(&ctx.config);
    let status = match start_search(&mut session, &mut host, &cmd.needle, cmd.view) {
        Ok(status) => status,
        Err(code) => return code,
    };
    let rows = match_rows(&session, &host);

    if cmd.json {
        return print_json(&FindOutput {
            document: session.bound_document(),
            needle: session.search_text(),
            view: session.view(),
            status,
            matches: rows,
        });
    }

    if rows.is_empty() {
        println!("{}", dim("No matches."));
    } else {
        print_match_table(&rows);
    }
    println!("{}", status_line(&status));
    ExitCode::SUCCESS
}
