//! stackfind: live search, navigation, and renaming over layer stacks.
//!
//! The binary loads stack documents from YAML into an in-memory host and drives a search
//! session over them, either one command at a time or from a script on stdin.

mod cli;

use std::process::ExitCode;

use cli::{args::parse_cli, commands, context::CommandContext, logging};

fn main() -> ExitCode {
    let cli = parse_cli();

    let ctx = if cli.command.needs_config() {
        CommandContext::load()
    } else {
        CommandContext::load_cwd_only()
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    logging::init(cli.verbose, &ctx.config.log.level);
    commands::run(cli.command, &ctx)
}
