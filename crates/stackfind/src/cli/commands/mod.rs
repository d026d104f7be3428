//! Command implementations and dispatch.

pub mod config;
pub mod find;
pub mod init;
pub mod inspect;
pub mod rename;
pub mod session;
mod shared;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Find(cmd) => find::run(ctx, &cmd),
        Commands::Rename(cmd) => rename::run(ctx, &cmd),
        Commands::Session(cmd) => session::run(ctx, &cmd),
        Commands::Inspect(cmd) => inspect::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
