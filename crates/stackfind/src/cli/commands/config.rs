//! Implementation of `stackfind config`.

use std::process::ExitCode;

use stackfind_highlight::Highlighter;

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows config files, effective settings, and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    if config.sources.is_empty() {
        println!("{}", dim("# no configuration files found; showing defaults"));
    }
    for source in &config.sources {
        println!("{}", dim(&format!("# {source}")));
    }
    if let Some(stack_file) = &config.stack_file {
        println!("{}", dim(&format!("# stack file: {}", stack_file.display())));
    }

    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let highlighter = Highlighter::new();
    print!("{}", highlighter.highlight_toml(&toml));

    let warnings = config.validate();
    if warnings.is_empty() {
        return ExitCode::SUCCESS;
    }
    eprintln!();
    eprintln!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        eprintln!("   {}", warning(&w.to_string()));
    }
    ExitCode::FAILURE
}
