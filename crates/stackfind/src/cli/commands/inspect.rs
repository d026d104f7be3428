//! Implementation of `stackfind inspect`.

use std::{fs, process::ExitCode};

use stackfind_highlight::Highlighter;
use stackfind_stack::{ActiveDocument, DocumentKey};

use crate::cli::{
    args::InspectCommand,
    context::CommandContext,
    output::{dim, header, outline_line, subheader},
};

/// Prints the documents of a stack file and the open document's tree.
pub fn run(ctx: &CommandContext, cmd: &InspectCommand) -> ExitCode {
    let path = match ctx.stack_path(cmd.doc.as_deref()) {
        Ok(path) => path,
        Err(code) => return code,
    };

    if cmd.yaml {
        return match fs::read_to_string(&path) {
            Ok(contents) => {
                print!("{}", Highlighter::new().highlight_yaml(&contents));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to read {}: {e}", path.display());
                ExitCode::FAILURE
            }
        };
    }

    let host = match ctx.open_host(&path, &cmd.document) {
        Ok(host) => host,
        Err(code) => return code,
    };

    println!("{}", header("Documents"));
    let active = host.active_document();
    for (i, doc) in host.to_stack_file().documents.into_iter().enumerate() {
        let key = DocumentKey::new(doc.material, doc.stack);
        let marker = if active == Some(i) { "*" } else { " " };
        println!(" {marker} {i}: {key}");
    }
    println!();

    let Some(key) = host.active_document_key() else {
        println!("{}", dim("No document is open."));
        return ExitCode::SUCCESS;
    };
    println!("{}", subheader(&format!("{key}:")));
    let outline = host.outline();
    if outline.is_empty() {
        println!("  {}", dim("(no layers)"));
    }
    for entry in &outline {
        println!("{}", outline_line(entry));
    }
    ExitCode::SUCCESS
}
