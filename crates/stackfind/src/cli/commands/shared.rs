//! Shared helpers for command implementations.

use std::process::ExitCode;

use stackfind_config::ResultView;
use stackfind_search::{SearchSession, Skip, Status};
use stackfind_stack::MemoryHost;

/// Prints a skipped operation as an error.
pub fn skip_failure(skip: &Skip) -> ExitCode {
    eprintln!("error: {skip}");
    ExitCode::FAILURE
}

/// Attaches a session to `host` and searches for `needle`, optionally in a narrower view.
pub fn start_search(
    session: &mut SearchSession<MemoryHost>,
    host: &mut MemoryHost,
    needle: &str,
    view: Option<ResultView>,
) -> Result<Status, ExitCode> {
    session.attach(host);
    let mut status = session
        .set_search_text(host, needle)
        .map_err(|skip| skip_failure(&skip))?;
    if let Some(view) = view
        && view != session.view()
    {
        status = session
            .set_view(host, view)
            .map_err(|skip| skip_failure(&skip))?;
    }
    Ok(status)
}
