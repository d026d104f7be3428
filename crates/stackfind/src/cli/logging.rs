//! Log output for the binary.
//!
//! Filter precedence: `STACKFIND_LOG`, then `-v` flags, then `[log] level` from config.

use std::{env, io};

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "STACKFIND_LOG";

/// Installs the global subscriber, writing to stderr.
pub fn init(verbose: u8, configured: &str) {
    let env_value = env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), verbose, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("warning: invalid log filter '{directive}': {e}");
        EnvFilter::new("warn")
    });

    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init()
    {
        eprintln!("warning: could not install logger: {e}");
    }
}

/// Picks the filter directive to use.
fn filter_directive(env_value: Option<&str>, verbose: u8, configured: &str) -> String {
    if let Some(value) = env_value
        && !value.trim().is_empty()
    {
        return value.to_string();
    }

    match verbose {
        0 if configured.trim().is_empty() => "warn".to_string(),
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
