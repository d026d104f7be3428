//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use stackfind_config::Config;
use stackfind_stack::MemoryHost;
use tracing::debug;

use super::args::DocumentArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Resolves the stack file to use: the explicit one, else the configured default.
    pub fn stack_path(&self, explicit: Option<&Path>) -> Result<PathBuf, ExitCode> {
        if let Some(path) = explicit {
            return Ok(self.cwd.join(path));
        }
        self.config.stack_file.clone().ok_or_else(|| {
            eprintln!("error: no stack file given and none configured");
            eprintln!("Pass a file, or set [stack] file in .stackfind.toml.");
            ExitCode::FAILURE
        })
    }

    /// Loads a stack file into a host, opening the requested document.
    pub fn open_host(&self, path: &Path, document: &DocumentArgs) -> Result<MemoryHost, ExitCode> {
        let mut host = MemoryHost::load(path).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;

        if let Some(index) = document.document {
            host.open_document(index).map_err(|e| {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            })?;
        }
        debug!(path = %path.display(), documents = host.document_count(), "loaded stack");
        Ok(host)
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
