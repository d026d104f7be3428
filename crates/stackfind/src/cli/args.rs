//! Clap argument definitions for the `stackfind` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use stackfind_config::ResultView;

/// Parse a result view from a string.
fn parse_view(s: &str) -> Result<ResultView, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "stackfind")]
#[command(about = "Find, step through, and rename layers and effects in layer stacks")]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); STACKFIND_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Which document of a stack file to open.
#[derive(Args, Debug, Clone, Default)]
pub struct DocumentArgs {
    /// Open the document at this index instead of the file's active one
    #[arg(short = 'd', long = "document")]
    pub document: Option<usize>,
}

/// Arguments for `stackfind find`.
#[derive(Args, Debug, Clone)]
pub struct FindCommand {
    /// Stack file to search
    pub doc: PathBuf,

    /// Text to look for in layer and effect names
    pub needle: String,

    #[command(flatten)]
    /// Document selection.
    pub document: DocumentArgs,

    /// Only list one category: combined, layers, content-effects, mask-effects [default: from config]
    #[arg(long, value_parser = parse_view)]
    pub view: Option<ResultView>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `stackfind rename`.
#[derive(Args, Debug, Clone)]
pub struct RenameCommand {
    /// Stack file to edit
    pub doc: PathBuf,

    /// Text to replace
    pub find: String,

    /// Replacement text
    pub replace: String,

    /// Rename every match in the view instead of one
    #[arg(long, conflicts_with = "index")]
    pub all: bool,

    /// Rename the Nth match (1-based) instead of the first
    #[arg(short = 'i', long)]
    pub index: Option<usize>,

    #[command(flatten)]
    /// Document selection.
    pub document: DocumentArgs,

    /// Restrict matches to one category [default: from config]
    #[arg(long, value_parser = parse_view)]
    pub view: Option<ResultView>,

    /// Show what would change without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `stackfind session`.
#[derive(Args, Debug, Clone)]
pub struct SessionCommand {
    /// Stack file to drive [default: stack.file from config]
    pub doc: Option<PathBuf>,

    #[command(flatten)]
    /// Document selection.
    pub document: DocumentArgs,

    /// Write the edited stack back when the script ends
    #[arg(long)]
    pub save: bool,
}

/// Arguments for `stackfind inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectCommand {
    /// Stack file to show [default: stack.file from config]
    pub doc: Option<PathBuf>,

    #[command(flatten)]
    /// Document selection.
    pub document: DocumentArgs,

    /// Print the file as highlighted YAML instead of a tree
    #[arg(long)]
    pub yaml: bool,
}

/// Arguments for `stackfind init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.stackfind.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `stackfind` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// List the layers and effects whose names contain a text
    Find(FindCommand),

    /// Replace text inside matching layer and effect names
    Rename(RenameCommand),

    /// Run a search session scripted from stdin
    #[command(after_help = "\
SCRIPT COMMANDS (one per line, # starts a comment):
  find TEXT             Search; selects the first match
  next | prev           Step through matches, wrapping at the ends
  replace TEXT          Rename the current match
  replace-all TEXT      Rename every match in the view
  view VIEW             combined, layers, content-effects, mask-effects
  open N                Switch the host to document N
  close                 Close the host's document
  set-name OLD -> NEW   Rename a node behind the session's back
  status                Print the status line

EXAMPLES:
  printf 'find base\\nnext\\nreplace Rock\\n' | stackfind session rock.yaml
  stackfind session rock.yaml --save < rename.txt")]
    Session(SessionCommand),

    /// Show the layer tree of a stack file
    Inspect(InspectCommand),

    /// Initialize stackfind configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

impl Commands {
    /// Returns false for commands that must work even when the config is broken.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Init(_))
    }
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_find() {
        let cli = Cli::try_parse_from(["stackfind", "find", "rock.yaml", "base", "--view", "layers"])
            .unwrap();
        let Commands::Find(cmd) = cli.command else {
            panic!("expected find");
        };
        assert_eq!(cmd.needle, "base");
        assert_eq!(cmd.view, Some(ResultView::Layers));
        assert!(!cmd.json);
    }

    #[test]
    fn rejects_unknown_view() {
        assert!(
            Cli::try_parse_from(["stackfind", "find", "rock.yaml", "base", "--view", "all"])
                .is_err()
        );
    }

    #[test]
    fn rename_all_conflicts_with_index() {
        let result = Cli::try_parse_from([
            "stackfind", "rename", "rock.yaml", "a", "b", "--all", "--index", "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["stackfind", "config", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn init_skips_config() {
        let cli = Cli::try_parse_from(["stackfind", "init"]).unwrap();
        assert!(!cli.command.needs_config());
        let cli = Cli::try_parse_from(["stackfind", "session"]).unwrap();
        assert!(cli.command.needs_config());
    }
}
