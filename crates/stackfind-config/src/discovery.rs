//! Locating the `.stackfind.toml` files in effect for a directory.
//!
//! Project files are read from the working directory upward and parsed as they are found, so
//! the `root = true` marker that ends the walk comes from the same parse the merge uses. The
//! file in the home directory is always the global one, even when the walk passes through it.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::{
    ConfigError,
    parse::{RawConfig, parse_config_file},
};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".stackfind.toml";

/// Where a config file sits in the precedence chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// A file in the working directory or one of its ancestors.
    Project,
    /// `~/.stackfind.toml`, lowest precedence.
    Global,
}

/// A config file that contributed to the effective settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// Path to the file.
    pub path: PathBuf,
    /// Project or global.
    pub scope: ConfigScope,
    /// Set when the file ended discovery with `root = true`.
    pub is_root: bool,
}

impl ConfigSource {
    /// Directory that relative paths in this file are resolved against.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        match (self.scope, self.is_root) {
            (ConfigScope::Global, _) => f.write_str(" (global)"),
            (ConfigScope::Project, true) => f.write_str(" (root)"),
            (ConfigScope::Project, false) => Ok(()),
        }
    }
}

/// A parsed config file and where it came from.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// The file.
    pub source: ConfigSource,
    /// Its settings.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Reads and parses the file at `path`.
    ///
    /// A root marker only counts in project files; the global file is last in any case.
    pub fn read(path: PathBuf, scope: ConfigScope) -> Result<Self, ConfigError> {
        let config = parse_config_file(&path)?;
        let is_root = scope == ConfigScope::Project && config.root == Some(true);
        Ok(Self {
            source: ConfigSource {
                path,
                scope,
                is_root,
            },
            config,
        })
    }
}

/// Finds and parses every config file in effect for `cwd`, highest precedence first.
pub fn discover_configs(cwd: &Path) -> Result<Vec<ParsedConfig>, ConfigError> {
    let global = global_config_path();
    let mut found = Vec::new();

    for dir in cwd.ancestors() {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() || global.as_ref() == Some(&path) {
            continue;
        }
        let parsed = ParsedConfig::read(path, ConfigScope::Project)?;
        let stop = parsed.source.is_root;
        found.push(parsed);
        if stop {
            return Ok(found);
        }
    }

    if let Some(path) = global.filter(|p| p.is_file()) {
        found.push(ParsedConfig::read(path, ConfigScope::Global)?);
    }
    Ok(found)
}

/// Returns the path to the global configuration file (`~/.stackfind.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::TestDir;

    /// Paths of the project files, leaving out the machine's own global config.
    fn project_paths(configs: &[ParsedConfig]) -> Vec<&Path> {
        configs
            .iter()
            .filter(|c| c.source.scope == ConfigScope::Project)
            .map(|c| c.source.path.as_path())
            .collect()
    }

    #[test]
    fn test_discover_nothing() {
        let test_dir = TestDir::new();
        let subdir = test_dir.create_dir("scenes/rock/wip");

        let configs = discover_configs(&subdir).unwrap();
        assert!(project_paths(&configs).is_empty());
    }

    #[test]
    fn test_closest_file_comes_first() {
        let test_dir = TestDir::new();
        let top = test_dir.create_config_at_root();
        let scenes = test_dir.create_config("scenes");
        let rock = test_dir.create_config("scenes/rock");
        let cwd = test_dir.create_dir("scenes/rock/textures");

        let configs = discover_configs(&cwd).unwrap();
        assert_eq!(
            project_paths(&configs),
            [rock.as_path(), scenes.as_path(), top.as_path()]
        );
        assert!(configs.iter().all(|c| !c.source.is_root));
    }

    #[test]
    fn test_directory_named_like_config_is_ignored() {
        let test_dir = TestDir::new();
        fs::create_dir_all(test_dir.path().join(CONFIG_FILENAME)).unwrap();
        let subdir = test_dir.create_dir("scenes");

        let configs = discover_configs(&subdir).unwrap();
        assert!(project_paths(&configs).is_empty());
    }

    #[test]
    fn test_root_marker_ends_the_chain() {
        let test_dir = TestDir::new();
        test_dir.create_config_at_root();
        let root = test_dir.create_root_config("scenes");
        let cwd = test_dir.create_dir("scenes/rock");

        let configs = discover_configs(&cwd).unwrap();

        // Neither the parent nor the global config is included
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].source.path, root);
        assert!(configs[0].source.is_root);
        assert_eq!(
            configs[0].source.to_string(),
            format!("{} (root)", root.display())
        );
    }

    #[test]
    fn test_root_false_keeps_walking() {
        let test_dir = TestDir::new();
        let top = test_dir.create_config_at_root();
        let scenes = test_dir.create_config_with_content("scenes", "root = false\n");
        let cwd = test_dir.create_dir("scenes/rock");

        let configs = discover_configs(&cwd).unwrap();
        assert_eq!(project_paths(&configs), [scenes.as_path(), top.as_path()]);
    }

    #[test]
    fn test_unparsable_file_stops_discovery() {
        let test_dir = TestDir::new();
        let bad = test_dir.create_config_with_content("scenes", "[search\n");
        let cwd = test_dir.create_dir("scenes/rock");

        let err = discover_configs(&cwd).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { path, .. } if path == bad));
    }

    #[test]
    fn test_global_source_display_and_dir() {
        let global = global_config_path().unwrap();
        assert!(is_global_config(&global));
        assert!(!is_global_config(Path::new("/scenes/.stackfind.toml")));

        let source = ConfigSource {
            path: global.clone(),
            scope: ConfigScope::Global,
            is_root: false,
        };
        assert!(source.to_string().ends_with(" (global)"));
        assert_eq!(Some(source.dir()), global.parent());
    }
}
