//! Configuration file parsing.
//!
//! Parses individual `.stackfind.toml` files into intermediate `RawConfig` structures that
//! preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{ConfigError, CursorRestore, ResultView};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Default stack file section.
    pub stack: Option<RawStackSettings>,
    /// Search section.
    pub search: Option<RawSearchSettings>,
    /// Navigation section.
    pub navigation: Option<RawNavigationSettings>,
    /// Replace section.
    pub replace: Option<RawReplaceSettings>,
    /// Logging section.
    pub log: Option<RawLogSettings>,
}

/// Raw `[stack]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawStackSettings {
    /// Stack file path, relative to the config file's directory.
    pub file: Option<String>,
}

/// Raw `[search]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSearchSettings {
    /// Strip surrounding whitespace from input.
    pub trim_input: Option<bool>,
    /// Starting result view.
    pub view: Option<ResultView>,
}

/// Raw `[navigation]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawNavigationSettings {
    /// Cursor restoration policy.
    pub cursor_restore: Option<CursorRestore>,
}

/// Raw `[replace]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawReplaceSettings {
    /// Case-sensitive find when renaming.
    pub case_sensitive: Option<bool>,
}

/// Raw `[log]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawLogSettings {
    /// Default log filter directive.
    pub level: Option<String>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}
