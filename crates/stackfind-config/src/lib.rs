//! Configuration system for stackfind.
//!
//! stackfind uses TOML configuration files named `.stackfind.toml`. Configuration is resolved
//! by walking up the directory tree from the current working directory, collecting any
//! `.stackfind.toml` files found, then loading `~/.stackfind.toml` as the global config with
//! lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use discovery::{
    CONFIG_FILENAME, ConfigScope, ConfigSource, ParsedConfig, discover_configs,
    global_config_path, is_global_config,
};
pub use error::ConfigError;
pub use merge::merge_configs;
pub use parse::{
    RawConfig, RawLogSettings, RawNavigationSettings, RawReplaceSettings, RawSearchSettings,
    RawStackSettings, parse_config_file, parse_config_str,
};
pub use resolve::resolve_stack_path;
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for stackfind.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.stackfind.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Search settings.
    pub search: SearchSettings,
    /// Navigation settings.
    pub navigation: NavigationSettings,
    /// Replace settings.
    pub replace: ReplaceSettings,
    /// Logging settings.
    pub log: LogSettings,
    /// Resolved default stack file, if one is configured.
    pub stack_file: Option<PathBuf>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
    /// Files that contributed, highest precedence first.
    pub sources: Vec<ConfigSource>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.stackfind.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        merge_configs(&discover_configs(cwd)?)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first. The global file
    /// is recognised by its path; every other file counts as a project file.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                let scope = if is_global_config(path) {
                    ConfigScope::Global
                } else {
                    ConfigScope::Project
                };
                ParsedConfig::read(path.clone(), scope)
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The stack file is omitted since it is an absolute, resolved path.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            search: self.search.clone(),
            navigation: self.navigation.clone(),
            replace: self.replace.clone(),
            log: self.log.clone(),
        };
        toml::to_string_pretty(&serializable).map_err(ConfigError::Serialize)
    }
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Strip surrounding whitespace from find and replace input.
    pub trim_input: bool,
    /// Result view navigation starts in.
    pub view: ResultView,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            trim_input: true,
            view: ResultView::Combined,
        }
    }
}

/// Navigation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Cursor restoration policy for refreshes that keep match counts.
    pub cursor_restore: CursorRestore,
}

/// Replace settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplaceSettings {
    /// Match the find text case-sensitively when renaming.
    pub case_sensitive: bool,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default log filter directive.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: String::from("warn"),
        }
    }
}

/// Which match sequence navigation walks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultView {
    /// All matches in stack order.
    #[default]
    Combined,
    /// Layer and group matches only.
    Layers,
    /// Content effect matches only.
    ContentEffects,
    /// Mask effect matches only.
    MaskEffects,
}

impl ResultView {
    /// All views, in display order.
    pub const ALL: [Self; 4] = [
        Self::Combined,
        Self::Layers,
        Self::ContentEffects,
        Self::MaskEffects,
    ];

    /// The configuration name of this view.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Layers => "layers",
            Self::ContentEffects => "content-effects",
            Self::MaskEffects => "mask-effects",
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown view '{s}' (expected one of: combined, layers, content-effects, mask-effects)"
                )
            })
    }
}

/// How the cursor survives a refresh whose match counts did not change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorRestore {
    /// Keep the numeric index, clamped to the new length.
    #[default]
    Position,
    /// Follow the node that was current; fall back to the position when it is gone.
    Identity,
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Search settings.
    search: SearchSettings,
    /// Navigation settings.
    navigation: NavigationSettings,
    /// Replace settings.
    replace: ReplaceSettings,
    /// Logging settings.
    log: LogSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_settings_defaults() {
        let search = SearchSettings::default();
        assert!(search.trim_input);
        assert_eq!(search.view, ResultView::Combined);
    }

    #[test]
    fn test_other_defaults() {
        assert_eq!(
            NavigationSettings::default().cursor_restore,
            CursorRestore::Position
        );
        assert!(!ReplaceSettings::default().case_sensitive);
        assert_eq!(LogSettings::default().level, "warn");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.stack_file.is_none());
        assert!(config.config_root.is_none());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_view_from_str() {
        assert_eq!("layers".parse::<ResultView>(), Ok(ResultView::Layers));
        assert_eq!(
            " Mask-Effects ".parse::<ResultView>(),
            Ok(ResultView::MaskEffects)
        );
        assert!("everything".parse::<ResultView>().is_err());
    }

    #[test]
    fn test_view_display_round_trips() {
        for view in ResultView::ALL {
            assert_eq!(view.to_string().parse::<ResultView>(), Ok(view));
        }
    }

    #[test]
    fn test_settings_to_toml() {
        let config = Config::default();
        let toml = config.settings_to_toml().unwrap();

        assert!(toml.contains("[search]"));
        assert!(toml.contains("[navigation]"));
        assert!(toml.contains("[replace]"));
        assert!(toml.contains("[log]"));

        assert!(toml.contains("trim_input = true"));
        assert!(toml.contains("view = \"combined\""));
        assert!(toml.contains("cursor_restore = \"position\""));
        assert!(toml.contains("level = \"warn\""));

        let parsed: toml::Value =
            toml::from_str(&toml).expect("settings_to_toml should produce valid TOML");
        assert!(parsed.get("search").is_some());
        assert!(parsed.get("navigation").is_some());
    }
}
