//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules and resolving the stack file path.

use std::path::PathBuf;

use crate::{
    Config, ConfigError, LogSettings, NavigationSettings, ReplaceSettings, SearchSettings,
    discovery::ParsedConfig, resolve::resolve_stack_path,
};

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config). For every scalar the first defined value wins. The
/// stack file is resolved relative to the directory of the config that defines it.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let mut search = SearchSettings::default();
    let mut navigation = NavigationSettings::default();
    let mut replace = ReplaceSettings::default();
    let mut log = LogSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(ref s) = raw.search {
            if let Some(v) = s.trim_input {
                search.trim_input = v;
            }
            if let Some(v) = s.view {
                search.view = v;
            }
        }
        if let Some(v) = raw.navigation.as_ref().and_then(|n| n.cursor_restore) {
            navigation.cursor_restore = v;
        }
        if let Some(v) = raw.replace.as_ref().and_then(|r| r.case_sensitive) {
            replace.case_sensitive = v;
        }
        if let Some(ref v) = raw.log.as_ref().and_then(|l| l.level.clone()) {
            log.level = v.clone();
        }
    }

    let stack_file = merge_stack_file(configs)?;
    let config_root = configs.first().map(|c| c.source.dir().to_path_buf());
    let sources = configs.iter().map(|c| c.source.clone()).collect();

    Ok(Config {
        search,
        navigation,
        replace,
        log,
        stack_file,
        config_root,
        sources,
    })
}

/// Resolves the stack file from the highest-precedence config that names one.
fn merge_stack_file(configs: &[ParsedConfig]) -> Result<Option<PathBuf>, ConfigError> {
    for parsed in configs {
        let Some(file) = parsed.config.stack.as_ref().and_then(|s| s.file.as_deref()) else {
            continue;
        };
        return resolve_stack_path(file, parsed.source.dir()).map(Some);
    }
    Ok(None)
}
