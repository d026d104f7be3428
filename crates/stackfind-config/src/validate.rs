//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::Config;

/// Level names accepted in a log filter directive.
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The log level is empty.
    EmptyLogLevel,
    /// A log filter directive names an unknown level.
    UnknownLogLevel {
        /// The offending directive.
        directive: String,
    },
    /// The stack file does not look like a YAML document.
    StackFileNotYaml {
        /// Path to the stack file.
        path: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLogLevel => write!(f, "log level is empty; falling back to 'warn'"),
            Self::UnknownLogLevel { directive } => {
                write!(f, "log directive '{directive}' names an unknown level")
            }
            Self::StackFileNotYaml { path } => {
                write!(f, "stack file does not have a .yaml extension: {path}")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = validate_log_level(&config.log.level);

    if let Some(path) = &config.stack_file {
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if !is_yaml {
            warnings.push(ConfigWarning::StackFileNotYaml {
                path: path.display().to_string(),
            });
        }
    }

    warnings
}

/// Checks each comma-separated directive of a filter string.
///
/// A directive is either a bare level (`debug`) or `target=level`.
fn validate_log_level(level: &str) -> Vec<ConfigWarning> {
    if level.trim().is_empty() {
        return vec![ConfigWarning::EmptyLogLevel];
    }

    level
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty() && !is_valid_directive(d))
        .map(|directive| ConfigWarning::UnknownLogLevel {
            directive: directive.to_string(),
        })
        .collect()
}

/// Checks one directive.
fn is_valid_directive(directive: &str) -> bool {
    match directive.rsplit_once('=') {
        Some((_, level)) => is_level(level),
        // Bare targets such as `stackfind_search` enable everything for that target
        None => is_level(directive) || is_target(directive),
    }
}

/// Returns true for a known level name.
fn is_level(s: &str) -> bool {
    LOG_LEVELS.iter().any(|l| l.eq_ignore_ascii_case(s))
}

/// Returns true for something shaped like a tracing target.
fn is_target(s: &str) -> bool {
    s.starts_with("stackfind") || s.contains("::") || s.contains('_')
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config_with_level(level: &str) -> Config {
        let mut config = Config::default();
        config.log.level = level.to_string();
        config
    }

    #[test]
    fn test_default_config_is_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn test_empty_log_level() {
        let warnings = validate_config(&config_with_level("  "));
        assert_eq!(warnings, vec![ConfigWarning::EmptyLogLevel]);
    }

    #[test]
    fn test_directives_with_targets() {
        let warnings = validate_config(&config_with_level("warn,stackfind_search=debug"));
        assert!(warnings.is_empty());

        let warnings = validate_config(&config_with_level("stackfind_search"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_level() {
        let warnings = validate_config(&config_with_level("info,stackfind_search=loud"));
        assert_eq!(
            warnings,
            vec![ConfigWarning::UnknownLogLevel {
                directive: "stackfind_search=loud".to_string()
            }]
        );

        let warnings = validate_config(&config_with_level("verbose"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_stack_file_extension() {
        let mut config = Config::default();
        config.stack_file = Some(PathBuf::from("/scenes/rock.YML"));
        assert!(validate_config(&config).is_empty());

        config.stack_file = Some(PathBuf::from("/scenes/rock.json"));
        let warnings = validate_config(&config);
        assert!(matches!(
            warnings.as_slice(),
            [ConfigWarning::StackFileNotYaml { .. }]
        ));
        assert!(warnings[0].to_string().contains("rock.json"));
    }
}
