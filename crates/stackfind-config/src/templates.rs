//! Configuration templates for `stackfind init`.
//!
//! Templates are rendered from the settings table below, with every value taken from the
//! built-in defaults. Each setting is written commented out under its help text, so a fresh
//! file changes nothing until a line is uncommented.

use toml::Table;

use crate::Config;

/// One documented setting.
struct Setting {
    /// Table the key lives in, `None` for top-level keys.
    section: Option<&'static str>,
    /// Key name.
    key: &'static str,
    /// Help text, one comment line per entry.
    help: &'static [&'static str],
    /// Example value for settings without a meaningful default.
    example: Option<&'static str>,
    /// Only offered in project files.
    project_only: bool,
}

/// Every setting `stackfind init` documents, in file order.
const SETTINGS: &[Setting] = &[
    Setting {
        section: None,
        key: "root",
        help: &["Stop looking for configuration in parent directories and the home directory."],
        example: Some("false"),
        project_only: true,
    },
    Setting {
        section: Some("stack"),
        key: "file",
        help: &[
            "Stack file used when a command is given none.",
            "Relative paths start from the directory holding this file.",
        ],
        example: Some("\"./stack.yaml\""),
        project_only: true,
    },
    Setting {
        section: Some("search"),
        key: "trim_input",
        help: &["Strip surrounding whitespace from the find and replace text."],
        example: None,
        project_only: false,
    },
    Setting {
        section: Some("search"),
        key: "view",
        help: &["Matches navigation walks: combined, layers, content-effects or mask-effects."],
        example: None,
        project_only: false,
    },
    Setting {
        section: Some("navigation"),
        key: "cursor_restore",
        help: &[
            "How the current match survives an edit that keeps the match counts.",
            "position keeps the index; identity follows the node that was current.",
        ],
        example: None,
        project_only: false,
    },
    Setting {
        section: Some("replace"),
        key: "case_sensitive",
        help: &["Match the find text case-sensitively when renaming."],
        example: None,
        project_only: false,
    },
    Setting {
        section: Some("log"),
        key: "level",
        help: &["Log filter used when STACKFIND_LOG is unset and no -v is given."],
        example: None,
        project_only: false,
    },
];

/// Header of the project template.
const LOCAL_HEADER: &str = "\
# stackfind configuration
#
# Applies to this directory and everything below it. Files closer to the working directory
# win over files further up; ~/.stackfind.toml has the lowest precedence.
";

/// Header of the global template.
const GLOBAL_HEADER: &str = "\
# stackfind global configuration (~/.stackfind.toml)
#
# Defaults shared by every project. Project files override any value set here.
";

/// Returns the project configuration template.
pub fn local_template() -> String {
    render(LOCAL_HEADER, false)
}

/// Returns the global configuration template.
pub fn global_template() -> String {
    render(GLOBAL_HEADER, true)
}

/// Renders `header` followed by every applicable setting, commented out.
fn render(header: &str, global: bool) -> String {
    let defaults = default_values();
    let mut out = String::from(header);
    let mut section = None;

    for setting in SETTINGS.iter().filter(|s| !(global && s.project_only)) {
        let Some(value) = setting
            .example
            .map(str::to_string)
            .or_else(|| default_value(defaults.as_ref(), setting))
        else {
            continue;
        };

        out.push('\n');
        if setting.section != section {
            section = setting.section;
            if let Some(name) = section {
                out.push_str(&format!("# [{name}]\n"));
            }
        }
        for line in setting.help {
            out.push_str(&format!("## {line}\n"));
        }
        out.push_str(&format!("# {} = {value}\n", setting.key));
    }
    out
}

/// The built-in settings as a TOML table.
fn default_values() -> Option<Table> {
    let toml = Config::default().settings_to_toml().ok()?;
    toml::from_str(&toml).ok()
}

/// Looks up the default of `setting`, rendered as a TOML literal.
fn default_value(defaults: Option<&Table>, setting: &Setting) -> Option<String> {
    let defaults = defaults?;
    let value = match setting.section {
        Some(section) => defaults.get(section)?.get(setting.key)?,
        None => defaults.get(setting.key)?,
    };
    Some(value.to_string())
}
