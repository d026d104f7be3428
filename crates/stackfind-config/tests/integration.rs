//! Integration tests for stackfind-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> resolve -> merge.

#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use stackfind_config::{
    CONFIG_FILENAME, Config, ConfigError, CursorRestore, ResultView, is_global_config,
};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn create_config(&self, dir: &str, content: &str) -> PathBuf {
        let rel = if dir.is_empty() {
            CONFIG_FILENAME.to_string()
        } else {
            format!("{dir}/{CONFIG_FILENAME}")
        };
        self.create_file(&rel, content)
    }
}

#[test]
fn test_load_root_config_only_returns_its_values() {
    let env = TestEnv::new();
    env.create_config("", "root = true\n");

    let config = Config::load(env.path()).unwrap();
    assert!(config.stack_file.is_none());
    assert!(config.search.trim_input);
    assert_eq!(config.search.view, ResultView::Combined);
    assert_eq!(config.navigation.cursor_restore, CursorRestore::Position);
    assert_eq!(config.config_root.as_deref(), Some(env.path()));
}

#[test]
fn test_load_layers_nested_configs() {
    let env = TestEnv::new();
    let stack = env.create_file("scenes/rock.yaml", "documents: []\n");
    env.create_config(
        "",
        r#"
root = true

[stack]
file = "scenes/rock.yaml"

[replace]
case_sensitive = true

[log]
level = "info"
"#,
    );
    env.create_config(
        "project",
        r#"
[search]
view = "content-effects"

[log]
level = "debug"
"#,
    );
    let cwd = env.create_dir("project/textures");

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.search.view, ResultView::ContentEffects);
    assert!(config.replace.case_sensitive);
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.stack_file, Some(stack.canonicalize().unwrap()));
    assert_eq!(config.config_root, Some(env.path().join("project")));
    assert!(config.validate().is_empty());

    let sources: Vec<String> = config.sources.iter().map(ToString::to_string).collect();
    assert_eq!(
        sources,
        [
            env.path().join("project").join(CONFIG_FILENAME).display().to_string(),
            format!("{} (root)", env.path().join(CONFIG_FILENAME).display()),
        ]
    );
}

#[test]
fn test_load_reports_parse_errors_with_path() {
    let env = TestEnv::new();
    let path = env.create_config("", "root = true\n[search\n");

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseToml, got {other:?}"),
    }
}

#[test]
fn test_load_from_explicit_files() {
    let env = TestEnv::new();
    let high = env.create_config("a", "[navigation]\ncursor_restore = \"identity\"\n");
    let low = env.create_config("b", "[search]\ntrim_input = false\n");

    let config = Config::load_from_files(&[high, low]).unwrap();
    assert_eq!(config.navigation.cursor_restore, CursorRestore::Identity);
    assert!(!config.search.trim_input);
}

#[test]
fn test_load_without_root_ignores_global_in_assertions() {
    let env = TestEnv::new();
    env.create_config("", "[search]\nview = \"layers\"\n");

    let config = Config::load(env.path()).unwrap();
    // The closest config always wins over the global one
    assert_eq!(config.search.view, ResultView::Layers);
    assert!(!is_global_config(&env.path().join(CONFIG_FILENAME)));
}
