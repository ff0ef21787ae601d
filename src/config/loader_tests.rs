//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("lectern_test_{}_{}.toml", name, std::process::id()));
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

#[test]
fn default_config_path_contains_lectern_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("lectern") && path_str.ends_with("config.toml"),
        "Path should contain 'lectern' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_paths_live_in_the_lectern_directory() {
    assert!(default_log_path().to_string_lossy().ends_with("lectern.log"));
    assert!(default_session_path()
        .to_string_lossy()
        .ends_with("session.json"));
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = temp_config(
        "valid",
        r#"
persist_session = false
session_file_path = "/tmp/lectern/session.json"
main_split = 0.25
targum_split = 0.9
"#,
    );

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.persist_session, Some(false));
    assert_eq!(
        config.session_file_path,
        Some(PathBuf::from("/tmp/lectern/session.json"))
    );
    assert_eq!(config.main_split, Some(0.25));
    assert_eq!(config.toc_split, None);
    assert_eq!(config.targum_split, Some(0.9));

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = temp_config("invalid", "persist_session = [not valid");

    let result = load_config_file(&config_path);

    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Invalid TOML should be a parse error, got: {:?}",
        result
    );
    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"");
    assert!(result.is_err(), "Unknown fields should be rejected");
}

#[test]
fn merge_config_uses_defaults_when_none() {
    let resolved = merge_config(None).expect("defaults are valid");
    assert_eq!(resolved, ResolvedConfig::default());
}

#[test]
fn merge_config_overrides_with_config_file_values() {
    let config_file = ConfigFile {
        persist_session: Some(false),
        log_file_path: Some(PathBuf::from("/custom/path/to/app.log")),
        content_split: Some(0.6),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file)).expect("valid config");

    assert!(!resolved.persist_session);
    assert_eq!(resolved.log_file_path, PathBuf::from("/custom/path/to/app.log"));
    assert_eq!(resolved.splits.content, 0.6);
    assert_eq!(resolved.splits.main, 0.3);
    assert_eq!(resolved.session_file_path, default_session_path());
}

#[test]
fn merge_config_rejects_out_of_range_ratio() {
    let config_file = ConfigFile {
        toc_split: Some(1.5),
        ..ConfigFile::default()
    };

    let result = merge_config(Some(config_file));

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            field: "toc_split",
            ..
        })
    ));
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();

    assert!(config.persist_session);
    assert_eq!(config.splits, crate::state::SplitDefaults::default());
    assert!(!config.log_file_path.as_os_str().is_empty());
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(lectern_persist)]
fn apply_env_overrides_respects_persist_session() {
    let _guard = EnvGuard::new(PERSIST_SESSION_ENV);
    env::set_var(PERSIST_SESSION_ENV, "false");

    let result = apply_env_overrides(ResolvedConfig::default()).expect("valid flag");

    assert!(!result.persist_session);
}

#[test]
#[serial(lectern_persist)]
fn apply_env_overrides_rejects_garbage() {
    let _guard = EnvGuard::new(PERSIST_SESSION_ENV);
    env::set_var(PERSIST_SESSION_ENV, "maybe");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
#[serial(lectern_persist)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(PERSIST_SESSION_ENV);

    let base = ResolvedConfig::default();
    let result = apply_env_overrides(base.clone()).expect("nothing to parse");

    assert_eq!(result, base);
}

#[test]
#[serial(lectern_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let explicit_path = temp_config("explicit", "main_split = 0.1");
    let env_path = temp_config("env", "main_split = 0.2");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .expect("readable")
        .expect("present");

    assert_eq!(
        config.main_split,
        Some(0.1),
        "Should use explicit path, not LECTERN_CONFIG env var"
    );
    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(lectern_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let env_path = temp_config("env_only", "main_split = 0.2");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(None)
        .expect("readable")
        .expect("present");

    assert_eq!(config.main_split, Some(0.2));
    fs::remove_file(env_path).ok();
}

#[test]
fn apply_cli_overrides_wins_over_everything() {
    let base = ResolvedConfig {
        persist_session: true,
        ..ResolvedConfig::default()
    };

    let result = apply_cli_overrides(base, Some(false), Some(PathBuf::from("/tmp/s.json")));

    assert!(!result.persist_session);
    assert_eq!(result.session_file_path, PathBuf::from("/tmp/s.json"));
}

#[test]
fn apply_cli_overrides_no_overrides() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), None, None), base);
}

#[test]
#[serial(lectern_persist, lectern_config)]
fn precedence_chain_file_then_env_then_cli() {
    let _config_guard = EnvGuard::new(CONFIG_ENV);
    let _persist_guard = EnvGuard::new(PERSIST_SESSION_ENV);
    let path = temp_config("chain", "persist_session = false\ncontent_split = 0.5");

    env::set_var(PERSIST_SESSION_ENV, "true");
    let from_env = resolve(Some(path.clone()), None, None).expect("resolves");
    assert!(from_env.persist_session, "env overrides file");
    assert_eq!(from_env.splits.content, 0.5);

    let from_cli = resolve(Some(path.clone()), Some(false), None).expect("resolves");
    assert!(!from_cli.persist_session, "CLI overrides env");

    fs::remove_file(path).ok();
}
