//! Configuration file loading with precedence handling.

use crate::state::{layout::is_valid_ratio, SplitDefaults};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LECTERN_CONFIG";
/// Environment variable overriding `persist_session`.
pub const PERSIST_SESSION_ENV: &str = "LECTERN_PERSIST_SESSION";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/lectern/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Save and restore open tabs.
    #[serde(default)]
    pub persist_session: Option<bool>,

    /// Path of the session file.
    #[serde(default)]
    pub session_file_path: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Default ratio of the book tree split.
    #[serde(default)]
    pub main_split: Option<f64>,

    /// Default ratio of the table-of-contents split.
    #[serde(default)]
    pub toc_split: Option<f64>,

    /// Default ratio of the commentaries split.
    #[serde(default)]
    pub content_split: Option<f64>,

    /// Default ratio of the targum split.
    #[serde(default)]
    pub targum_split: Option<f64>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Save and restore open tabs.
    pub persist_session: bool,
    /// Path of the session file.
    pub session_file_path: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Split ratios for new tabs and for panes shown without a remembered ratio.
    pub splits: SplitDefaults,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            persist_session: true,
            session_file_path: default_session_path(),
            log_file_path: default_log_path(),
            splits: SplitDefaults::default(),
        }
    }
}

fn state_path(file: &str) -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("lectern").join(file),
        None => PathBuf::from(file),
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/lectern/lectern.log` on Unix-like systems,
/// or appropriate platform path on other systems.
/// Falls back to the current directory when no state directory exists.
pub fn default_log_path() -> PathBuf {
    state_path("lectern.log")
}

/// Resolve default session file path, next to the log file.
pub fn default_session_path() -> PathBuf {
    state_path("session.json")
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/lectern/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lectern").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `LECTERN_CONFIG` environment variable
/// 3. Default path `~/.config/lectern/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for `LECTERN_PERSIST_SESSION` (`true`/`false`/`1`/`0`).
///
/// # Errors
///
/// Returns error if the variable is set to anything else.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(PERSIST_SESSION_ENV) {
        config.persist_session = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidValue {
            field: PERSIST_SESSION_ENV,
            reason: format!("expected true or false, got {raw:?}"),
        })?;
    }

    Ok(config)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
///
/// # Errors
///
/// Returns error if a split ratio lies outside `[0, 1]`.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let splits = SplitDefaults {
        main: ratio("main_split", config.main_split, defaults.splits.main)?,
        toc: ratio("toc_split", config.toc_split, defaults.splits.toc)?,
        content: ratio("content_split", config.content_split, defaults.splits.content)?,
        targum: ratio("targum_split", config.targum_split, defaults.splits.targum)?,
    };

    Ok(ResolvedConfig {
        persist_session: config.persist_session.unwrap_or(defaults.persist_session),
        session_file_path: config
            .session_file_path
            .unwrap_or(defaults.session_file_path),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        splits,
    })
}

fn ratio(field: &'static str, value: Option<f64>, default: f64) -> Result<f64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) if is_valid_ratio(v) => Ok(v),
        Some(v) => Err(ConfigError::InvalidValue {
            field,
            reason: format!("ratio must lie in [0, 1], got {v}"),
        }),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    persist_override: Option<bool>,
    session_path_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(persist) = persist_override {
        config.persist_session = persist;
    }

    if let Some(path) = session_path_override {
        config.session_file_path = path;
    }

    config
}

/// Run the whole precedence chain.
///
/// # Errors
///
/// Returns the first read, parse or validation error.
pub fn resolve(
    config_path: Option<PathBuf>,
    persist_override: Option<bool>,
    session_path_override: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file)?)?;
    Ok(apply_cli_overrides(
        config,
        persist_override,
        session_path_override,
    ))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
