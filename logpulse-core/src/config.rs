//! Configuration file support for Logpulse
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.logpulserc.json` in the working directory
//! 3. `logpulse.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_SOURCE: &str = "logfile.txt";
const DEFAULT_TOP_N: usize = 10;
const DEFAULT_TITLE: &str = "Log Analysis Dashboard";

/// Logpulse configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogpulseConfig {
    /// Path of the access log to aggregate (default: logfile.txt)
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Number of top client addresses to keep (default: 10)
    #[serde(default)]
    pub top: Option<usize>,

    /// Title shown on the HTML report (default: "Log Analysis Dashboard")
    #[serde(default)]
    pub title: Option<String>,
}

/// Resolved configuration ready for use
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source_path: PathBuf,
    pub top_n: usize,
    pub title: String,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl LogpulseConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(top) = self.top {
            if top == 0 {
                anyhow::bail!("top must be at least 1 (got 0)");
            }
        }

        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                anyhow::bail!("title must not be blank");
            }
        }

        Ok(())
    }

    /// Resolve config into a form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        Ok(ResolvedConfig {
            source_path: self
                .source
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE)),
            top_n: self.top.unwrap_or(DEFAULT_TOP_N),
            title: self
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        LogpulseConfig::default().resolve()
    }
}

/// Discover and load a config file from the working directory
///
/// Search order:
/// 1. `.logpulserc.json`
/// 2. `logpulse.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(LogpulseConfig, PathBuf)>> {
    let rc_path = dir.join(".logpulserc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    let config_path = dir.join("logpulse.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<LogpulseConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: LogpulseConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for one run
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (LogpulseConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_config_is_valid() {
        let config = LogpulseConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.source_path, PathBuf::from("logfile.txt"));
        assert_eq!(resolved.top_n, 10);
        assert_eq!(resolved.title, "Log Analysis Dashboard");
        assert!(resolved.config_path.is_none());
    }

    #[test]
    fn parse_minimal_config() {
        let json = r#"{}"#;
        let config: LogpulseConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "source": "/var/log/nginx/access.log",
            "top": 25,
            "title": "Edge Traffic"
        }"#;
        let config: LogpulseConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(
            resolved.source_path,
            PathBuf::from("/var/log/nginx/access.log")
        );
        assert_eq!(resolved.top_n, 25);
        assert_eq!(resolved.title, "Edge Traffic");
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<LogpulseConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn reject_zero_top() {
        let json = r#"{"top": 0}"#;
        let config: LogpulseConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_blank_title() {
        let json = r#"{"title": "   "}"#;
        let config: LogpulseConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn discovery_prefers_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".logpulserc.json"), r#"{"top": 3}"#).unwrap();
        fs::write(dir.path().join("logpulse.config.json"), r#"{"top": 7}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.top, Some(3));
        assert!(path.ends_with(".logpulserc.json"));
    }

    #[test]
    fn discovery_falls_back_to_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("logpulse.config.json"), r#"{"top": 7}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.top, Some(7));
        assert!(path.ends_with("logpulse.config.json"));
    }

    #[test]
    fn no_config_file_resolves_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert_eq!(resolved.top_n, 10);
        assert!(resolved.config_path.is_none());
    }

    #[test]
    fn explicit_path_records_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"source": "web.log"}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&path)).unwrap();
        assert_eq!(resolved.source_path, PathBuf::from("web.log"));
        assert_eq!(resolved.config_path, Some(path));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_config_file(&path).is_err());
    }
}
