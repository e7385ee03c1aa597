use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

use crate::fast::DEFAULT_PAGE_SIZE;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("environment variable '{0}' is not set")]
    MissingEnvVar(String),

    #[error("unclosed variable reference '${{' (missing '}}')")]
    UnclosedVarReference,
}

impl Config {
    /// Load the config file at `path`. A missing file yields the defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        if expanded.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_saphyr::from_str(&expanded)?)
    }

    /// The data file path, resolved against the config file's directory.
    pub fn data_path(&self, config_path: &Path) -> PathBuf {
        let raw = self
            .data
            .path
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_DATA_PATH));
        resolve_path(config_path, raw)
    }
}

/// Resolve a path relative to the config file directory.
///
/// Absolute paths are returned as-is.
pub fn resolve_path(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    config_dir.join(path)
}

// ============================================================================
// Defaults
// ============================================================================

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "xerophagon.yaml";
/// Default data file (relative to the config file).
pub const DEFAULT_DATA_PATH: &str = "data/data.json";

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> usize {
    64
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand `${VAR}` and `${VAR:-default}` references.
///
/// `$$` is a literal `$`. A plain `$` not followed by `{` is kept as-is.
/// Nested references are not supported.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                result.push('$');
            }
            Some('{') => {
                chars.next();
                result.push_str(&parse_var_reference(&mut chars)?);
            }
            _ => result.push('$'),
        }
    }

    Ok(result)
}

/// Parse the remainder of a `${...}` reference and look it up.
fn parse_var_reference(
    chars: &mut std::iter::Peekable<std::str::Chars>,
) -> Result<String, ConfigError> {
    let mut body = String::new();
    let mut closed = false;

    for c in chars.by_ref() {
        if c == '}' {
            closed = true;
            break;
        }
        body.push(c);
    }

    if !closed {
        return Err(ConfigError::UnclosedVarReference);
    }

    let (name, default) = match body.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (body.as_str(), None),
    };

    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(_) => default
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string())),
    }
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            max_connections: default_max_connections(),
        }
    }
}

// ============================================================================
// DataConfig
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DataConfig {
    /// Path of the JSON data file.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// HistoryConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryConfig {
    /// Fasts per history page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.request_timeout_seconds, 30);
        assert_eq!(config.history.page_size, 5);
        assert!(config.data.path.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 8088
  request_timeout_seconds: 10
data:
  path: /var/lib/xerophagon/data.json
history:
  page_size: 10
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.request_timeout_seconds, 10);
        assert_eq!(config.server.max_connections, 64);
        assert_eq!(
            config.data.path.as_deref(),
            Some(Path::new("/var/lib/xerophagon/data.json"))
        );
        assert_eq!(config.history.page_size, 10);
    }

    #[test]
    fn parse_partial_config_fills_defaults() {
        let config = Config::parse("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.history.page_size, 5);
    }

    #[test]
    fn parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn expand_default_value() {
        let out = expand_env_vars("port: ${XEROPHAGON_TEST_UNSET_PORT:-7000}").unwrap();
        assert_eq!(out, "port: 7000");
    }

    #[test]
    fn expand_empty_default() {
        let out = expand_env_vars("x: '${XEROPHAGON_TEST_UNSET_EMPTY:-}'").unwrap();
        assert_eq!(out, "x: ''");
    }

    #[test]
    fn expand_missing_required_var() {
        let err = expand_env_vars("x: ${XEROPHAGON_TEST_UNSET_REQUIRED}").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnvVar(name) if name == "XEROPHAGON_TEST_UNSET_REQUIRED"
        ));
    }

    #[test]
    fn expand_set_var() {
        // PATH is set in any test environment
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_env_vars("${PATH}").unwrap(), path);
    }

    #[test]
    fn expand_escapes_and_plain_dollar() {
        assert_eq!(expand_env_vars("$${HOME}").unwrap(), "${HOME}");
        assert_eq!(expand_env_vars("cost: $5").unwrap(), "cost: $5");
    }

    #[test]
    fn expand_unclosed_reference() {
        assert!(matches!(
            expand_env_vars("x: ${OOPS"),
            Err(ConfigError::UnclosedVarReference)
        ));
    }

    #[test]
    fn data_path_resolves_relative_to_config() {
        let config = Config::default();
        assert_eq!(
            config.data_path(Path::new("/etc/xerophagon/xerophagon.yaml")),
            PathBuf::from("/etc/xerophagon/data/data.json")
        );

        let config = Config::parse("data:\n  path: /srv/fast.json\n").unwrap();
        assert_eq!(
            config.data_path(Path::new("/etc/xerophagon/xerophagon.yaml")),
            PathBuf::from("/srv/fast.json")
        );
    }

    #[tokio::test]
    async fn load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path().join("nope.yaml")).await.unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[tokio::test]
    async fn load_invalid_yaml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xerophagon.yaml");
        std::fs::write(&path, "server:\n  port: not-a-port\n").unwrap();

        assert!(matches!(
            Config::load(&path).await,
            Err(ConfigError::Yaml(_))
        ));
    }
}
