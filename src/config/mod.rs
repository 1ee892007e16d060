//! Configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A TOML config file (`--config`, else the first of `./paper-glimpse.toml`
//!    and `<config dir>/paper-glimpse/config.toml` that exists)
//! 3. Environment variables prefixed `PAPER_GLIMPSE`, with `__` between the
//!    section and the key, e.g. `PAPER_GLIMPSE_ARXIV__MAX_RESULTS=50`
//!
//! # Configuration File Format
//!
//! ```toml
//! [app]
//! name = "Paper Glimpse API"
//! version = "1.0.0"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8000
//! cors_origins = ["http://localhost:3000"]
//!
//! [arxiv]
//! base_url = "https://export.arxiv.org/api/query"
//! max_results = 20
//! timeout_seconds = 30
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sources::arxiv::{ARXIV_API_URL, DEFAULT_MAX_RESULTS};
use crate::utils::DEFAULT_TIMEOUT_SECS;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PAPER_GLIMPSE";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "paper-glimpse.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub arxiv: ArxivConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application metadata reported by the root endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

fn default_app_name() -> String {
    "Paper Glimpse API".to_string()
}

fn default_app_version() -> String {
    "1.0.0".to_string()
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS; `"*"` allows any origin
    ///
    /// Accepts a list or a comma-separated string, so the environment can
    /// override it as `PAPER_GLIMPSE_SERVER__CORS_ORIGINS=a,b`.
    #[serde(
        default = "default_cors_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Origins::deserialize(deserializer)? {
        Origins::List(list) => list,
        Origins::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect(),
    })
}

/// Upstream arXiv API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_results: default_max_results(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    ARXIV_API_URL.to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

impl Config {
    /// Check values that deserialize fine but cannot work at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.arxiv.base_url).map_err(|e| {
            ConfigError::Invalid(format!("arxiv.base_url '{}': {}", self.arxiv.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "arxiv.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.arxiv.max_results == 0 {
            return Err(ConfigError::Invalid(
                "arxiv.max_results must be at least 1".to_string(),
            ));
        }
        if self.arxiv.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "arxiv.timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Load configuration from defaults, an optional file and the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_layered(path, None)
}

/// Layer the file over defaults, then environment variables over that
///
/// `env` replaces the process environment when given. Values arrive as strings
/// and are typed by the target field, so `2.0` stays `"2.0"` for a string key.
fn load_layered(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Find a config file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("paper-glimpse").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app.name, "Paper Glimpse API");
        assert_eq!(config.arxiv.base_url, "https://export.arxiv.org/api/query");
        assert_eq!(config.arxiv.max_results, 20);
        assert_eq!(config.arxiv.timeout_seconds, 30);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[app]
name = "Test API"

[server]
port = 9100

[arxiv]
base_url = "http://localhost:1234/api/query"
max_results = 5

[logging]
level = "debug"
format = "json"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.app.name, "Test API");
        assert_eq!(config.app.version, "1.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.arxiv.base_url, "http://localhost:1234/api/query");
        assert_eq!(config.arxiv.max_results, 5);
        assert_eq!(config.arxiv.timeout_seconds, 30);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/paper-glimpse.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.arxiv.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.arxiv.base_url = "ftp://example.com/query".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.arxiv.max_results = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.arxiv.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[arxiv]"));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    fn env(vars: &[(&str, &str)]) -> config::Map<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let vars = env(&[
            ("PAPER_GLIMPSE_ARXIV__MAX_RESULTS", "50"),
            ("PAPER_GLIMPSE_SERVER__PORT", "9000"),
            ("PAPER_GLIMPSE_SERVER__CORS_ORIGINS", "http://a.test, http://b.test"),
            ("PAPER_GLIMPSE_APP__VERSION", "2.0"),
            ("PAPER_GLIMPSE_LOGGING__LEVEL", "1"),
            ("PAPER_GLIMPSE_LOGGING__FORMAT", "json"),
            ("UNRELATED_VAR", "ignored"),
        ]);

        let config = load_layered(None, Some(vars)).unwrap();

        assert_eq!(config.arxiv.max_results, 50);
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.server.cors_origins,
            vec!["http://a.test", "http://b.test"]
        );
        assert_eq!(config.app.version, "2.0");
        assert_eq!(config.logging.level, "1");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.app.name, "Paper Glimpse API");
    }

    #[test]
    fn test_env_wins_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[arxiv]\nmax_results = 5\ntimeout_seconds = 7\n\n[server]\ncors_origins = [\"http://file.test\"]\n",
        )
        .unwrap();

        let vars = env(&[("PAPER_GLIMPSE_ARXIV__MAX_RESULTS", "42")]);
        let config = load_layered(Some(&path), Some(vars)).unwrap();

        assert_eq!(config.arxiv.max_results, 42);
        assert_eq!(config.arxiv.timeout_seconds, 7);
        assert_eq!(config.server.cors_origins, vec!["http://file.test"]);
    }

    #[test]
    fn test_env_invalid_number_is_error() {
        let vars = env(&[("PAPER_GLIMPSE_ARXIV__MAX_RESULTS", "lots")]);
        assert!(matches!(
            load_layered(None, Some(vars)),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(ServerConfig::default().bind_addr(), "127.0.0.1:8000");
    }
}
