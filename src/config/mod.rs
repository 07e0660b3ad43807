//! Configuration management.
//!
//! Settings come from an optional TOML file layered under `ECOURTS_*`
//! environment variables, with `__` separating sections:
//!
//! ```toml
//! [site]
//! base_url = "https://services.ecourts.gov.in/ecourtindia_v6/"
//!
//! [http]
//! user_agent = "ecourts-scraper/1.0 (+https://github.com/yourname/ecourts-scraper)"
//! timeout_secs = 15
//!
//! [downloads]
//! documents_dir = "downloads"
//! cause_lists_dir = "cause_lists"
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```
//!
//! `ECOURTS_HTTP__TIMEOUT_SECS=30` overrides `http.timeout_secs`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Public eCourts services root
pub const DEFAULT_BASE_URL: &str = "https://services.ecourts.gov.in/ecourtindia_v6/";

/// Identifying User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "ecourts-scraper/1.0 (+https://github.com/yourname/ecourts-scraper)";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Site being scraped
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Download settings
    #[serde(default)]
    pub downloads: DownloadConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL every page path is joined onto (keep the trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

/// Download configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Where case documents go (`{cnr}_doc_{n}.pdf`)
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,

    /// Where cause lists go (`cause_list_{n}.pdf`)
    #[serde(default = "default_cause_lists_dir")]
    pub cause_lists_dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            cause_lists_dir: default_cause_lists_dir(),
        }
    }
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_cause_lists_dir() -> PathBuf {
    PathBuf::from("cause_lists")
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
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

/// Load configuration from an optional file plus `ECOURTS_*` environment variables
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    load_config_with(path, environment())
}

/// `ECOURTS_` prefix, `__` between section and key
fn environment() -> config::Environment {
    config::Environment::with_prefix("ECOURTS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_config_with(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder.add_source(environment).build()?;
    settings.try_deserialize()
}

/// Look for a config file in the working directory, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("ecourts.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("ecourts-scraper").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http.timeout_secs, 15);
        assert_eq!(config.http.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.downloads.documents_dir, PathBuf::from("downloads"));
        assert_eq!(config.downloads.cause_lists_dir, PathBuf::from("cause_lists"));
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ecourts.toml");

        let toml_content = r#"
[site]
base_url = "http://localhost:8080/ecourtindia_v6/"

[http]
timeout_secs = 5

[downloads]
documents_dir = "/tmp/case-docs"

[logging]
format = "json"
"#;
        std::fs::write(&path, toml_content).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.site.base_url, "http://localhost:8080/ecourtindia_v6/");
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.downloads.documents_dir, PathBuf::from("/tmp/case-docs"));
        assert_eq!(config.downloads.cause_lists_dir, PathBuf::from("cause_lists"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_env_overrides() {
        let config = load_config_with(
            None,
            env(&[
                ("ECOURTS_HTTP__TIMEOUT_SECS", "30"),
                ("ECOURTS_LOGGING__FORMAT", "json"),
                ("ECOURTS_SITE__BASE_URL", "http://localhost:9000/ecourtindia_v6/"),
            ]),
        )
        .unwrap();

        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.site.base_url, "http://localhost:9000/ecourtindia_v6/");
        assert_eq!(config.http.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ecourts.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 5\n").unwrap();

        let config = load_config_with(
            Some(&path),
            env(&[("ECOURTS_HTTP__TIMEOUT_SECS", "45"), ("OTHER_HTTP__TIMEOUT_SECS", "1")]),
        )
        .unwrap();
        assert_eq!(config.http.timeout_secs, 45);
    }

    #[test]
    fn test_load_config_nonexistent() {
        let path = PathBuf::from("/nonexistent/ecourts.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
