//! Configuration for the loandesk console.
//!
//! Settings come from four places, highest precedence first: command-line options, the
//! `LOANDESK_BASE_URL` environment variable (base URL only), an optional JSON or YAML
//! file, and built-in defaults.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::cli_utils::OutputFormat;
use crate::http_utils::DEFAULT_BASE_URL;

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "LOANDESK_BASE_URL";

/// Settings of the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the remote API.
    pub base_url: String,
    /// How records are printed.
    pub output: OutputFormat,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output: OutputFormat::default(),
            log_filter: None,
        }
    }
}

/// Values given on the command line.  `None` leaves the lower layers in charge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--base-url`.
    pub base_url: Option<String>,
    /// `--output`.
    pub output: Option<OutputFormat>,
}

impl ClientConfig {
    /// Reads a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        parse_config_from_content(path, &content)
    }

    /// Layers the file (if any), the environment and `overrides` over the defaults.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let env_base_url = std::env::var(BASE_URL_ENV).ok();
        Self::load_with_env(path, overrides, env_base_url)
    }

    /// [`ClientConfig::load`] with the environment value passed in.
    pub fn load_with_env(
        path: Option<&Path>,
        overrides: Overrides,
        env_base_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(base_url) = env_base_url.filter(|u| !u.trim().is_empty()) {
            config.base_url = base_url;
        }
        if let Some(base_url) = overrides.base_url {
            config.base_url = base_url;
        }
        if let Some(output) = overrides.output {
            config.output = output;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidBaseUrl(self.base_url.clone());
        let url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        Ok(())
    }
}

/// Parses config from file content: by extension when it has one, else JSON then YAML.
fn parse_config_from_content(path: &Path, content: &str) -> Result<ClientConfig, ConfigError> {
    let parse_error = |reason: String| ConfigError::Parse {
        path: path.to_path_buf(),
        reason,
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Some("yaml") | Some("yml") => {
            serde_yml::from_str(content).map_err(|e| parse_error(e.to_string()))
        }
        _ => {
            if let Ok(config) = serde_json::from_str::<ClientConfig>(content) {
                Ok(config)
            } else if let Ok(config) = serde_yml::from_str::<ClientConfig>(content) {
                Ok(config)
            } else {
                Err(parse_error(
                    "Ensure it is valid JSON or YAML.".to_string(),
                ))
            }
        }
    }
}

/// Errors raised while loading the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    Read {
        /// The config file.
        path: PathBuf,
        /// The I/O error.
        reason: String,
    },
    /// The file is not a valid config.
    Parse {
        /// The config file.
        path: PathBuf,
        /// The parser error.
        reason: String,
    },
    /// The base URL is not an absolute http(s) URL.
    InvalidBaseUrl(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConfigError::Read { path, reason } => {
                write!(f, "Failed to read config {}: {}", path.display(), reason)
            }
            ConfigError::Parse { path, reason } => {
                write!(f, "Failed to parse config {}: {}", path.display(), reason)
            }
            ConfigError::InvalidBaseUrl(url) => write!(f, "Invalid base URL '{}'", url),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "loandesk_config_{}_{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::load_with_env(None, Overrides::default(), None).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.output, OutputFormat::Table);
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn yaml_file() {
        let path = write_config(
            "file.yaml",
            "base_url: https://loans.example.com/api\noutput: yaml\nlog_filter: loandesk=debug\n",
        );
        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url, "https://loans.example.com/api");
        assert_eq!(config.output, OutputFormat::Yaml);
        assert_eq!(config.log_filter.as_deref(), Some("loandesk=debug"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn extensionless_file_tries_json_then_yaml() {
        let json = write_config("json_noext", r#"{"output": "json"}"#);
        assert_eq!(
            ClientConfig::from_file(&json).unwrap().output,
            OutputFormat::Json
        );
        let yaml = write_config("yaml_noext", "output: yaml\n");
        let config = ClientConfig::from_file(&yaml).unwrap();
        assert_eq!(config.output, OutputFormat::Yaml);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        std::fs::remove_file(json).ok();
        std::fs::remove_file(yaml).ok();
    }

    #[test]
    fn bad_json_reports_path() {
        let path = write_config("bad.json", "{ not json");
        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file() {
        let err = ClientConfig::from_file(Path::new("/nonexistent/loandesk.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn precedence_cli_over_env_over_file() {
        let path = write_config(
            "layers.json",
            r#"{"base_url": "http://file.example/api", "output": "yaml"}"#,
        );
        let from_env = ClientConfig::load_with_env(
            Some(&path),
            Overrides::default(),
            Some("http://env.example/api".to_string()),
        )
        .unwrap();
        assert_eq!(from_env.base_url, "http://env.example/api");
        assert_eq!(from_env.output, OutputFormat::Yaml);

        let from_cli = ClientConfig::load_with_env(
            Some(&path),
            Overrides {
                base_url: Some("http://cli.example/api".to_string()),
                output: Some(OutputFormat::Json),
            },
            Some("http://env.example/api".to_string()),
        )
        .unwrap();
        assert_eq!(from_cli.base_url, "http://cli.example/api");
        assert_eq!(from_cli.output, OutputFormat::Json);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_non_http_base_url() {
        let overrides = Overrides {
            base_url: Some("localhost:8080".to_string()),
            output: None,
        };
        assert_eq!(
            ClientConfig::load_with_env(None, overrides, None),
            Err(ConfigError::InvalidBaseUrl("localhost:8080".to_string()))
        );
    }
}
