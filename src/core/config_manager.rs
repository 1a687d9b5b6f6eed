// src/core/config_manager.rs
//! Client configuration: API location, session file, logging

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigManager {
    pub environment: String,
    pub api: ApiConfig,
    pub session_file: PathBuf,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// One environment section of `config.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub session_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub local: FileConfig,
    #[serde(default)]
    pub production: FileConfig,
}

/// Values taken from environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub session_file: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self> {
        let timeout_seconds = match std::env::var("CAREERMADE_TIMEOUT_SECS") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| anyhow::anyhow!("CAREERMADE_TIMEOUT_SECS must be a number of seconds"))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            api_url: std::env::var("CAREERMADE_API_URL").ok(),
            timeout_seconds,
            session_file: std::env::var("CAREERMADE_SESSION_FILE").ok().map(PathBuf::from),
            home: std::env::var("HOME").ok().map(PathBuf::from),
        })
    }
}

impl ConfigManager {
    /// Load configuration from `config.yaml` (if present) and the environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = std::env::var("CAREERMADE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
        let file = Self::load_file(&config_path)?;

        Ok(Self::resolve(&environment, file, EnvOverrides::from_env()?))
    }

    fn get_environment() -> String {
        std::env::var("CAREERMADE_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_file(path: &Path) -> Result<Option<ConfigFile>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(file))
    }

    /// Merge defaults, the file section for `environment`, and env overrides
    /// (highest precedence).
    pub fn resolve(environment: &str, file: Option<ConfigFile>, env: EnvOverrides) -> Self {
        let section = file
            .map(|f| match environment {
                "production" => f.production,
                _ => f.local,
            })
            .unwrap_or_default();

        let base_url = env
            .api_url
            .or(section.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let session_file = env
            .session_file
            .or(section.session_file)
            .unwrap_or_else(|| match &env.home {
                Some(home) => home.join(".careermade").join("session.json"),
                None => PathBuf::from(".careermade").join("session.json"),
            });

        Self {
            environment: environment.to_string(),
            api: ApiConfig {
                base_url,
                timeout_seconds: env
                    .timeout_seconds
                    .or(section.timeout_seconds)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
            session_file,
            log_file: section.log_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = ConfigManager::resolve("local", None, EnvOverrides::default());
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.session_file, PathBuf::from(".careermade/session.json"));
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_file_section_follows_environment() {
        let file: ConfigFile = serde_yaml::from_str(
            r#"
local:
  api_url: http://localhost:5000/
production:
  api_url: https://api.careermade.example
  timeout_seconds: 10
  log_file: /var/log/careermade.json
"#,
        )
        .unwrap();

        let local = ConfigManager::resolve("local", Some(file.clone()), EnvOverrides::default());
        assert_eq!(local.api.base_url, "http://localhost:5000");

        let prod = ConfigManager::resolve("production", Some(file), EnvOverrides::default());
        assert_eq!(prod.api.base_url, "https://api.careermade.example");
        assert_eq!(prod.api.timeout_seconds, 10);
        assert_eq!(prod.log_file, Some(PathBuf::from("/var/log/careermade.json")));
    }

    #[test]
    fn test_env_overrides_win() {
        let file = ConfigFile {
            local: FileConfig {
                api_url: Some("http://file".to_string()),
                timeout_seconds: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = EnvOverrides {
            api_url: Some("http://env".to_string()),
            home: Some(PathBuf::from("/home/asha")),
            ..Default::default()
        };

        let config = ConfigManager::resolve("local", Some(file), env);
        assert_eq!(config.api.base_url, "http://env");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(
            config.session_file,
            PathBuf::from("/home/asha/.careermade/session.json")
        );
    }
}
