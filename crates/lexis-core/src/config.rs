//! Configuration module for Lexis Core.
//!
//! Values are layered: struct defaults, then an optional TOML file, then
//! `LEXIS_`-prefixed environment variables (`__` separates sections, e.g.
//! `LEXIS_TRAINING__POLL_INTERVAL_SECS=5`).

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lexis_training::{DEFAULT_BASE_MODEL, DEFAULT_LIST_LIMIT, ModelOrdering};
use serde::Deserialize;

use crate::error::{LexisError, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "LEXIS_CONFIG";

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "lexis.toml";

const ENV_PREFIX: &str = "LEXIS";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The address to bind the HTTP server to.
    #[serde(default = "default_address")]
    pub address: SocketAddr,
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key; falls back to `OPENAI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    lexis_models::DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl OpenAIConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Translation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_target_language")]
    pub target_language: String,
    /// Maximum number of translation requests in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Per-sentence deadline in a batch; a sentence that misses it is marked failed.
    #[serde(default)]
    pub item_timeout_secs: Option<u64>,
    /// Model used when a command does not name one.
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_target_language() -> String {
    "Greek".to_string()
}

fn default_concurrency() -> usize {
    8
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            concurrency: default_concurrency(),
            item_timeout_secs: None,
            default_model: None,
            temperature: None,
        }
    }
}

impl TranslationConfig {
    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout_secs.map(Duration::from_secs)
    }
}

/// Fine-tuning settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_base_model")]
    pub base_model: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    #[serde(default)]
    pub model_ordering: ModelOrdering,
}

fn default_base_model() -> String {
    DEFAULT_BASE_MODEL.to_string()
}

fn default_poll_interval() -> u64 {
    10
}

fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            base_model: default_base_model(),
            poll_interval_secs: default_poll_interval(),
            list_limit: default_list_limit(),
            model_ordering: ModelOrdering::default(),
        }
    }
}

impl TrainingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Root configuration for Lexis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

impl Config {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from an optional file and the process environment.
    ///
    /// `path` wins over `LEXIS_CONFIG`; without either, `./lexis.toml` is used
    /// if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file is missing, a value fails to parse, or
    /// validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        let environment = ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        let mut config = Self::load_from(path.as_deref(), environment)?;
        if config.openai.api_key.is_none() {
            config.openai.api_key = env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty());
        }
        Ok(config)
    }

    fn load_from(path: Option<&Path>, environment: ::config::Environment) -> Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path.to_path_buf()).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = ::config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.translation.concurrency == 0 {
            return Err(LexisError::Config(
                "translation.concurrency must be >= 1".to_string(),
            ));
        }
        if self.translation.item_timeout_secs == Some(0) {
            return Err(LexisError::Config(
                "translation.item_timeout_secs must be >= 1".to_string(),
            ));
        }
        if self.training.poll_interval_secs == 0 {
            return Err(LexisError::Config(
                "training.poll_interval_secs must be >= 1".to_string(),
            ));
        }
        if self.training.list_limit == 0 {
            return Err(LexisError::Config(
                "training.list_limit must be >= 1".to_string(),
            ));
        }
        if self.training.base_model.trim().is_empty() {
            return Err(LexisError::Config(
                "training.base_model is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The API key, or a configuration error naming both ways to set it.
    pub fn api_key(&self) -> Result<&str> {
        self.openai
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                LexisError::Config("no API key: set openai.api_key or OPENAI_API_KEY".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    fn env_of(vars: &[(&str, &str)]) -> ::config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(
            config.server.address,
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.translation.concurrency, 8);
        assert_eq!(config.translation.item_timeout(), None);
        assert_eq!(config.training.base_model, "gpt-4o-mini-2024-07-18");
        assert_eq!(config.training.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.training.list_limit, 20);
        assert_eq!(config.training.model_ordering, ModelOrdering::RenderedText);
        assert_eq!(config.translation.target_language, "Greek");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
address = "0.0.0.0:8080"

[translation]
concurrency = 2
item_timeout_secs = 30
default_model = "ft:gpt-4o-mini-2024-07-18:acme::abcde"

[training]
poll_interval_secs = 3
model_ordering = "timestamp"
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path()), no_env()).unwrap();
        assert_eq!(
            config.server.address,
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.translation.concurrency, 2);
        assert_eq!(
            config.translation.item_timeout(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            config.translation.default_model.as_deref(),
            Some("ft:gpt-4o-mini-2024-07-18:acme::abcde")
        );
        assert_eq!(config.training.poll_interval_secs, 3);
        assert_eq!(config.training.model_ordering, ModelOrdering::Timestamp);
        assert_eq!(config.training.list_limit, 20);
    }

    #[test]
    fn test_environment_overrides() {
        let env = env_of(&[
            ("LEXIS_TRAINING__POLL_INTERVAL_SECS", "5"),
            ("LEXIS_TRANSLATION__TARGET_LANGUAGE", "French"),
            ("LEXIS_TRANSLATION__ITEM_TIMEOUT_SECS", "12"),
        ]);
        let config = Config::load_from(None, env).unwrap();
        assert_eq!(config.training.poll_interval_secs, 5);
        assert_eq!(config.translation.target_language, "French");
        assert_eq!(config.translation.item_timeout_secs, Some(12));
    }

    #[test]
    fn test_missing_named_file_is_error() {
        let result = Config::load_from(Some(Path::new("/nonexistent/lexis.toml")), no_env());
        assert!(matches!(result, Err(LexisError::Config(_))));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.translation.concurrency = 0;
        assert!(matches!(config.validate(), Err(LexisError::Config(_))));
    }

    #[test]
    fn test_zero_item_timeout_rejected() {
        let mut config = Config::default();
        config.translation.item_timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(LexisError::Config(_))));
    }

    #[test]
    fn test_api_key_required() {
        let mut config = Config::default();
        assert!(config.api_key().is_err());
        config.openai.api_key = Some("sk-test".to_string());
        assert_eq!(config.api_key().unwrap(), "sk-test");
    }
}
