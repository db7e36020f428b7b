use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Upload ceiling applied when `DOCQA_MAX_UPLOAD_BYTES` is unset (200 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;
/// Question preview width used by history listings when `DOCQA_PREVIEW_CHARS` is unset.
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configuration was installed twice in the same process.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Runtime configuration for the document assistant.
#[derive(Debug, Clone)]
pub struct Config {
    /// Largest upload, in bytes, the extractor will accept.
    pub max_upload_bytes: usize,
    /// Optional path that receives a copy of the log stream.
    pub log_file: Option<String>,
    /// Number of question characters shown in history listings.
    pub preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_file: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset so an empty `.env` entry falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let parsed = |key: &str| parse_optional(optional(key), key);

        Ok(Self {
            max_upload_bytes: parsed("DOCQA_MAX_UPLOAD_BYTES")?.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            log_file: optional("DOCQA_LOG_FILE").map(|value| value.trim().to_string()),
            preview_chars: parsed("DOCQA_PREVIEW_CHARS")?.unwrap_or(DEFAULT_PREVIEW_CHARS),
        })
    }
}

fn parse_optional(value: Option<String>, key: &str) -> Result<Option<usize>, ConfigError> {
    value
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .ok()
                .filter(|parsed| *parsed > 0)
                .ok_or_else(|| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, falling back to defaults when nothing was installed.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        max_upload_bytes = config.max_upload_bytes,
        log_file = ?config.log_file,
        preview_chars = config.preview_chars,
        "Loaded configuration"
    );
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(get_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_variables_are_missing() {
        let config = Config::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.preview_chars, DEFAULT_PREVIEW_CHARS);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DOCQA_MAX_UPLOAD_BYTES", "1024"),
            ("DOCQA_LOG_FILE", " logs/docqa.log "),
            ("DOCQA_PREVIEW_CHARS", "80"),
        ]))
        .expect("config");
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.log_file.as_deref(), Some("logs/docqa.log"));
        assert_eq!(config.preview_chars, 80);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("DOCQA_MAX_UPLOAD_BYTES", "   ")])).expect("config");
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let error = Config::from_lookup(lookup_from(&[("DOCQA_PREVIEW_CHARS", "wide")]))
            .expect_err("invalid value");
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "DOCQA_PREVIEW_CHARS"));

        let error = Config::from_lookup(lookup_from(&[("DOCQA_MAX_UPLOAD_BYTES", "0")]))
            .expect_err("zero limit");
        assert!(matches!(error, ConfigError::InvalidValue(_)));
    }
}
