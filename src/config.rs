//! Configuration management for the itinerary service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ItineraryError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for overrides, e.g. `SMARTITINERARY__SEARCH__API_KEY`
pub const ENV_PREFIX: &str = "SMARTITINERARY";

/// Root configuration structure for the itinerary service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search provider configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Narrative generator configuration
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search provider (SerpApi) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Provider API key
    pub api_key: Option<String>,
    /// Base URL of the provider
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_search_timeout")]
    pub timeout_seconds: u32,
}

/// Narrative generator (Gemini) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_generator_base_url")]
    pub base_url: String,
    /// Model name used in the `generateContent` path
    #[serde(default = "default_generator_model")]
    pub model: String,
    #[serde(default = "default_generator_timeout")]
    pub timeout_seconds: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log file path; console only when unset
    pub file_path: Option<PathBuf>,
    /// Size in bytes at which the log file is rotated
    #[serde(default = "default_log_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Number of rotated files to keep
    #[serde(default = "default_log_max_files")]
    pub max_files: u32,
}

// Default value functions
fn default_search_base_url() -> String {
    "https://serpapi.com".to_string()
}

fn default_search_timeout() -> u32 {
    30
}

fn default_generator_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generator_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_generator_timeout() -> u32 {
    120
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_max_file_size() -> u64 {
    5 * 1024 * 1024
}

fn default_log_max_files() -> u32 {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_search_base_url(),
            timeout_seconds: default_search_timeout(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_generator_base_url(),
            model: default_generator_model(),
            timeout_seconds: default_generator_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file_path: None,
            max_file_size_bytes: default_log_max_file_size(),
            max_files: default_log_max_files(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the given file, or the default location, plus environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let explicit = config_path.is_some();
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if explicit || config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(explicit)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| {
                format!(
                    "Failed to build configuration from {}",
                    config_file.display()
                )
            })?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_env(|name| std::env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("smart-itinerary").join("config.toml"))
    }

    /// Fill unset values from the variables of the older deployment
    ///
    /// `SERP_API_KEY`, `GEMINI_API_KEY`, `LOG_LEVEL`, `LOG_FILE`,
    /// `LOG_FILE_MAX_BYTES` and `LOG_FILE_BACKUP_COUNT` only apply where the
    /// file and prefixed variables left a field at its default.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if self.search.api_key.is_none() {
            self.search.api_key = lookup("SERP_API_KEY");
        }
        if self.generator.api_key.is_none() {
            self.generator.api_key = lookup("GEMINI_API_KEY");
        }
        if self.logging.level == default_log_level()
            && let Some(level) = lookup("LOG_LEVEL")
        {
            self.logging.level = level.to_lowercase();
        }
        if self.logging.file_path.is_none() {
            self.logging.file_path = lookup("LOG_FILE").map(PathBuf::from);
        }
        if self.logging.max_file_size_bytes == default_log_max_file_size()
            && let Some(bytes) = lookup("LOG_FILE_MAX_BYTES").and_then(|v| v.parse().ok())
        {
            self.logging.max_file_size_bytes = bytes;
        }
        if self.logging.max_files == default_log_max_files()
            && let Some(count) = lookup("LOG_FILE_BACKUP_COUNT").and_then(|v| v.parse().ok())
        {
            self.logging.max_files = count;
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.search.base_url.is_empty() {
            self.search.base_url = default_search_base_url();
        }
        if self.search.timeout_seconds == 0 {
            self.search.timeout_seconds = default_search_timeout();
        }
        if self.generator.base_url.is_empty() {
            self.generator.base_url = default_generator_base_url();
        }
        if self.generator.model.is_empty() {
            self.generator.model = default_generator_model();
        }
        if self.generator.timeout_seconds == 0 {
            self.generator.timeout_seconds = default_generator_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.max_file_size_bytes == 0 {
            self.logging.max_file_size_bytes = default_log_max_file_size();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Both providers need a key before the server can answer a single request
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("Search", "search.api_key", "SERP_API_KEY", &self.search.api_key),
            (
                "Generator",
                "generator.api_key",
                "GEMINI_API_KEY",
                &self.generator.api_key,
            ),
        ];

        for (label, field, legacy, key) in keys {
            match key.as_deref().map(str::trim) {
                None | Some("") => {
                    return Err(ItineraryError::config(format!(
                        "{label} API key is missing. Set `{field}` in the config file, \
                         {ENV_PREFIX}__{} or {legacy}.",
                        field.replace('.', "__").to_uppercase()
                    ))
                    .into());
                }
                Some(key) if key.len() < 8 => {
                    return Err(ItineraryError::config(format!(
                        "{label} API key appears to be invalid (too short). \
                         Please check your API key."
                    ))
                    .into());
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.search.timeout_seconds > 300 {
            return Err(ItineraryError::config("Search timeout cannot exceed 300 seconds").into());
        }

        if self.generator.timeout_seconds > 600 {
            return Err(
                ItineraryError::config("Generator timeout cannot exceed 600 seconds").into(),
            );
        }

        if self.logging.max_files > 100 {
            return Err(ItineraryError::config("Log max files cannot exceed 100").into());
        }

        if self.logging.max_file_size_bytes < 1024 {
            return Err(
                ItineraryError::config("Log max file size must be at least 1024 bytes").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ItineraryError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ItineraryError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (label, url) in [
            ("Search", &self.search.base_url),
            ("Generator", &self.generator.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ItineraryError::config(format!(
                    "{label} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn configured() -> AppConfig {
        let mut config = AppConfig::default();
        config.search.api_key = Some("serp_key_123".to_string());
        config.generator.api_key = Some("gemini_key_123".to_string());
        config
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.search.base_url, "https://serpapi.com");
        assert_eq!(config.search.timeout_seconds, 30);
        assert_eq!(config.generator.model, "gemini-2.0-flash");
        assert_eq!(config.generator.timeout_seconds, 120);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_file_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.logging.max_files, 3);
        assert!(config.search.api_key.is_none());
        assert!(config.logging.file_path.is_none());
    }

    #[test]
    fn test_config_validation_missing_api_key() {
        let config = AppConfig::default();
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SERP_API_KEY"));

        let mut config = configured();
        config.generator.api_key = Some("   ".to_string());
        let result = config.validate_api_keys();
        assert!(result.unwrap_err().to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_config_validation_valid_api_keys() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = configured();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = configured();
        config.search.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = configured();
        config.generator.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Generator base URL"));
    }

    #[test]
    fn test_legacy_env_fills_unset_values() {
        let mut config = AppConfig::default();
        config.apply_legacy_env(env(&[
            ("SERP_API_KEY", "serp_from_env"),
            ("GEMINI_API_KEY", "gemini_from_env"),
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_FILE", "/tmp/app.log"),
            ("LOG_FILE_MAX_BYTES", "2048"),
            ("LOG_FILE_BACKUP_COUNT", "7"),
        ]));

        assert_eq!(config.search.api_key.as_deref(), Some("serp_from_env"));
        assert_eq!(config.generator.api_key.as_deref(), Some("gemini_from_env"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file_path, Some(PathBuf::from("/tmp/app.log")));
        assert_eq!(config.logging.max_file_size_bytes, 2048);
        assert_eq!(config.logging.max_files, 7);
    }

    #[test]
    fn test_legacy_env_does_not_override_explicit_values() {
        let mut config = configured();
        config.logging.level = "warn".to_string();
        config.apply_legacy_env(env(&[
            ("SERP_API_KEY", "other_key"),
            ("LOG_LEVEL", "trace"),
            ("LOG_FILE_MAX_BYTES", "not-a-number"),
        ]));

        assert_eq!(config.search.api_key.as_deref(), Some("serp_key_123"));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.max_file_size_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = configured();
        config.search.base_url = String::new();
        config.generator.model = String::new();
        config.search.timeout_seconds = 0;
        config.apply_defaults();
        assert_eq!(config.search.base_url, "https://serpapi.com");
        assert_eq!(config.generator.model, "gemini-2.0-flash");
        assert_eq!(config.search.timeout_seconds, 30);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[search]
api_key = "serp_file_key"
timeout_seconds = 10

[generator]
api_key = "gemini_file_key"
model = "gemini-1.5-pro"

[server]
port = 9000

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.search.api_key.as_deref(), Some("serp_file_key"));
        assert_eq!(config.search.timeout_seconds, 10);
        assert_eq!(config.search.base_url, "https://serpapi.com");
        assert_eq!(config.generator.model, "gemini-1.5-pro");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_from_missing_explicit_path_fails() {
        let result = AppConfig::load_from_path(Some(PathBuf::from(
            "/nonexistent/smart-itinerary/config.toml",
        )));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = AppConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("smart-itinerary"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
