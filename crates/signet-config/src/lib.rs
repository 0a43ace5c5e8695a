//! Configuration management for signet.
//!
//! Parses `signet.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "signet.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the debug-endpoints flag.
    pub debug_endpoints: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// OAuth provider configuration.
    pub oauth: OAuthConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// OAuth provider configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Advisory realm echoed in `WWW-Authenticate` responses.
    pub realm: String,
    /// Scheme used to rebuild signed URLs ("http" or "https"). Set to
    /// "https" when terminating TLS in front of the provider.
    pub scheme: String,
    /// Replay guard ring capacity. Size generously relative to expected
    /// request rate times the freshness window.
    pub nonce_capacity: usize,
    /// Timestamp freshness window in seconds.
    pub timestamp_window_secs: u64,
    /// Expose the debug registration and echo endpoints.
    pub debug_endpoints: bool,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            realm: String::new(),
            scheme: "http".to_owned(),
            nonce_capacity: 20_000,
            timestamp_window_secs: 300,
            debug_endpoints: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `signet.toml` in the current directory and
    /// parents, falling back to defaults when none exists.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(debug_endpoints) = settings.debug_endpoints {
            self.oauth.debug_endpoints = debug_endpoints;
        }
    }

    /// Search for a config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::Validation(
                "server.host cannot be empty".to_owned(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be greater than zero".to_owned(),
            ));
        }
        if self.oauth.nonce_capacity == 0 {
            return Err(ConfigError::Validation(
                "oauth.nonce_capacity must be greater than zero".to_owned(),
            ));
        }
        if self.oauth.timestamp_window_secs == 0 {
            return Err(ConfigError::Validation(
                "oauth.timestamp_window_secs must be greater than zero".to_owned(),
            ));
        }
        if !matches!(self.oauth.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "oauth.scheme must be http or https, got {:?}",
                self.oauth.scheme
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.oauth.scheme, "http");
        assert_eq!(config.oauth.nonce_capacity, 20_000);
        assert_eq!(config.oauth.timestamp_window_secs, 300);
        assert!(!config.oauth.debug_endpoints);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [oauth]
            realm = "https://provider.example.com"
            scheme = "https"
            nonce_capacity = 50000
            timestamp_window_secs = 120
            debug_endpoints = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.oauth.realm, "https://provider.example.com");
        assert_eq!(config.oauth.scheme, "https");
        assert_eq!(config.oauth.nonce_capacity, 50_000);
        assert_eq!(config.oauth.timestamp_window_secs, 120);
        assert!(config.oauth.debug_endpoints);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.oauth.nonce_capacity, 20_000);
    }

    #[test]
    fn test_cli_settings_override() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9999),
            debug_endpoints: Some(true),
        });

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9999);
        assert!(config.oauth.debug_endpoints);
    }

    #[test]
    fn test_cli_settings_none_fields_do_not_override() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.oauth.nonce_capacity = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = Config::default();
        config.oauth.timestamp_window_secs = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_scheme() {
        let mut config = Config::default();
        config.oauth.scheme = "ftp".to_owned();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/signet.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
