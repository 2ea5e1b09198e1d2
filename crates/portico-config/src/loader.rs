//! Layered configuration loading.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, PorticoConfig};

/// Environment variable prefix for overrides, e.g. `PORTICO__LOG__LEVEL`.
const ENV_PREFIX: &str = "PORTICO";

/// Layered configuration loader.
///
/// Layers are applied in order, later layers overriding earlier ones:
/// 1. Built-in defaults
/// 2. A TOML file, if given
/// 3. `PORTICO__SECTION__KEY` environment variables, if enabled
///
/// # Example
///
/// ```no_run
/// use portico_config::ConfigLoader;
///
/// # fn main() -> Result<(), portico_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("portico.toml")?
///     .with_env()
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: PorticoConfig,
    env_enabled: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader seeded with built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PorticoConfig::default(),
            env_enabled: false,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, invalid
    /// TOML, or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.config = toml::from_str(&content)?;
        Ok(self)
    }

    /// Loads configuration from a TOML file only if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    pub fn with_toml(mut self, content: &str) -> Result<Self, ConfigError> {
        self.config = toml::from_str(content)?;
        Ok(self)
    }

    /// Enables `PORTICO__SECTION__KEY` environment variable overrides.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.env_enabled = true;
        self
    }

    /// Loads a `.env` file into the process environment, if present.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Applies any enabled overrides, validates, and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment override cannot be parsed or
    /// the final configuration fails validation.
    pub fn load(mut self) -> Result<PorticoConfig, ConfigError> {
        if self.env_enabled {
            self.apply_env_overrides()?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(ENV_PREFIX).and_then(|k| k.strip_prefix("__")) else {
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["SERVICE_NAME"] => {
                self.config.service_name = value.to_string();
            }
            ["EXPOSE_INTERNAL_ERRORS"] => {
                self.config.expose_internal_errors = parse_bool(key, value)?;
            }
            ["REQUEST_ID_HEADER"] => {
                self.config.request_id_header = value.to_lowercase();
            }

            ["LOG", "LEVEL"] => {
                self.config.log.level = value.to_string();
            }
            ["LOG", "JSON"] => {
                self.config.log.json = parse_bool(key, value)?;
            }

            ["CORS", "ENABLED"] => {
                self.config.cors.enabled = parse_bool(key, value)?;
            }
            ["CORS", "ALLOWED_ORIGINS"] => {
                self.config.cors.allowed_origins = parse_list(value);
            }
            ["CORS", "ALLOWED_METHODS"] => {
                self.config.cors.allowed_methods = parse_list(value);
            }
            ["CORS", "ALLOWED_HEADERS"] => {
                self.config.cors.allowed_headers = parse_list(value);
            }
            ["CORS", "EXPOSED_HEADERS"] => {
                self.config.cors.exposed_headers = parse_list(value);
            }
            ["CORS", "MAX_AGE_SECONDS"] => {
                self.config.cors.max_age_seconds = parse_u64(key, value)?;
            }
            ["CORS", "ALLOW_CREDENTIALS"] => {
                self.config.cors.allow_credentials = parse_bool(key, value)?;
            }

            ["RATE_LIMIT", "ENABLED"] => {
                self.config.rate_limit.enabled = parse_bool(key, value)?;
            }
            ["RATE_LIMIT", "LIMIT"] => {
                self.config.rate_limit.limit = parse_u64(key, value)?;
            }
            ["RATE_LIMIT", "WINDOW_SECONDS"] => {
                self.config.rate_limit.window_seconds = parse_u64(key, value)?;
            }
            ["RATE_LIMIT", "CLIENT_HEADER"] => {
                self.config.rate_limit.client_header = value.to_lowercase();
            }

            // Unknown keys under the prefix are ignored.
            _ => {}
        }

        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvParse {
            var: key.to_string(),
            reason: "expected boolean".to_string(),
        }),
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::EnvParse {
        var: key.to_string(),
        reason: "expected integer".to_string(),
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.service_name, "portico");
        assert!(!config.rate_limit.enabled);
    }

    #[test]
    fn test_loader_toml_string() {
        let toml = r#"
            service_name = "edge-gateway"

            [rate_limit]
            enabled = true
            limit = 20
            window_seconds = 10
        "#;

        let config = ConfigLoader::new().with_toml(toml).unwrap().load().unwrap();
        assert_eq!(config.service_name, "edge-gateway");
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.limit, 20);
        assert_eq!(config.rate_limit.window_seconds, 10);
        // Unset fields keep their defaults.
        assert_eq!(config.rate_limit.client_header, "cf-connecting-ip");
    }

    #[test]
    fn test_loader_rejects_unknown_fields() {
        let toml = r#"
            service_name = "x"
            not_a_field = true
        "#;
        assert!(ConfigLoader::new().with_toml(toml).is_err());
    }

    #[test]
    fn test_loader_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/portico.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/portico.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.service_name, "portico");
    }

    #[test]
    fn test_loader_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
                [cors]
                allowed_origins = ["https://app.example.com"]
                allow_credentials = true
            "#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://app.example.com".to_string()]
        );
        assert!(config.cors.allow_credentials);
    }

    #[test]
    fn test_loader_validates_on_load() {
        let toml = r#"
            [rate_limit]
            enabled = true
            limit = 0
        "#;
        let result = ConfigLoader::new().with_toml(toml).unwrap().load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    // Environment overrides are tested through apply_env_var directly since
    // mutating the process environment races with parallel tests.

    #[test]
    fn test_apply_env_var_scalar() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("PORTICO__SERVICE_NAME", "edge-gateway")
            .unwrap();
        loader.apply_env_var("PORTICO__LOG__LEVEL", "debug").unwrap();
        assert_eq!(loader.config.service_name, "edge-gateway");
        assert_eq!(loader.config.log.level, "debug");
    }

    #[test]
    fn test_apply_env_var_list() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var(
                "PORTICO__CORS__ALLOWED_ORIGINS",
                "https://a.example.com, https://b.example.com",
            )
            .unwrap();
        assert_eq!(
            loader.config.cors.allowed_origins,
            vec![
                "https://a.example.com".to_string(),
                "https://b.example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_apply_env_var_integer() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("PORTICO__RATE_LIMIT__LIMIT", "250")
            .unwrap();
        assert_eq!(loader.config.rate_limit.limit, 250);
    }

    #[test]
    fn test_apply_env_var_invalid_integer() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("PORTICO__RATE_LIMIT__LIMIT", "plenty");
        assert!(matches!(result, Err(ConfigError::EnvParse { .. })));
    }

    #[test]
    fn test_apply_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("PORTICO__NO_SUCH__KEY", "1").unwrap();
        assert_eq!(loader.config, PorticoConfig::default());
    }

    #[test]
    fn test_header_names_lowercased() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("PORTICO__REQUEST_ID_HEADER", "X-Trace-Id")
            .unwrap();
        assert_eq!(loader.config.request_id_header, "x-trace-id");
    }
}
