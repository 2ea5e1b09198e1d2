//! Configuration schema types.

use http::Method;
use portico_cors::CorsPolicy;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level Portico configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PorticoConfig {
    /// Service name used in log fields.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Whether 500 responses include internal error detail. Development only.
    #[serde(default)]
    pub expose_internal_errors: bool,

    /// Header from which an upstream request ID is propagated.
    #[serde(default = "default_request_id_header")]
    pub request_id_header: String,

    /// Logging section.
    #[serde(default)]
    pub log: LogSettings,

    /// CORS section.
    #[serde(default)]
    pub cors: CorsSettings,

    /// Rate limiting section.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

impl Default for PorticoConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            expose_internal_errors: false,
            request_id_header: default_request_id_header(),
            log: LogSettings::default(),
            cors: CorsSettings::default(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl PorticoConfig {
    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_id_header.trim().is_empty() {
            return Err(ConfigError::invalid(
                "request_id_header",
                "must not be empty",
            ));
        }
        self.cors.validate()?;
        self.rate_limit.validate()
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    /// Log level filter (e.g. "info", "debug", "portico=debug,warn").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted lines instead of human-readable ones.
    #[serde(default = "default_true")]
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: true,
        }
    }
}

/// CORS settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CorsSettings {
    /// Whether CORS handling is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed origins. `*` anywhere in the list makes the policy wildcard.
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,

    /// Allowed methods as strings, validated and parsed at load time.
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed request headers.
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,

    /// Response headers exposed to browser scripts.
    #[serde(default)]
    pub exposed_headers: Vec<String>,

    /// Preflight cache lifetime in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,

    /// Whether credentials may be advertised. Invalid with a `*` origin.
    #[serde(default)]
    pub allow_credentials: bool,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: default_origins(),
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            exposed_headers: Vec::new(),
            max_age_seconds: default_max_age(),
            allow_credentials: false,
        }
    }
}

impl CorsSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if self.allow_credentials && self.allowed_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::invalid(
                "cors.allow_credentials",
                "cannot be combined with a wildcard origin",
            ));
        }
        for method in &self.allowed_methods {
            parse_method(method)?;
        }
        Ok(())
    }

    /// Builds the runtime [`CorsPolicy`], or `None` when disabled.
    pub fn to_policy(&self) -> Result<Option<CorsPolicy>, ConfigError> {
        if !self.enabled {
            return Ok(None);
        }
        let mut methods = Vec::with_capacity(self.allowed_methods.len());
        for method in &self.allowed_methods {
            methods.push(parse_method(method)?);
        }
        let mut builder = CorsPolicy::builder()
            .allow_methods(methods)
            .allow_headers(self.allowed_headers.iter().cloned())
            .expose_headers(self.exposed_headers.iter().cloned())
            .max_age_seconds(self.max_age_seconds)
            .allow_credentials(self.allow_credentials);
        for origin in &self.allowed_origins {
            builder = builder.allow_origin(origin.clone());
        }
        builder
            .build()
            .map(Some)
            .map_err(|e| ConfigError::invalid("cors", e.to_string()))
    }
}

fn parse_method(method: &str) -> Result<Method, ConfigError> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| ConfigError::invalid("cors.allowed_methods", format!("unknown method {method}")))
}

/// Rate limiting settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RateLimitSettings {
    /// Whether the rate limit gate runs at all.
    #[serde(default)]
    pub enabled: bool,

    /// Maximum requests per client per window.
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Window length in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: u64,

    /// Trusted header carrying the client identifier.
    #[serde(default = "default_client_header")]
    pub client_header: String,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: default_limit(),
            window_seconds: default_window(),
            client_header: default_client_header(),
        }
    }
}

impl RateLimitSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if self.limit == 0 {
            return Err(ConfigError::invalid("rate_limit.limit", "must be positive"));
        }
        if self.window_seconds == 0 {
            return Err(ConfigError::invalid(
                "rate_limit.window_seconds",
                "must be positive",
            ));
        }
        if self.client_header.trim().is_empty() {
            return Err(ConfigError::invalid(
                "rate_limit.client_header",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

fn default_service_name() -> String {
    "portico".to_string()
}

fn default_request_id_header() -> String {
    "x-request-id".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_headers() -> Vec<String> {
    vec!["content-type".to_string(), "authorization".to_string()]
}

fn default_max_age() -> u64 {
    86_400
}

fn default_limit() -> u64 {
    100
}

fn default_window() -> u64 {
    60
}

fn default_client_header() -> String {
    "cf-connecting-ip".to_string()
}
