//! Typed configuration for the Portico dispatch core.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `PORTICO_`-prefixed environment variables, each layer overriding the
//! one before it. Loading ends with validation, so an invalid combination
//! (wildcard CORS origin with credentials, a zero-length rate limit window)
//! fails at startup instead of surfacing per request.
//!
//! # Example
//!
//! ```no_run
//! use portico_config::ConfigLoader;
//!
//! # fn main() -> Result<(), portico_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("portico.toml")?
//!     .with_env()
//!     .load()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{CorsSettings, LogSettings, PorticoConfig, RateLimitSettings};
