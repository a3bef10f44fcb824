//! Service configuration.

use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::crypto::{SigningSecret, DEFAULT_WEBHOOK_SECRET};

const CONFIG_FILE: &str = "inlet.toml";

/// Free-form string settings read from the environment without parsing.
const VERBATIM_KEYS: &[&str] = &["database_url", "host", "webhook_secret", "rust_log"];

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable output for local development
    Pretty,
}

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`inlet.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// Callers load a `.env` file into the environment first if they want one.
///
/// # Example
///
/// ```no_run
/// use inlet_api::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
///
/// println!("Server will bind to {}:{}", config.host, config.port);
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    // Database
    /// SQLite connection URL.
    ///
    /// Environment variable: `DATABASE_URL`
    #[serde(default = "default_database_url", alias = "DATABASE_URL")]
    pub database_url: String,
    /// Maximum number of database connections in the pool.
    ///
    /// Environment variable: `DATABASE_MAX_CONNECTIONS`
    #[serde(default = "default_max_connections", alias = "DATABASE_MAX_CONNECTIONS")]
    pub database_max_connections: u32,
    /// Database connection acquire timeout in seconds.
    ///
    /// Environment variable: `DATABASE_CONNECTION_TIMEOUT`
    #[serde(default = "default_acquire_timeout", alias = "DATABASE_CONNECTION_TIMEOUT")]
    pub database_connection_timeout: u64,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Ingestion
    /// Shared secret for delivery signatures.
    ///
    /// Environment variable: `WEBHOOK_SECRET`
    #[serde(default = "default_webhook_secret", alias = "WEBHOOK_SECRET")]
    pub webhook_secret: String,

    // Logging
    /// Log filter directives.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[serde(default, alias = "LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from defaults, config file, and environment variable
    /// overrides, then validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if a value fails to parse or validation fails.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("").ignore(VERBATIM_KEYS));

        // Env values are otherwise parsed, which turns a secret like `123456`
        // into a number or `0042` into 42.
        for (key, value) in Env::raw().only(VERBATIM_KEYS).iter() {
            figment = figment.merge(Serialized::default(key.as_str(), value));
        }

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse server socket address from host and port configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form a socket address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Pool acquire timeout.
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.database_connection_timeout)
    }

    /// Whether the webhook secret was set to something other than the
    /// built-in default.
    pub fn secret_configured(&self) -> bool {
        self.signing_secret().is_configured()
    }

    /// The webhook secret as a signing key.
    pub fn signing_secret(&self) -> SigningSecret {
        SigningSecret::new(self.webhook_secret.clone())
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.database_max_connections == 0 {
            anyhow::bail!("database max_connections must be greater than 0");
        }

        if self.database_connection_timeout == 0 {
            anyhow::bail!("database_connection_timeout must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("database_connection_timeout", &self.database_connection_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("webhook_secret", &"<redacted>")
            .field("rust_log", &self.rust_log)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            database_max_connections: default_max_connections(),
            database_connection_timeout: default_acquire_timeout(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            webhook_secret: default_webhook_secret(),
            rust_log: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://app.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_webhook_secret() -> String {
    DEFAULT_WEBHOOK_SECRET.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
