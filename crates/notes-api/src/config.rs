//! Server configuration loaded from environment variables.
//!
//! | Variable             | Default              |
//! |----------------------|----------------------|
//! | `DATABASE_URL`       | `sqlite://./app.db`  |
//! | `HOST`               | `0.0.0.0`            |
//! | `PORT`               | `3001`               |
//! | `DB_MAX_CONNECTIONS` | `5`                  |
//! | `ALLOWED_ORIGINS`    | unset (any origin)   |
//! | `MAX_BODY_BYTES`     | `1048576`            |
//! | `LOG_FORMAT`         | `text`               |
//! | `LOG_FILE`           | unset (stdout)       |
//! | `LOG_ANSI`           | auto                 |

use std::net::SocketAddr;
use std::str::FromStr;

use notes_core::defaults;
use notes_core::{Error, Result};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Log file path; enables daily-rotated file output instead of stdout.
    pub file: Option<String>,
    /// Force ANSI colors on or off. `None` auto-detects (always off for files).
    pub ansi: Option<bool>,
}

/// Full server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// CORS origin whitelist. `None` allows any origin without credentials.
    pub allowed_origins: Option<Vec<String>>,
    pub max_body_bytes: usize,
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            db_max_connections: defaults::DB_MAX_CONNECTIONS,
            allowed_origins: None,
            max_body_bytes: defaults::MAX_BODY_BYTES,
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let base = Self::default();

        let log = LogConfig {
            format: match get("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
            file: get("LOG_FILE"),
            ansi: get("LOG_ANSI").map(|v| v == "true" || v == "1"),
        };

        let allowed_origins = get("ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(base.database_url),
            host: get("HOST").unwrap_or(base.host),
            port: parse_var("PORT", get("PORT"), base.port)?,
            db_max_connections: parse_var(
                "DB_MAX_CONNECTIONS",
                get("DB_MAX_CONNECTIONS"),
                base.db_max_connections,
            )?,
            allowed_origins,
            max_body_bytes: parse_var("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), base.max_body_bytes)?,
            log,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address: {}", e)))
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", key, raw))),
    }
}
