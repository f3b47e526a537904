//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Log line format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Document store connection string
    pub store_uri: String,
    /// Response cache TTL in seconds
    pub cache_ttl: u64,
    /// Maximum number of cached responses
    pub cache_max_entries: usize,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    pub default_page_limit: u64,
    pub max_page_limit: u64,
    /// Request body cap in bytes
    pub max_body_bytes: usize,
    pub log_format: LogFormat,
    /// Directory for `combined.log` and `error.log`; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 5002)
    /// - `STORE_URI` - Document store connection string (default: memory://)
    /// - `CACHE_TTL` - Response cache TTL in seconds (default: 60)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached responses (default: 1000)
    /// - `CLEANUP_INTERVAL` - Cache sweep frequency in seconds (default: 1)
    /// - `DEFAULT_PAGE_LIMIT` - List page size when none is given (default: 10)
    /// - `MAX_PAGE_LIMIT` - Largest accepted list page size (default: 100)
    /// - `MAX_BODY_BYTES` - Request body cap (default: 10 MiB)
    /// - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
    /// - `LOG_DIR` - Directory for file logs (default: unset, console only)
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("PORT", defaults.server_port),
            store_uri: env::var("STORE_URI")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.store_uri),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            default_page_limit: env_or("DEFAULT_PAGE_LIMIT", defaults.default_page_limit),
            max_page_limit: env_or("MAX_PAGE_LIMIT", defaults.max_page_limit),
            max_body_bytes: env_or("MAX_BODY_BYTES", defaults.max_body_bytes),
            log_format: env_or("LOG_FORMAT", defaults.log_format),
            log_dir: env::var("LOG_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5002,
            store_uri: "memory://".to_string(),
            cache_ttl: 60,
            cache_max_entries: 1000,
            cleanup_interval: 1,
            default_page_limit: 10,
            max_page_limit: 100,
            max_body_bytes: 10 * 1024 * 1024,
            log_format: LogFormat::Pretty,
            log_dir: None,
        }
    }
}
