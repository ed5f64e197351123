use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderValue;

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (`*`). The API carries no credentials, so this is the default.
    Any,
    /// Exactly these origins.
    List(Vec<HeaderValue>),
}

/// A malformed server setting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub cors_origins: CorsOrigins,
    /// Upper bound for a single request, answered with 408 when exceeded.
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `1323`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    ///
    /// `CORS_ORIGINS` is a comma-separated list; `*` allows any origin.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let setting = |key: &'static str, default: &str| {
            let raw = lookup(key).unwrap_or_else(|| default.to_string());
            (key, raw)
        };

        let host: IpAddr = parse(setting("HOST", "0.0.0.0"))?;
        let port: u16 = parse(setting("PORT", "1323"))?;
        let timeout_secs: u64 = parse(setting("REQUEST_TIMEOUT_SECS", "30"))?;
        let cors_origins = parse_origins(setting("CORS_ORIGINS", "*"))?;

        Ok(Self {
            addr: SocketAddr::new(host, port),
            cors_origins,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse<T: std::str::FromStr>((key, value): (&'static str, String)) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_origins((key, value): (&'static str, String)) -> Result<CorsOrigins, ConfigError> {
    let entries: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() || entries.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }

    entries
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                key,
                value: origin.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}
