use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Database connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Applied as the connection's `search_path`.
    pub schema: String,
    pub max_connections: u32,
    /// Connections idle for longer are closed on their next acquire.
    pub idle_timeout: Duration,
    /// Connections older than this are closed on their next acquire.
    pub max_lifetime: Duration,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default     |
    /// |---------------------------|-------------|
    /// | `DB_HOST`                 | `localhost` |
    /// | `DB_PORT`                 | `5432`      |
    /// | `DB_USERNAME`             | `postgres`  |
    /// | `DB_PASSWORD`             | (empty)     |
    /// | `DB_DATABASE`             | `devices`   |
    /// | `DB_SCHEMA`               | `public`    |
    /// | `DB_MAX_CONNECTIONS`      | `20`        |
    /// | `DB_IDLE_TIMEOUT_SECS`    | `600`       |
    /// | `DB_MAX_LIFETIME_SECS`    | `1800`      |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`         |
    pub fn from_env() -> Self {
        Self {
            host: env_or("DB_HOST", "localhost"),
            port: env_or("DB_PORT", "5432")
                .parse()
                .expect("DB_PORT must be a valid u16"),
            username: env_or("DB_USERNAME", "postgres"),
            password: env_or("DB_PASSWORD", ""),
            database: env_or("DB_DATABASE", "devices"),
            schema: env_or("DB_SCHEMA", "public"),
            max_connections: env_or("DB_MAX_CONNECTIONS", "20")
                .parse()
                .expect("DB_MAX_CONNECTIONS must be a valid u32"),
            idle_timeout: Duration::from_secs(
                env_or("DB_IDLE_TIMEOUT_SECS", "600")
                    .parse()
                    .expect("DB_IDLE_TIMEOUT_SECS must be a valid u64"),
            ),
            max_lifetime: Duration::from_secs(
                env_or("DB_MAX_LIFETIME_SECS", "1800")
                    .parse()
                    .expect("DB_MAX_LIFETIME_SECS must be a valid u64"),
            ),
            acquire_timeout: Duration::from_secs(
                env_or("DB_ACQUIRE_TIMEOUT_SECS", "5")
                    .parse()
                    .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64"),
            ),
        }
    }

    /// Build driver connect options. SSL is disabled.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(PgSslMode::Disable)
            .options([("search_path", self.schema.as_str())])
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
