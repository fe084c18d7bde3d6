//! Database connection settings read from the environment.
//!
//! | variable       | default     |
//! |----------------|-------------|
//! | `DB_HOST`      | `localhost` |
//! | `DB_PORT`      | `5432`      |
//! | `DB_USER`      | `postgres`  |
//! | `DB_PASSWORD`  | `postgres`  |
//! | `DB_NAME`      | `gtd`       |
//! | `DB_SSL_MODE`  | `disable`   |
//! | `DB_POOL_SIZE` | `10`        |

use std::fmt;
use thiserror::Error;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_USER: &str = "postgres";
const DEFAULT_PASSWORD: &str = "postgres";
const DEFAULT_DATABASE: &str = "gtd";
const DEFAULT_SSL_MODE: &str = "disable";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Errors returned while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("invalid value '{value}' for {key}, expected a positive integer")]
    InvalidNumber {
        /// Variable name.
        key: &'static str,
        /// Raw value found.
        value: String,
    },
}

/// `PostgreSQL` connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    host: String,
    port: u16,
    user: String,
    password: String,
    database: String,
    ssl_mode: String,
    pool_size: u32,
}

impl DatabaseConfig {
    /// Reads settings from the process environment, applying defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] when `DB_PORT` or
    /// `DB_POOL_SIZE` is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, applying defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] when `DB_PORT` or
    /// `DB_POOL_SIZE` is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        Ok(Self {
            host: text("DB_HOST", DEFAULT_HOST),
            port: parse_positive(&lookup, "DB_PORT", DEFAULT_PORT)?,
            user: text("DB_USER", DEFAULT_USER),
            password: text("DB_PASSWORD", DEFAULT_PASSWORD),
            database: text("DB_NAME", DEFAULT_DATABASE),
            ssl_mode: text("DB_SSL_MODE", DEFAULT_SSL_MODE),
            pool_size: parse_positive(&lookup, "DB_POOL_SIZE", DEFAULT_POOL_SIZE)?,
        })
    }

    /// Returns the database host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the database port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the database user.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the database name.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the `sslmode` connection parameter.
    #[must_use]
    pub fn ssl_mode(&self) -> &str {
        &self.ssl_mode
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Renders a `postgres://` connection URL.
    #[must_use]
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.database, self.ssl_mode
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

fn parse_positive<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialEq + From<u8>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::from(0) => Ok(value),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}
