//! Process configuration.
//!
//! # Responsibility
//! - Read settings from environment variables (or any lookup function).
//! - Select the runtime or test database by `ZENTASK_ENV`.
//!
//! # Invariants
//! - A config with an empty token secret is never constructed.
//! - Log level is normalized to one of `trace|debug|info|warn|error`.

use crate::db::DatabaseTarget;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_ENVIRONMENT: &str = "ZENTASK_ENV";
pub const ENV_DATABASE_URL: &str = "ZENTASK_DATABASE_URL";
pub const ENV_DATABASE_URL_TEST: &str = "ZENTASK_DATABASE_URL_TEST";
pub const ENV_JWT_SECRET: &str = "ZENTASK_JWT_SECRET";
pub const ENV_BIND_ADDR: &str = "ZENTASK_BIND_ADDR";
pub const ENV_LOG_LEVEL: &str = "ZENTASK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ZENTASK_LOG_DIR";

const DEFAULT_DATABASE_URL: &str = "zentask.sqlite3";
const DEFAULT_TEST_DATABASE_URL: &str = ":memory:";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Runtime,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "runtime" | "production" | "development" => Some(Self::Runtime),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::Invalid { key, message } => write!(f, "invalid setting `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseTarget,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub log_level: &'static str,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment = match get(ENV_ENVIRONMENT) {
            Some(raw) => Environment::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                key: ENV_ENVIRONMENT,
                message: format!("`{raw}`; expected runtime|test"),
            })?,
            None => Environment::Runtime,
        };

        let (db_key, db_default) = match environment {
            Environment::Runtime => (ENV_DATABASE_URL, DEFAULT_DATABASE_URL),
            Environment::Test => (ENV_DATABASE_URL_TEST, DEFAULT_TEST_DATABASE_URL),
        };
        let db_url = get(db_key).unwrap_or_else(|| db_default.to_string());
        let database = DatabaseTarget::parse(&db_url)
            .map_err(|message| ConfigError::Invalid { key: db_key, message })?;

        let jwt_secret = get(ENV_JWT_SECRET).ok_or(ConfigError::Missing(ENV_JWT_SECRET))?;

        let log_level = match get(ENV_LOG_LEVEL) {
            Some(raw) => normalize_level(&raw).map_err(|message| ConfigError::Invalid {
                key: ENV_LOG_LEVEL,
                message,
            })?,
            None => default_log_level(),
        };

        let log_dir = match get(ENV_LOG_DIR) {
            Some(raw) => {
                let path = PathBuf::from(&raw);
                if !path.is_absolute() {
                    return Err(ConfigError::Invalid {
                        key: ENV_LOG_DIR,
                        message: format!("must be an absolute path, got `{raw}`"),
                    });
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            environment,
            database,
            jwt_secret,
            bind_addr: get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            log_level,
            log_dir,
        })
    }
}
