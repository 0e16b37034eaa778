//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve the notes database path and logging settings.
//!
//! # Invariants
//! - Resolution is pure over a key lookup; `from_env` only binds it to the
//!   process environment.
//! - Blank values are treated as unset.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "QUICKSNAP_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "QUICKSNAP_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "QUICKSNAP_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "quicksnap.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_ENV}: {message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_ENV} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by every entry point of the notes core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Normalized log level.
    pub log_level: &'static str,
    /// Log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup` (key -> raw value).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let db_path = value(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let log_level = match value(LOG_LEVEL_ENV) {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = value(LOG_DIR_ENV).map(PathBuf::from);
        if let Some(dir) = log_dir.as_ref().filter(|dir| !dir.is_absolute()) {
            return Err(ConfigError::RelativeLogDir(dir.clone()));
        }

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

/// Database file used when `QUICKSNAP_DB_PATH` is unset.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
