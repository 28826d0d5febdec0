//! Configuration for the Pet Connect service.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::errors::{AppError, AppResult};

/// Environment variable holding the HTTP port.
pub const ENV_PORT: &str = "PET_CONNECT_PORT";
/// Environment variable holding the `SQLite` database path.
pub const ENV_DB: &str = "PET_CONNECT_DB";
/// Environment variable holding the chat reply delay in milliseconds.
pub const ENV_REPLY_DELAY_MS: &str = "PET_CONNECT_REPLY_DELAY_MS";
/// Environment variable holding the live chat session capacity.
pub const ENV_SESSION_CAPACITY: &str = "PET_CONNECT_SESSION_CAPACITY";

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Chat widget settings.
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    ///
    /// Missing or unparsable values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                port: load_or(&lookup, ENV_PORT, defaults.server.port),
            },
            storage: StorageConfig {
                sqlite_path: lookup(ENV_DB)
                    .filter(|path| !path.trim().is_empty())
                    .map_or(defaults.storage.sqlite_path, PathBuf::from),
            },
            chat: ChatConfig {
                reply_delay_ms: load_or(&lookup, ENV_REPLY_DELAY_MS, defaults.chat.reply_delay_ms),
                session_capacity: load_or(
                    &lookup,
                    ENV_SESSION_CAPACITY,
                    defaults.chat.session_capacity,
                ),
            },
        }
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::InvalidConfig("server.port must be > 0".to_string()));
        }

        if self.storage.sqlite_path.as_os_str().is_empty() {
            return Err(AppError::InvalidConfig(
                "storage.sqlite_path must not be empty".to_string(),
            ));
        }

        if self.chat.session_capacity == 0 {
            return Err(AppError::InvalidConfig(
                "chat.session_capacity must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Storage settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` database path.
    pub sqlite_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("pet_connect.db"),
        }
    }
}

/// Chat widget settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Delay before a bot reply is appended to the transcript.
    pub reply_delay_ms: u64,
    /// Maximum number of live sessions kept in memory.
    pub session_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
            session_capacity: 1024,
        }
    }
}

fn load_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(err) => {
            warn!("Invalid {key} value {raw:?}: {err}, using default: {default}");
            default
        }
    }
}
