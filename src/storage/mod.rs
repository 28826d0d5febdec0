//! Shared `SQLite` database handle and schema bootstrap.
//!
//! All stores share one `tokio_rusqlite::Connection`, which serializes calls
//! on a dedicated thread. Timestamps are stored as Unix milliseconds and
//! identifiers as hyphenated UUID text.

use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use tokio_rusqlite::Connection;
use tracing::info;

use crate::core::config::StorageConfig;
use crate::core::errors::{AppError, AppResult};

/// Table holding chat widget FAQ entries.
pub const FAQ_TABLE: &str = "chatbot_faqs";
/// Table holding pets listed for adoption.
pub const PET_TABLE: &str = "pets";
/// Table holding adoption applications.
pub const APPLICATION_TABLE: &str = "adoption_applications";
/// Table holding user profiles.
pub const PROFILE_TABLE: &str = "profiles";

/// Shared database handle.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file and apply the schema.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn open(config: &StorageConfig) -> AppResult<Self> {
        let conn = Connection::open(&config.sqlite_path).await?;
        info!(path = %config.sqlite_path.display(), "Opened sqlite database");
        Self::with_connection(conn).await
    }

    /// Open a private in-memory database with the schema applied.
    ///
    /// # Errors
    /// Returns an error if the database cannot be created.
    pub async fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.call(|conn| {
            conn.execute_batch(&format!(
                "PRAGMA foreign_keys = ON;
                CREATE TABLE IF NOT EXISTS {PROFILE_TABLE} (
                    id TEXT PRIMARY KEY,
                    full_name TEXT,
                    avatar_url TEXT,
                    phone TEXT,
                    address TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS {PET_TABLE} (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    species TEXT NOT NULL,
                    breed TEXT,
                    age INTEGER,
                    size TEXT,
                    gender TEXT,
                    description TEXT,
                    health_status TEXT,
                    is_adopted INTEGER NOT NULL DEFAULT 0,
                    reported_by TEXT REFERENCES {PROFILE_TABLE} (id),
                    image_url TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_{PET_TABLE}_created
                    ON {PET_TABLE} (created_at);
                CREATE INDEX IF NOT EXISTS idx_{PET_TABLE}_reported_by
                    ON {PET_TABLE} (reported_by);
                CREATE TABLE IF NOT EXISTS {APPLICATION_TABLE} (
                    id TEXT PRIMARY KEY,
                    pet_id TEXT NOT NULL REFERENCES {PET_TABLE} (id),
                    user_id TEXT NOT NULL,
                    status TEXT NOT NULL,
                    reason TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    UNIQUE (pet_id, user_id)
                );
                CREATE INDEX IF NOT EXISTS idx_{APPLICATION_TABLE}_user
                    ON {APPLICATION_TABLE} (user_id, created_at);
                CREATE TABLE IF NOT EXISTS {FAQ_TABLE} (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    id TEXT NOT NULL UNIQUE,
                    question TEXT NOT NULL,
                    answer TEXT NOT NULL,
                    category TEXT,
                    created_at INTEGER NOT NULL
                );"
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Borrow the underlying connection.
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Decode a stored millisecond timestamp.
pub(crate) fn timestamp_from_millis(ms: i64) -> AppResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| AppError::CorruptRecord(format!("invalid timestamp {ms}")))
}

/// Decode a stored text column through `FromStr`.
pub(crate) fn parse_column<T>(column: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|err| AppError::CorruptRecord(format!("invalid {column} {raw:?}: {err}")))
}
