//! User profiles.

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;

use crate::catalog::StoreFuture;
use crate::core::errors::AppResult;
use crate::core::ids::UserId;
use crate::storage::{Database, PROFILE_TABLE, timestamp_from_millis};

/// Name given to profiles created implicitly.
pub const DEFAULT_PROFILE_NAME: &str = "User";

/// Public profile of a registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity-provider user id.
    pub id: UserId,
    /// Display name.
    pub full_name: Option<String>,
    /// Avatar picture URL.
    pub avatar_url: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Profile store trait.
pub trait ProfileStore: Send + Sync {
    /// Get a profile by user id.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn get(&self, id: UserId) -> StoreFuture<'_, AppResult<Option<Profile>>>;

    /// Create the profile if missing and return the stored one.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn ensure(&self, id: UserId, full_name: &str) -> StoreFuture<'_, AppResult<Profile>>;
}

/// `SQLite` implementation of the profile store.
pub struct SqliteProfileStore {
    conn: Connection,
}

impl SqliteProfileStore {
    /// Build a store on the shared database.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            conn: db.conn().clone(),
        }
    }
}

type RawProfile = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    i64,
    i64,
);

fn into_profile(id: UserId, raw: RawProfile) -> AppResult<Profile> {
    let (full_name, avatar_url, phone, address, created_at, updated_at) = raw;
    Ok(Profile {
        id,
        full_name,
        avatar_url,
        phone,
        address,
        created_at: timestamp_from_millis(created_at)?,
        updated_at: timestamp_from_millis(updated_at)?,
    })
}

fn select_profile(
    conn: &rusqlite::Connection,
    id: &str,
) -> rusqlite::Result<Option<RawProfile>> {
    conn.query_row(
        &format!(
            "SELECT full_name, avatar_url, phone, address, created_at, updated_at
             FROM {PROFILE_TABLE} WHERE id = ?1"
        ),
        rusqlite::params![id],
        |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        },
    )
    .optional()
}

/// Insert a profile row unless one exists. Returns whether a row was created.
pub(crate) fn insert_profile_if_missing(
    conn: &rusqlite::Connection,
    id: &str,
    full_name: &str,
    now_ms: i64,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        &format!(
            "INSERT OR IGNORE INTO {PROFILE_TABLE} (id, full_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)"
        ),
        rusqlite::params![id, full_name, now_ms],
    )?;
    Ok(inserted > 0)
}

impl ProfileStore for SqliteProfileStore {
    fn get(&self, id: UserId) -> StoreFuture<'_, AppResult<Option<Profile>>> {
        Box::pin(async move {
            let key = id.to_string();
            let raw = self
                .conn
                .call(move |conn| Ok(select_profile(conn, &key)?))
                .await?;
            raw.map(|raw| into_profile(id, raw)).transpose()
        })
    }

    fn ensure(&self, id: UserId, full_name: &str) -> StoreFuture<'_, AppResult<Profile>> {
        let full_name = full_name.to_string();
        Box::pin(async move {
            let key = id.to_string();
            let now_ms = Utc::now().timestamp_millis();
            let raw = self
                .conn
                .call(move |conn| {
                    insert_profile_if_missing(conn, &key, &full_name, now_ms)?;
                    let raw = select_profile(conn, &key)?;
                    raw.ok_or(tokio_rusqlite::Error::Rusqlite(
                        rusqlite::Error::QueryReturnedNoRows,
                    ))
                })
                .await?;
            into_profile(id, raw)
        })
    }
}
