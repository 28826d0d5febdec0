//! Adoption application storage.

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use tracing::info;

use crate::catalog::StoreFuture;
use crate::catalog::application::AdoptionApplication;
use crate::catalog::pet_store::{RawPet, pet_columns};
use crate::core::errors::{AppError, AppResult};
use crate::core::ids::{PetId, UserId};
use crate::storage::{
    APPLICATION_TABLE, Database, PET_TABLE, parse_column, timestamp_from_millis,
};

/// Application store trait.
pub trait ApplicationStore: Send + Sync {
    /// Submit a pending application.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown pet, `InvalidInput` if it was already
    /// adopted, `DuplicateApplication` if the user already applied for it, or
    /// a storage error.
    fn submit(
        &self,
        user_id: UserId,
        pet_id: PetId,
        reason: Option<String>,
    ) -> StoreFuture<'_, AppResult<AdoptionApplication>>;

    /// A user's applications with their pets attached, newest first.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn list_for_user(&self, user_id: UserId)
    -> StoreFuture<'_, AppResult<Vec<AdoptionApplication>>>;
}

enum SubmitOutcome {
    Inserted,
    UnknownPet,
    AlreadyAdopted,
    Duplicate,
}

/// `SQLite` implementation of the application store.
pub struct SqliteApplicationStore {
    conn: Connection,
}

impl SqliteApplicationStore {
    /// Build a store on the shared database.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            conn: db.conn().clone(),
        }
    }
}

impl ApplicationStore for SqliteApplicationStore {
    fn submit(
        &self,
        user_id: UserId,
        pet_id: PetId,
        reason: Option<String>,
    ) -> StoreFuture<'_, AppResult<AdoptionApplication>> {
        Box::pin(async move {
            let application = AdoptionApplication::pending(user_id, pet_id, reason);
            let row = application.clone();

            let outcome = self
                .conn
                .call(move |conn| {
                    let tx = conn.transaction()?;
                    let pet_key = row.pet_id.to_string();
                    let user_key = row.user_id.to_string();

                    let adopted: Option<bool> = tx
                        .query_row(
                            &format!("SELECT is_adopted FROM {PET_TABLE} WHERE id = ?1"),
                            rusqlite::params![pet_key],
                            |r| r.get(0),
                        )
                        .optional()?;
                    match adopted {
                        None => return Ok(SubmitOutcome::UnknownPet),
                        Some(true) => return Ok(SubmitOutcome::AlreadyAdopted),
                        Some(false) => {}
                    }

                    let existing: i64 = tx.query_row(
                        &format!(
                            "SELECT COUNT(*) FROM {APPLICATION_TABLE}
                             WHERE pet_id = ?1 AND user_id = ?2"
                        ),
                        rusqlite::params![pet_key, user_key],
                        |r| r.get(0),
                    )?;
                    if existing > 0 {
                        return Ok(SubmitOutcome::Duplicate);
                    }

                    tx.execute(
                        &format!(
                            "INSERT INTO {APPLICATION_TABLE}
                            (id, pet_id, user_id, status, reason, created_at, updated_at)
                            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                        ),
                        rusqlite::params![
                            row.id.to_string(),
                            pet_key,
                            user_key,
                            row.status.as_str(),
                            row.reason,
                            row.created_at.timestamp_millis(),
                            row.updated_at.timestamp_millis()
                        ],
                    )?;
                    tx.commit()?;
                    Ok(SubmitOutcome::Inserted)
                })
                .await?;

            match outcome {
                SubmitOutcome::Inserted => {
                    info!(
                        application = %application.id,
                        pet = %pet_id,
                        user = %user_id,
                        "Adoption application submitted"
                    );
                    Ok(application)
                }
                SubmitOutcome::UnknownPet => Err(AppError::NotFound(format!("pet {pet_id}"))),
                SubmitOutcome::AlreadyAdopted => Err(AppError::InvalidInput(format!(
                    "pet {pet_id} has already been adopted"
                ))),
                SubmitOutcome::Duplicate => Err(AppError::DuplicateApplication),
            }
        })
    }

    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> StoreFuture<'_, AppResult<Vec<AdoptionApplication>>> {
        Box::pin(async move {
            let user_key = user_id.to_string();
            let rows = self
                .conn
                .call(move |conn| {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT a.id, a.pet_id, a.status, a.reason, a.created_at, a.updated_at, {}
                         FROM {APPLICATION_TABLE} a
                         JOIN {PET_TABLE} p ON p.id = a.pet_id
                         WHERE a.user_id = ?1
                         ORDER BY a.created_at DESC, a.rowid DESC",
                        pet_columns("p")
                    ))?;
                    let rows = stmt
                        .query_map(rusqlite::params![user_key], |row| {
                            let id: String = row.get(0)?;
                            let pet_id: String = row.get(1)?;
                            let status: String = row.get(2)?;
                            let reason: Option<String> = row.get(3)?;
                            let created_at: i64 = row.get(4)?;
                            let updated_at: i64 = row.get(5)?;
                            let pet = RawPet::from_row(row, 6)?;
                            Ok((id, pet_id, status, reason, created_at, updated_at, pet))
                        })?
                        .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                    Ok(rows)
                })
                .await?;

            let mut applications = Vec::with_capacity(rows.len());
            for (id, pet_id, status, reason, created_at, updated_at, pet) in rows {
                applications.push(AdoptionApplication {
                    id: parse_column("application id", &id)?,
                    pet_id: parse_column("pet id", &pet_id)?,
                    user_id,
                    status: parse_column("status", &status)?,
                    reason,
                    created_at: timestamp_from_millis(created_at)?,
                    updated_at: timestamp_from_millis(updated_at)?,
                    pet: Some(pet.into_pet()?),
                });
            }

            Ok(applications)
        })
    }
}
