//! Pet listing storage.

use chrono::Utc;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use tracing::info;

use crate::catalog::StoreFuture;
use crate::catalog::filters::PetFilters;
use crate::catalog::pet::{Pet, PetReport};
use crate::catalog::profile::{DEFAULT_PROFILE_NAME, insert_profile_if_missing};
use crate::core::errors::{AppError, AppResult};
use crate::core::ids::{PetId, UserId};
use crate::storage::{Database, PET_TABLE, parse_column, timestamp_from_millis};

/// Pet store trait.
pub trait PetStore: Send + Sync {
    /// List pets matching the filters, newest first.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn list(&self, filters: PetFilters) -> StoreFuture<'_, AppResult<Vec<Pet>>>;

    /// Get a single pet.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn get(&self, id: PetId) -> StoreFuture<'_, AppResult<Option<Pet>>>;

    /// List a pet for adoption on behalf of `reporter`, creating their profile if needed.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an incomplete report, or a storage error.
    fn report(&self, reporter: UserId, report: PetReport) -> StoreFuture<'_, AppResult<Pet>>;

    /// Pets listed by a user, newest first.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn list_reported_by(&self, reporter: UserId) -> StoreFuture<'_, AppResult<Vec<Pet>>>;

    /// Mark a pet as adopted.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown pet, or a storage error.
    fn mark_adopted(&self, id: PetId) -> StoreFuture<'_, AppResult<()>>;
}

/// Column list shared by every pet query, prefixed with a table alias.
pub(crate) fn pet_columns(alias: &str) -> String {
    [
        "id",
        "name",
        "species",
        "breed",
        "age",
        "size",
        "gender",
        "description",
        "health_status",
        "is_adopted",
        "reported_by",
        "image_url",
        "created_at",
        "updated_at",
    ]
    .iter()
    .map(|column| format!("{alias}.{column}"))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Undecoded pet row.
pub(crate) struct RawPet {
    id: String,
    name: String,
    species: String,
    breed: Option<String>,
    age: Option<u32>,
    size: Option<String>,
    gender: Option<String>,
    description: Option<String>,
    health_status: Option<String>,
    is_adopted: bool,
    reported_by: Option<String>,
    image_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl RawPet {
    /// Read the pet columns starting at `offset`.
    pub(crate) fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            species: row.get(offset + 2)?,
            breed: row.get(offset + 3)?,
            age: row.get(offset + 4)?,
            size: row.get(offset + 5)?,
            gender: row.get(offset + 6)?,
            description: row.get(offset + 7)?,
            health_status: row.get(offset + 8)?,
            is_adopted: row.get(offset + 9)?,
            reported_by: row.get(offset + 10)?,
            image_url: row.get(offset + 11)?,
            created_at: row.get(offset + 12)?,
            updated_at: row.get(offset + 13)?,
        })
    }

    /// Decode into the domain type.
    pub(crate) fn into_pet(self) -> AppResult<Pet> {
        Ok(Pet {
            id: parse_column("pet id", &self.id)?,
            name: self.name,
            species: self.species,
            breed: self.breed,
            age: self.age,
            size: self
                .size
                .map(|raw| parse_column("size", &raw))
                .transpose()?,
            gender: self
                .gender
                .map(|raw| parse_column("gender", &raw))
                .transpose()?,
            description: self.description,
            health_status: self.health_status,
            is_adopted: self.is_adopted,
            reported_by: self
                .reported_by
                .map(|raw| parse_column("reporter id", &raw))
                .transpose()?,
            image_url: self.image_url,
            created_at: timestamp_from_millis(self.created_at)?,
            updated_at: timestamp_from_millis(self.updated_at)?,
        })
    }
}

fn insert_pet(conn: &rusqlite::Connection, pet: &Pet) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {PET_TABLE}
            (id, name, species, breed, age, size, gender, description, health_status,
             is_adopted, reported_by, image_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
        ),
        rusqlite::params![
            pet.id.to_string(),
            pet.name,
            pet.species,
            pet.breed,
            pet.age,
            pet.size.map(|size| size.as_str()),
            pet.gender.map(|gender| gender.as_str()),
            pet.description,
            pet.health_status,
            pet.is_adopted,
            pet.reported_by.map(|id| id.to_string()),
            pet.image_url,
            pet.created_at.timestamp_millis(),
            pet.updated_at.timestamp_millis()
        ],
    )?;
    Ok(())
}

/// `SQLite` implementation of the pet store.
pub struct SqlitePetStore {
    conn: Connection,
}

impl SqlitePetStore {
    /// Build a store on the shared database.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            conn: db.conn().clone(),
        }
    }

    async fn query_pets(
        &self,
        clause: String,
        params: Vec<rusqlite::types::Value>,
    ) -> AppResult<Vec<Pet>> {
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM {PET_TABLE} p{clause}
                     ORDER BY p.created_at DESC, p.rowid DESC",
                    pet_columns("p")
                ))?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                        RawPet::from_row(row, 0)
                    })?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(RawPet::into_pet).collect()
    }
}

impl PetStore for SqlitePetStore {
    fn list(&self, filters: PetFilters) -> StoreFuture<'_, AppResult<Vec<Pet>>> {
        Box::pin(async move {
            let (clause, params) = filters.where_clause();
            self.query_pets(clause, params).await
        })
    }

    fn get(&self, id: PetId) -> StoreFuture<'_, AppResult<Option<Pet>>> {
        Box::pin(async move {
            let key = id.to_string();
            let raw = self
                .conn
                .call(move |conn| {
                    let raw = conn
                        .query_row(
                            &format!(
                                "SELECT {} FROM {PET_TABLE} p WHERE p.id = ?1",
                                pet_columns("p")
                            ),
                            rusqlite::params![key],
                            |row| RawPet::from_row(row, 0),
                        )
                        .optional()?;
                    Ok(raw)
                })
                .await?;
            raw.map(RawPet::into_pet).transpose()
        })
    }

    fn report(&self, reporter: UserId, report: PetReport) -> StoreFuture<'_, AppResult<Pet>> {
        Box::pin(async move {
            let pet = report.into_pet(reporter)?;
            let stored = pet.clone();
            let reporter_key = reporter.to_string();
            let now_ms = Utc::now().timestamp_millis();

            let created_profile = self
                .conn
                .call(move |conn| {
                    let tx = conn.transaction()?;
                    let created =
                        insert_profile_if_missing(&tx, &reporter_key, DEFAULT_PROFILE_NAME, now_ms)?;
                    insert_pet(&tx, &stored)?;
                    tx.commit()?;
                    Ok(created)
                })
                .await?;

            info!(
                pet = %pet.id,
                reporter = %reporter,
                created_profile,
                "Pet reported for adoption"
            );
            Ok(pet)
        })
    }

    fn list_reported_by(&self, reporter: UserId) -> StoreFuture<'_, AppResult<Vec<Pet>>> {
        Box::pin(async move {
            let params = vec![rusqlite::types::Value::Text(reporter.to_string())];
            self.query_pets(" WHERE p.reported_by = ?1".to_string(), params)
                .await
        })
    }

    fn mark_adopted(&self, id: PetId) -> StoreFuture<'_, AppResult<()>> {
        Box::pin(async move {
            let key = id.to_string();
            let now_ms = Utc::now().timestamp_millis();
            let updated = self
                .conn
                .call(move |conn| {
                    let updated = conn.execute(
                        &format!(
                            "UPDATE {PET_TABLE} SET is_adopted = 1, updated_at = ?2 WHERE id = ?1"
                        ),
                        rusqlite::params![key, now_ms],
                    )?;
                    Ok(updated)
                })
                .await?;

            if updated == 0 {
                return Err(AppError::NotFound(format!("pet {id}")));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::pet::PetSize;
    use crate::catalog::profile::{ProfileStore, SqliteProfileStore};

    fn report(name: &str, species: &str, breed: Option<&str>, age: Option<u32>) -> PetReport {
        PetReport {
            name: name.to_string(),
            species: species.to_string(),
            breed: breed.map(str::to_string),
            age,
            ..PetReport::default()
        }
    }

    #[tokio::test]
    async fn test_report_creates_profile_and_pet() {
        let db = Database::open_in_memory().await.unwrap();
        let store = SqlitePetStore::new(&db);
        let profiles = SqliteProfileStore::new(&db);
        let user = UserId::new();

        let pet = store
            .report(user, report("Rex", "Dog", Some("Labrador"), Some(3)))
            .await
            .unwrap();

        let profile = profiles.get(user).await.unwrap().unwrap();
        assert_eq!(profile.full_name.as_deref(), Some(DEFAULT_PROFILE_NAME));

        let loaded = store.get(pet.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Rex");
        assert_eq!(loaded.breed.as_deref(), Some("Labrador"));
        assert_eq!(loaded.reported_by, Some(user));
        assert!(store.get(PetId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_incomplete_report_rejected() {
        let db = Database::open_in_memory().await.unwrap();
        let store = SqlitePetStore::new(&db);
        let err = store
            .report(UserId::new(), report("", "Dog", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_list_applies_filters_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        let store = SqlitePetStore::new(&db);
        let user = UserId::new();

        store
            .report(user, report("Rex", "Dog", Some("Labrador Retriever"), Some(3)))
            .await
            .unwrap();
        let mia = store
            .report(
                user,
                PetReport {
                    size: Some(PetSize::Small),
                    ..report("Mia", "Cat", Some("Siamese"), Some(1))
                },
            )
            .await
            .unwrap();
        store
            .report(user, report("Bolt", "Dog", Some("Border Collie"), Some(7)))
            .await
            .unwrap();

        let all = store.list(PetFilters::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bolt", "Mia", "Rex"]);

        let dogs = store
            .list(PetFilters {
                species: Some("Dog".to_string()),
                breed: Some("labrador".to_string()),
                ..PetFilters::default()
            })
            .await
            .unwrap();
        assert_eq!(dogs.len(), 1);
        assert_eq!(dogs[0].name, "Rex");

        let young = store
            .list(PetFilters {
                min_age: Some(1),
                max_age: Some(3),
                ..PetFilters::default()
            })
            .await
            .unwrap();
        assert_eq!(young.len(), 2);

        store.mark_adopted(mia.id).await.unwrap();
        let available = store
            .list(PetFilters {
                is_adopted: Some(false),
                ..PetFilters::default()
            })
            .await
            .unwrap();
        assert!(available.iter().all(|p| p.id != mia.id));

        let small = store
            .list(PetFilters {
                size: Some(PetSize::Small),
                ..PetFilters::default()
            })
            .await
            .unwrap();
        assert_eq!(small.len(), 1);
        assert!(small[0].is_adopted);
    }

    #[tokio::test]
    async fn test_list_reported_by_and_mark_unknown() {
        let db = Database::open_in_memory().await.unwrap();
        let store = SqlitePetStore::new(&db);
        let alice = UserId::new();
        let bob = UserId::new();

        store.report(alice, report("Rex", "Dog", None, None)).await.unwrap();
        store.report(bob, report("Mia", "Cat", None, None)).await.unwrap();

        let mine = store.list_reported_by(alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Rex");

        let err = store.mark_adopted(PetId::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
