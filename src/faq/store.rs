//! FAQ corpus storage.

use std::future::Future;
use std::pin::Pin;

use tokio_rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::core::errors::{AppError, AppResult};
use crate::faq::entry::FaqEntry;
use crate::storage::{Database, FAQ_TABLE, parse_column, timestamp_from_millis};

/// Boxed future type for FAQ store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Starter corpus covering the widget's suggested questions.
pub const DEFAULT_FAQS: [(&str, &str, &str); 3] = [
    (
        "How do I adopt a pet?",
        "Browse the available pets, open a pet's page and fill out the adoption application. We will review it and get back to you.",
        "Adoption",
    ),
    (
        "What are the adoption fees?",
        "Adoption fees vary by pet and cover vaccinations and a health check. The exact fee is listed on each pet's page.",
        "Adoption",
    ),
    (
        "How do I report a pet?",
        "Sign in and use the Report a Pet form to list a pet that needs a new home.",
        "Reporting",
    ),
];

/// Corpus source for the FAQ matcher.
pub trait FaqStore: Send + Sync {
    /// List every entry in corpus order.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn list(&self) -> StoreFuture<'_, AppResult<Vec<FaqEntry>>>;

    /// Append an entry to the end of the corpus.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn insert(&self, entry: FaqEntry) -> StoreFuture<'_, AppResult<()>>;

    /// Count stored entries.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn count(&self) -> StoreFuture<'_, AppResult<u64>>;
}

/// `SQLite` implementation of the FAQ store.
///
/// Corpus order is insertion order.
pub struct SqliteFaqStore {
    conn: Connection,
}

impl SqliteFaqStore {
    /// Build a store on the shared database.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            conn: db.conn().clone(),
        }
    }
}

impl FaqStore for SqliteFaqStore {
    fn list(&self) -> StoreFuture<'_, AppResult<Vec<FaqEntry>>> {
        Box::pin(async move {
            let rows = self
                .conn
                .call(|conn| {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT id, question, answer, category, created_at
                         FROM {FAQ_TABLE}
                         ORDER BY seq"
                    ))?;
                    let rows = stmt
                        .query_map([], |row| {
                            let id: String = row.get(0)?;
                            let question: String = row.get(1)?;
                            let answer: String = row.get(2)?;
                            let category: Option<String> = row.get(3)?;
                            let created_at: i64 = row.get(4)?;
                            Ok((id, question, answer, category, created_at))
                        })?
                        .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                    Ok(rows)
                })
                .await?;

            let mut entries = Vec::with_capacity(rows.len());
            for (id, question, answer, category, created_at) in rows {
                entries.push(FaqEntry {
                    id: parse_column("faq id", &id)?,
                    question,
                    answer,
                    category,
                    created_at: timestamp_from_millis(created_at)?,
                });
            }

            debug!(count = entries.len(), "Loaded FAQ entries");
            Ok(entries)
        })
    }

    fn insert(&self, entry: FaqEntry) -> StoreFuture<'_, AppResult<()>> {
        Box::pin(async move {
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {FAQ_TABLE} (id, question, answer, category, created_at)
                             VALUES (?1, ?2, ?3, ?4, ?5)"
                        ),
                        rusqlite::params![
                            entry.id.to_string(),
                            entry.question,
                            entry.answer,
                            entry.category,
                            entry.created_at.timestamp_millis()
                        ],
                    )?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }

    fn count(&self) -> StoreFuture<'_, AppResult<u64>> {
        Box::pin(async move {
            let count = self
                .conn
                .call(|conn| {
                    let count: i64 = conn.query_row(
                        &format!("SELECT COUNT(*) FROM {FAQ_TABLE}"),
                        [],
                        |row| row.get(0),
                    )?;
                    Ok(count)
                })
                .await?;
            u64::try_from(count)
                .map_err(|_| AppError::CorruptRecord("negative faq count".to_string()))
        })
    }
}

/// Load the corpus snapshot for a chat session.
///
/// A failing store yields an empty corpus, so every query gets the fallback answer.
pub async fn load_corpus(store: &dyn FaqStore) -> Vec<FaqEntry> {
    match store.list().await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(%err, "Failed to load FAQ corpus, continuing with an empty one");
            Vec::new()
        }
    }
}

/// Insert [`DEFAULT_FAQS`] into an empty store.
///
/// Returns the number of inserted entries.
///
/// # Errors
/// Returns an error if storage access fails.
pub async fn seed_defaults(store: &dyn FaqStore) -> AppResult<usize> {
    if store.count().await? > 0 {
        return Ok(0);
    }

    for (question, answer, category) in DEFAULT_FAQS {
        store
            .insert(FaqEntry::new(question, answer).with_category(category))
            .await?;
    }

    info!(count = DEFAULT_FAQS.len(), "Seeded default FAQ entries");
    Ok(DEFAULT_FAQS.len())
}
