//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::catalog::{
    ApplicationStore, PetStore, ProfileStore, SqliteApplicationStore, SqlitePetStore,
    SqliteProfileStore,
};
use crate::chat::SessionRegistry;
use crate::core::config::AppConfig;
use crate::core::errors::AppResult;
use crate::faq::{FaqStore, SqliteFaqStore};
use crate::storage::Database;

/// Shared application state.
pub struct AppState {
    /// Effective configuration.
    pub config: AppConfig,
    /// FAQ corpus source.
    pub faqs: Arc<dyn FaqStore>,
    /// Pet listings.
    pub pets: Arc<dyn PetStore>,
    /// Adoption applications.
    pub applications: Arc<dyn ApplicationStore>,
    /// User profiles.
    pub profiles: Arc<dyn ProfileStore>,
    /// Live chat widget sessions.
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Open the configured database and build the state on it.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the database cannot be opened.
    pub async fn new(config: AppConfig) -> AppResult<Arc<Self>> {
        config.validate()?;
        let db = Database::open(&config.storage).await?;
        Self::with_database(&db, config)
    }

    /// Build the state on an already opened database.
    ///
    /// # Errors
    /// Returns an error if the chat configuration is invalid.
    pub fn with_database(db: &Database, config: AppConfig) -> AppResult<Arc<Self>> {
        let sessions = SessionRegistry::new(config.chat.clone())?;

        Ok(Arc::new(Self {
            faqs: Arc::new(SqliteFaqStore::new(db)),
            pets: Arc::new(SqlitePetStore::new(db)),
            applications: Arc::new(SqliteApplicationStore::new(db)),
            profiles: Arc::new(SqliteProfileStore::new(db)),
            sessions,
            config,
        }))
    }
}
