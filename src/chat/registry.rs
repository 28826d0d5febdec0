//! Bounded registry of live chat sessions.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::chat::session::ChatSession;
use crate::core::config::ChatConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::ids::SessionId;
use crate::faq::entry::FaqEntry;

/// Live sessions keyed by id; the least recently used one is torn down at capacity.
pub struct SessionRegistry {
    config: ChatConfig,
    sessions: Mutex<LruCache<SessionId, Arc<ChatSession>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    ///
    /// # Errors
    /// Returns an error if the configured capacity is zero.
    pub fn new(config: ChatConfig) -> AppResult<Self> {
        let capacity = NonZeroUsize::new(config.session_capacity).ok_or_else(|| {
            AppError::InvalidConfig("chat.session_capacity must be > 0".to_string())
        })?;

        Ok(Self {
            config,
            sessions: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Open a session over the given corpus snapshot.
    pub async fn open(&self, corpus: Vec<FaqEntry>) -> Arc<ChatSession> {
        let session = Arc::new(ChatSession::open(corpus, &self.config));
        let id = session.id();

        let evicted = self.sessions.lock().await.push(id, Arc::clone(&session));
        if let Some((evicted_id, _)) = evicted {
            debug!(session = %evicted_id, "Evicted least recently used chat session");
        }

        info!(session = %id, faqs = session.corpus_len(), "Opened chat session");
        session
    }

    /// Look up a live session.
    pub async fn get(&self, id: SessionId) -> Option<Arc<ChatSession>> {
        self.sessions.lock().await.get(&id).cloned()
    }

    /// Tear down a session. Returns whether it existed.
    pub async fn close(&self, id: SessionId) -> bool {
        let removed = self.sessions.lock().await.pop(&id).is_some();
        if removed {
            info!(session = %id, "Closed chat session");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether no session is live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
