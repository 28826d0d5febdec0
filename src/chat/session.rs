//! Chat widget session: transcript plus deferred bot replies.
//!
//! Each user message gets exactly one bot reply. The answer is chosen
//! immediately from the session's corpus snapshot; only its appearance in
//! the transcript is deferred by the configured delay. Replies are appended
//! by a per-session worker in the order their questions arrived.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::chat::message::ChatMessage;
use crate::core::config::ChatConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::ids::SessionId;
use crate::faq::entry::FaqEntry;
use crate::faq::matcher::match_answer;

/// Greeting placed at the top of every new transcript.
pub const WELCOME_MESSAGE: &str =
    "Hello! I'm Pet Connect, your virtual assistant. How can I help you today?";

/// Quick questions offered while the conversation is fresh.
pub const SUGGESTED_QUESTIONS: [&str; 3] = [
    "How do I adopt a pet?",
    "What are the adoption fees?",
    "How do I report a pet?",
];

/// Suggestions are shown while the transcript has at most this many messages.
const SUGGESTION_WINDOW: usize = 2;

struct PendingReply {
    text: String,
    due: Instant,
}

/// Point-in-time view of a session.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub session_id: SessionId,
    /// Transcript in display order.
    pub messages: Vec<ChatMessage>,
    /// Whether a bot reply is still pending.
    pub typing: bool,
    /// Quick questions to offer.
    pub suggested_questions: Vec<&'static str>,
}

/// A live chat widget conversation.
pub struct ChatSession {
    id: SessionId,
    corpus: Arc<[FaqEntry]>,
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    pending: Arc<watch::Sender<usize>>,
    replies: mpsc::UnboundedSender<PendingReply>,
    reply_delay: Duration,
    worker: JoinHandle<()>,
}

impl ChatSession {
    /// Open a session over a corpus snapshot and spawn its reply worker.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn open(corpus: impl Into<Arc<[FaqEntry]>>, config: &ChatConfig) -> Self {
        let id = SessionId::new();
        let transcript = Arc::new(Mutex::new(vec![ChatMessage::bot(WELCOME_MESSAGE)]));
        let (pending, _) = watch::channel(0_usize);
        let pending = Arc::new(pending);
        let (replies, rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(deliver_replies(
            id,
            rx,
            Arc::clone(&transcript),
            Arc::clone(&pending),
        ));

        Self {
            id,
            corpus: corpus.into(),
            transcript,
            pending,
            replies,
            reply_delay: Duration::from_millis(config.reply_delay_ms),
            worker,
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Number of FAQ entries in the session's snapshot.
    #[must_use]
    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    /// Append a user message and schedule its bot reply.
    ///
    /// The stored message is trimmed; the matcher sees the raw text.
    ///
    /// # Errors
    /// Returns `InvalidInput` for blank text, `NotFound` if the reply worker is gone.
    pub async fn send(&self, text: &str) -> AppResult<ChatMessage> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput(
                "message must not be blank".to_string(),
            ));
        }

        let answer = match_answer(text, &self.corpus).to_string();
        let message = ChatMessage::user(trimmed);

        // Enqueue under the transcript lock so a reply never precedes its question.
        let mut transcript = self.transcript.lock().await;
        self.replies
            .send(PendingReply {
                text: answer,
                due: Instant::now() + self.reply_delay,
            })
            .map_err(|_| AppError::NotFound(format!("chat session {}", self.id)))?;
        self.pending.send_modify(|count| *count += 1);
        transcript.push(message.clone());
        drop(transcript);

        debug!(session = %self.id, "Queued bot reply");
        Ok(message)
    }

    /// Copy of the transcript in display order.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.clone()
    }

    /// Whether any bot reply is still pending.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        *self.pending.borrow() > 0
    }

    /// Quick questions to show, empty once the conversation is under way.
    pub async fn suggested_questions(&self) -> Vec<&'static str> {
        let len = self.transcript.lock().await.len();
        suggestions_for(len)
    }

    /// Transcript together with the typing flag and suggestions.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let messages = self.transcript.lock().await.clone();
        let suggested_questions = suggestions_for(messages.len());
        SessionSnapshot {
            session_id: self.id,
            messages,
            typing: self.is_typing(),
            suggested_questions,
        }
    }

    /// Resolve once every queued reply has been appended.
    pub async fn wait_idle(&self) {
        let mut rx = self.pending.subscribe();
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

fn suggestions_for(transcript_len: usize) -> Vec<&'static str> {
    if transcript_len <= SUGGESTION_WINDOW {
        SUGGESTED_QUESTIONS.to_vec()
    } else {
        Vec::new()
    }
}

async fn deliver_replies(
    session_id: SessionId,
    mut rx: mpsc::UnboundedReceiver<PendingReply>,
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    pending: Arc<watch::Sender<usize>>,
) {
    while let Some(reply) = rx.recv().await {
        tokio::time::sleep_until(reply.due).await;
        transcript.lock().await.push(ChatMessage::bot(reply.text));
        pending.send_modify(|count| *count = count.saturating_sub(1));
        debug!(session = %session_id, "Delivered bot reply");
    }
}
