//! FAQ entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ids::FaqId;

/// A stored question/answer pair used for automated chat replies.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// Entry identifier.
    pub id: FaqId,
    /// Question text matched against user input.
    pub question: String,
    /// Answer returned when the question matches.
    pub answer: String,
    /// Optional grouping label.
    pub category: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl FaqEntry {
    /// Build an uncategorized entry.
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: FaqId::new(),
            question: question.into(),
            answer: answer.into(),
            category: None,
            created_at: Utc::now(),
        }
    }

    /// Attach a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
