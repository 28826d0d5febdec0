//! FAQ corpus and matcher used by the chat widget.

pub mod entry;
pub mod matcher;
pub mod store;

pub use entry::FaqEntry;
pub use matcher::{FALLBACK_ANSWER, FaqMatcher, match_answer};
pub use store::{DEFAULT_FAQS, FaqStore, SqliteFaqStore, StoreFuture, load_corpus, seed_defaults};
