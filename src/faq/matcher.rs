//! FAQ matching for the chat widget.
//!
//! Matching is plain case-insensitive substring containment in either
//! direction. The corpus is scanned in order and the first candidate wins;
//! there is no scoring, so a short question such as `"fee"` shadows a more
//! specific one listed after it.
//!
//! Inputs are only lower-cased. Whitespace and punctuation are kept as-is,
//! which means an empty query is contained in every question and therefore
//! always resolves to the first entry of a non-empty corpus.

use crate::faq::entry::FaqEntry;

/// Reply used when no FAQ entry matches.
pub const FALLBACK_ANSWER: &str = "I'm sorry, I don't have an answer for that question. Please contact our support team for more assistance.";

/// Matches user queries against a read-only FAQ snapshot.
#[derive(Clone, Copy, Debug)]
pub struct FaqMatcher<'a> {
    corpus: &'a [FaqEntry],
}

impl<'a> FaqMatcher<'a> {
    /// Wrap a corpus snapshot.
    #[must_use]
    pub const fn new(corpus: &'a [FaqEntry]) -> Self {
        Self { corpus }
    }

    /// Return the first entry whose question contains, or is contained in, the query.
    #[must_use]
    pub fn find(&self, query: &str) -> Option<&'a FaqEntry> {
        let query = query.to_lowercase();
        self.corpus.iter().find(|entry| {
            let question = entry.question.to_lowercase();
            question.contains(&query) || query.contains(&question)
        })
    }

    /// Return the matching answer, or [`FALLBACK_ANSWER`].
    #[must_use]
    pub fn answer(&self, query: &str) -> &'a str {
        self.find(query)
            .map_or(FALLBACK_ANSWER, |entry| entry.answer.as_str())
    }
}

/// Map a free-text query to the best stored answer.
#[must_use]
pub fn match_answer<'a>(query: &str, corpus: &'a [FaqEntry]) -> &'a str {
    FaqMatcher::new(corpus).answer(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(pairs: &[(&str, &str)]) -> Vec<FaqEntry> {
        pairs.iter().map(|(q, a)| FaqEntry::new(*q, *a)).collect()
    }

    #[test]
    fn test_empty_query_returns_first_entry() {
        let faqs = corpus(&[("How do I adopt a pet?", "first"), ("fees", "second")]);
        assert_eq!(match_answer("", &faqs), "first");
    }

    #[test]
    fn test_exact_question_case_insensitive() {
        let faqs = corpus(&[(
            "How do I adopt a pet?",
            "Fill out an application on the pet's page.",
        )]);
        assert_eq!(
            match_answer("HOW DO I ADOPT A PET?", &faqs),
            "Fill out an application on the pet's page."
        );
    }

    #[test]
    fn test_duplicate_questions_first_wins() {
        let faqs = corpus(&[("Opening hours", "9 to 5"), ("opening HOURS", "never")]);
        assert_eq!(match_answer("opening hours", &faqs), "9 to 5");
    }

    #[test]
    fn test_question_inside_query_first_match_wins() {
        let faqs = corpus(&[("fee", "$50"), ("fees for adoption", "$75")]);
        assert_eq!(match_answer("what are the adoption fees", &faqs), "$50");
    }

    #[test]
    fn test_order_sensitivity() {
        let a = ("dog", "A");
        let b = ("dog adoption", "B");
        assert_eq!(match_answer("adopting a dog", &corpus(&[a, b])), "A");
        // "dog adoption" is not inside the query, so A still wins when listed second.
        assert_eq!(match_answer("adopting a dog", &corpus(&[b, a])), "A");
        // Query inside question: both contain "dog", so corpus order decides.
        assert_eq!(match_answer("dog", &corpus(&[b, a])), "B");
    }

    #[test]
    fn test_query_inside_question() {
        let faqs = corpus(&[("How do I report a pet?", "Use the report form.")]);
        assert_eq!(match_answer("report", &faqs), "Use the report form.");
    }

    #[test]
    fn test_no_match_returns_fallback() {
        let faqs = corpus(&[("adoption fees", "$50"), ("opening hours", "9 to 5")]);
        assert_eq!(match_answer("do you sell hamsters", &faqs), FALLBACK_ANSWER);
    }

    #[test]
    fn test_empty_corpus_returns_fallback() {
        assert_eq!(match_answer("anything", &[]), FALLBACK_ANSWER);
        assert_eq!(match_answer("", &[]), FALLBACK_ANSWER);
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let faqs = corpus(&[("fees", "$50")]);
        assert_eq!(match_answer("  fees  ", &faqs), "$50");
        assert_eq!(match_answer("f ees", &faqs), FALLBACK_ANSWER);
    }

    #[test]
    fn test_idempotent() {
        let faqs = corpus(&[("fee", "$50"), ("hours", "9 to 5")]);
        let first = match_answer("What is the fee?", &faqs);
        let second = match_answer("What is the fee?", &faqs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_returns_entry() {
        let faqs = corpus(&[("fee", "$50")]);
        let matcher = FaqMatcher::new(&faqs);
        let hit = matcher.find("FEE?").map(|entry| entry.id);
        assert_eq!(hit, Some(faqs[0].id));
        assert!(matcher.find("hours").is_none());
    }

    #[test]
    fn test_unicode_lowercasing() {
        let faqs = corpus(&[("ÉTÉ hours", "summer")]);
        assert_eq!(match_answer("été HOURS", &faqs), "summer");
    }
}
