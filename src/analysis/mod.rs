//! Keyword-overlap text analysis: summaries, answers, generated questions, and grading.
//!
//! Every public operation is total. Bodies run inside [`crate::fault::contain`] and a
//! failure is turned into a result that describes it instead of real content.

mod answer;
mod evaluate;
pub mod keywords;
mod questions;
mod summary;
pub mod types;

pub use answer::{NO_ANSWER, NO_RELEVANT_CONTENT, answer_question};
pub use evaluate::{
    CORRECT_FEEDBACK, INSUFFICIENT_ANSWER_FEEDBACK, NEEDS_IMPROVEMENT_FEEDBACK, PARTIAL_FEEDBACK,
    evaluate_answer,
};
pub use keywords::{extract_key_concepts, extract_keywords};
pub use questions::{
    FINDINGS_QUESTION, MAIN_TOPIC_QUESTION, TEMPLATE_QUESTIONS, concept_question,
    generate_questions,
};
pub use summary::{SUMMARY_MAX_WORDS, summarize};
pub use types::{Answer, Evaluation, QaRecord, Verdict};

/// Delimiter used by the summary, answer, and grading passes to split sentences.
pub(crate) const SENTENCE_DELIMITER: &str = ". ";

const QUESTION_PUNCTUATION: &[char] = &['?', '.', ',', '!'];

/// A sentence of the context together with how many question terms it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScoredSentence<'a> {
    pub(crate) text: &'a str,
    pub(crate) score: usize,
}

/// Lowercased question words longer than three characters that are not in `excluded`.
///
/// The length and exclusion checks look at the raw token; surrounding punctuation is
/// stripped afterwards. Tokens that are pure punctuation are dropped.
pub(crate) fn question_terms(question: &str, excluded: &[&str]) -> Vec<String> {
    question
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 3 && !excluded.contains(word))
        .map(|word| word.trim_matches(QUESTION_PUNCTUATION).to_string())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Split `context` on ". ", score each sentence by substring hits of `terms`, and keep the
/// sentences with at least one hit, best first.
///
/// Equal scores keep their document order.
pub(crate) fn rank_sentences<'a>(context: &'a str, terms: &[String]) -> Vec<ScoredSentence<'a>> {
    let mut ranked: Vec<ScoredSentence<'a>> = context
        .split(SENTENCE_DELIMITER)
        .filter_map(|sentence| {
            let lower = sentence.to_lowercase();
            let score = terms
                .iter()
                .filter(|term| lower.contains(term.as_str()))
                .count();
            (score > 0).then_some(ScoredSentence {
                text: sentence,
                score,
            })
        })
        .collect();
    ranked.sort_by(|left, right| right.score.cmp(&left.score));
    ranked
}

/// First `max_chars` characters of `text`.
pub(crate) fn take_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
