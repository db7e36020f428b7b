//! Comprehension questions derived from document structure and recurring concepts.

use super::keywords::extract_key_concepts;
use crate::fault::{AnalysisFault, contain};

/// Asked whenever the document has at least one substantial sentence.
pub const MAIN_TOPIC_QUESTION: &str =
    "What is the main topic or central theme discussed in this document?";
/// Asked when the document has more than three substantial sentences.
pub const FINDINGS_QUESTION: &str =
    "What are the key findings or conclusions presented in this document?";
/// Returned when question generation itself fails.
pub const TEMPLATE_QUESTIONS: [&str; 3] = [
    "What is the main topic or theme discussed in this document?",
    "What are the key points or arguments presented in the text?",
    "What conclusions or recommendations are made in the document?",
];

const MIN_SENTENCE_CHARS: usize = 20;
const FINDINGS_MIN_SENTENCES: usize = 3;

/// Question about a specific concept of the document.
pub fn concept_question(concept: &str) -> String {
    format!("What information is provided about {concept} in the document?")
}

/// Generate up to three comprehension questions for `text`.
///
/// Sentences are split on "." and count only when longer than 20 characters once trimmed.
/// The result may be shorter than three, or empty, when the text is too thin.
pub fn generate_questions(text: &str) -> Vec<String> {
    contain("generate_questions", || build_questions(text)).unwrap_or_else(fallback_questions)
}

fn fallback_questions(_fault: AnalysisFault) -> Vec<String> {
    TEMPLATE_QUESTIONS
        .iter()
        .map(|question| question.to_string())
        .collect()
}

fn build_questions(text: &str) -> Vec<String> {
    let sentence_count = text
        .split('.')
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .count();
    let concepts = extract_key_concepts(text);
    tracing::debug!(sentence_count, concepts = ?concepts, "Generating questions");

    let mut questions = Vec::with_capacity(3);
    if sentence_count > 0 {
        questions.push(MAIN_TOPIC_QUESTION.to_string());
    }
    if let Some(concept) = concepts.first() {
        questions.push(concept_question(concept));
    }
    if sentence_count > FINDINGS_MIN_SENTENCES {
        questions.push(FINDINGS_QUESTION.to_string());
    }
    questions
}
