//! Keyword-overlap retrieval of answers from document sentences.

use super::types::{Answer, QaRecord};
use super::{SENTENCE_DELIMITER, question_terms, rank_sentences, take_chars};
use crate::fault::{AnalysisFault, contain};

/// Answer returned when no sentence shares a keyword with the question.
pub const NO_ANSWER: &str = "I couldn't find a specific answer to your question in the document.";
/// Justification returned alongside [`NO_ANSWER`].
pub const NO_RELEVANT_CONTENT: &str =
    "No relevant content found in the document for the given question.";

const INTERROGATIVES: &[&str] = &["what", "where", "when", "why", "how", "which", "who"];
const ANSWER_SENTENCES: usize = 2;
const JUSTIFICATION_KEYWORDS: usize = 3;
const JUSTIFICATION_QUOTE_CHARS: usize = 100;

/// Answer `question` from `context` and append the exchange to `history`.
///
/// The answer joins the two sentences sharing the most question keywords. Exactly one
/// [`QaRecord`] is appended per call, including calls that find nothing or fail.
pub fn answer_question(context: &str, question: &str, history: &mut Vec<QaRecord>) -> Answer {
    let outcome = contain("answer_question", || find_answer(context, question));
    record_answer(question, outcome, history)
}

/// Resolve `outcome` into an answer and append it to `history`.
fn record_answer(
    question: &str,
    outcome: Result<Answer, AnalysisFault>,
    history: &mut Vec<QaRecord>,
) -> Answer {
    let answer = outcome.unwrap_or_else(answer_fault);
    history.push(QaRecord::new(question, &answer));
    tracing::debug!(history_len = history.len(), "Recorded question");
    answer
}

fn answer_fault(fault: AnalysisFault) -> Answer {
    Answer {
        answer: format!("Error answering question: {}", fault.message),
        justification: "Could not process the question.".to_string(),
    }
}

fn find_answer(context: &str, question: &str) -> Answer {
    let terms = question_terms(question, INTERROGATIVES);
    let ranked = rank_sentences(context, &terms);
    tracing::debug!(
        terms = ?terms,
        matches = ranked.len(),
        "Ranked context sentences"
    );

    let Some(best) = ranked.first() else {
        return Answer {
            answer: NO_ANSWER.to_string(),
            justification: NO_RELEVANT_CONTENT.to_string(),
        };
    };

    let answer = ranked
        .iter()
        .take(ANSWER_SENTENCES)
        .map(|sentence| sentence.text)
        .collect::<Vec<_>>()
        .join(SENTENCE_DELIMITER);
    let keywords = terms
        .iter()
        .take(JUSTIFICATION_KEYWORDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let justification = format!(
        "This answer is based on relevant sentences from the document that contain keywords: {keywords}. Supporting text: '{}...'",
        take_chars(best.text, JUSTIFICATION_QUOTE_CHARS)
    );

    Answer {
        answer,
        justification,
    }
}
