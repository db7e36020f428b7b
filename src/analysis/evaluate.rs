//! Grading of free-text answers by keyword overlap with the document.

use std::collections::HashSet;

use super::types::{Evaluation, Verdict};
use super::{SENTENCE_DELIMITER, question_terms, rank_sentences, take_chars};
use crate::fault::{AnalysisFault, contain};

/// Feedback for answers covering at least 30% of the expected keywords.
pub const CORRECT_FEEDBACK: &str = "Good job! Your answer captures key points from the document.";
/// Feedback for answers covering 10% to 30% of the expected keywords.
pub const PARTIAL_FEEDBACK: &str =
    "Your answer is partially correct but could include more specific details from the document.";
/// Feedback for answers covering less than 10% of the expected keywords.
pub const NEEDS_IMPROVEMENT_FEEDBACK: &str = "Your answer needs improvement. Try to focus more on the specific information provided in the document.";
/// Feedback when the answer or the expected text has no usable words.
pub const INSUFFICIENT_ANSWER_FEEDBACK: &str =
    "Please provide a more detailed answer based on the document content.";

const QUESTION_STOPWORDS: &[&str] = &[
    "what", "where", "when", "why", "how", "which", "who", "are", "the", "and", "this", "that",
];
const COMMON_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];
const WORD_PUNCTUATION: &[char] = &['.', ',', '!', '?'];
const EXPECTED_SENTENCES: usize = 2;
const FALLBACK_CONTEXT_CHARS: usize = 500;
const JUSTIFICATION_QUOTE_CHARS: usize = 150;
const MAX_EXPECTED_KEYWORDS: usize = 5;
// Thresholds in percent; compared with integer arithmetic so the boundaries are exact.
const CORRECT_PERCENT: usize = 30;
const PARTIAL_PERCENT: usize = 10;

/// Grade `user_answer` to `question` against the most relevant sentences of `context`.
pub fn evaluate_answer(context: &str, question: &str, user_answer: &str) -> Evaluation {
    contain("evaluate_answer", || grade(context, question, user_answer))
        .unwrap_or_else(evaluation_fault)
}

fn evaluation_fault(fault: AnalysisFault) -> Evaluation {
    Evaluation {
        is_correct: false,
        verdict: Verdict::Failed,
        feedback: format!("Error evaluating answer: {}", fault.message),
        justification: "Could not complete evaluation.".to_string(),
        expected_keywords: Vec::new(),
    }
}

fn grade(context: &str, question: &str, user_answer: &str) -> Evaluation {
    let terms = question_terms(question, QUESTION_STOPWORDS);
    let ranked = rank_sentences(context, &terms);

    let expected_text = if ranked.is_empty() {
        take_chars(&context.to_lowercase(), FALLBACK_CONTEXT_CHARS)
    } else {
        ranked
            .iter()
            .take(EXPECTED_SENTENCES)
            .map(|sentence| sentence.text)
            .collect::<Vec<_>>()
            .join(SENTENCE_DELIMITER)
            .to_lowercase()
    };

    let expected_words = content_words(&expected_text);
    let user_words: HashSet<String> = content_words(&user_answer.trim().to_lowercase())
        .into_iter()
        .collect();

    let (verdict, overlap) = if expected_words.is_empty() || user_words.is_empty() {
        (Verdict::InsufficientAnswer, 0)
    } else {
        let overlap = expected_words
            .iter()
            .filter(|word| user_words.contains(*word))
            .count();
        (classify(overlap, expected_words.len()), overlap)
    };
    tracing::debug!(
        terms = ?terms,
        matched_sentences = ranked.len(),
        expected = expected_words.len(),
        overlap,
        ?verdict,
        "Graded answer"
    );

    let feedback = match verdict {
        Verdict::Correct => CORRECT_FEEDBACK,
        Verdict::Partial => PARTIAL_FEEDBACK,
        Verdict::NeedsImprovement => NEEDS_IMPROVEMENT_FEEDBACK,
        Verdict::InsufficientAnswer | Verdict::Failed => INSUFFICIENT_ANSWER_FEEDBACK,
    };

    let justification = match ranked.first() {
        Some(best) => format!(
            "Based on the document: '{}...'",
            take_chars(best.text, JUSTIFICATION_QUOTE_CHARS)
        ),
        None => "Based on the overall document content.".to_string(),
    };

    Evaluation {
        is_correct: verdict == Verdict::Correct,
        verdict,
        feedback: feedback.to_string(),
        justification,
        expected_keywords: expected_words
            .into_iter()
            .take(MAX_EXPECTED_KEYWORDS)
            .collect(),
    }
}

fn classify(overlap: usize, expected: usize) -> Verdict {
    if overlap * 100 >= expected * CORRECT_PERCENT {
        Verdict::Correct
    } else if overlap * 100 >= expected * PARTIAL_PERCENT {
        Verdict::Partial
    } else {
        Verdict::NeedsImprovement
    }
}

/// Distinct words longer than three characters, stripped of surrounding punctuation and
/// common words, in first-seen order.
fn content_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .filter(|word| word.chars().count() > 3)
        .map(|word| word.trim_matches(WORD_PUNCTUATION))
        .filter(|word| !word.is_empty() && !COMMON_WORDS.contains(word))
        .filter(|word| seen.insert(word.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str =
        "Alpha bravo charlie delta echo foxtrot golfs hotel india juliet. Unrelated closing remark";

    #[test]
    fn thirty_percent_overlap_is_correct() {
        let evaluation = evaluate_answer(CONTEXT, "Describe alpha", "alpha bravo charlie");
        assert_eq!(evaluation.verdict, Verdict::Correct);
        assert!(evaluation.is_correct);
        assert_eq!(evaluation.feedback, CORRECT_FEEDBACK);
    }

    #[test]
    fn ten_percent_overlap_is_partial() {
        let evaluation = evaluate_answer(CONTEXT, "Describe alpha", "alpha only");
        assert_eq!(evaluation.verdict, Verdict::Partial);
        assert!(!evaluation.is_correct);
        assert_eq!(evaluation.feedback, PARTIAL_FEEDBACK);
    }

    #[test]
    fn just_under_ten_percent_needs_improvement() {
        let context = "Alpha bravo charlie delta echo foxtrot golfs hotel india juliet kilo";
        let evaluation = evaluate_answer(context, "Describe alpha", "alpha only");
        assert_eq!(evaluation.verdict, Verdict::NeedsImprovement);
        assert_eq!(evaluation.feedback, NEEDS_IMPROVEMENT_FEEDBACK);
    }

    #[test]
    fn empty_answers_ask_for_more_detail() {
        let evaluation = evaluate_answer(CONTEXT, "Describe alpha", "   ");
        assert_eq!(evaluation.verdict, Verdict::InsufficientAnswer);
        assert!(!evaluation.is_correct);
        assert_eq!(evaluation.feedback, INSUFFICIENT_ANSWER_FEEDBACK);
    }

    #[test]
    fn justification_quotes_the_best_sentence() {
        let evaluation = evaluate_answer(CONTEXT, "Describe alpha", "alpha");
        assert_eq!(
            evaluation.justification,
            "Based on the document: 'Alpha bravo charlie delta echo foxtrot golfs hotel india juliet...'"
        );
        assert_eq!(
            evaluation.expected_keywords,
            vec!["alpha", "bravo", "charlie", "delta", "echo"]
        );
    }

    #[test]
    fn unmatched_questions_fall_back_to_the_document_opening() {
        let evaluation = evaluate_answer(CONTEXT, "Explain zebras", "alpha bravo charlie delta");
        assert_eq!(evaluation.justification, "Based on the overall document content.");
        // Expected words come from the first 500 characters: 10 words plus "unrelated",
        // "closing", "remark".
        assert_eq!(evaluation.verdict, Verdict::Correct);
    }

    #[test]
    fn classify_boundaries_are_exact() {
        assert_eq!(classify(3, 10), Verdict::Correct);
        assert_eq!(classify(29, 100), Verdict::Partial);
        assert_eq!(classify(1, 10), Verdict::Partial);
        assert_eq!(classify(9, 100), Verdict::NeedsImprovement);
        assert_eq!(classify(1, 11), Verdict::NeedsImprovement);
    }

    #[test]
    fn faults_produce_a_failed_evaluation() {
        let evaluation = contain("evaluate_answer", || -> Evaluation { panic!("overflow") })
            .unwrap_or_else(evaluation_fault);
        assert!(!evaluation.is_correct);
        assert_eq!(evaluation.verdict, Verdict::Failed);
        assert_eq!(evaluation.feedback, "Error evaluating answer: overflow");
        assert_eq!(evaluation.justification, "Could not complete evaluation.");
        assert!(evaluation.expected_keywords.is_empty());
    }
}
