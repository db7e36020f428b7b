//! Extractive summary bounded by a word budget.

use super::{SENTENCE_DELIMITER, take_chars};
use crate::fault::{AnalysisFault, contain};

/// Upper bound on the number of words in a summary.
pub const SUMMARY_MAX_WORDS: usize = 150;

const SHORT_TEXT_CHARS: usize = 150;
const LEAD_SENTENCES: usize = 2;
const MAX_SUMMARY_SENTENCES: usize = 5;
const SIGNAL_WORDS: &[&str] = &[
    "conclusion",
    "result",
    "finding",
    "important",
    "main",
    "key",
    "summary",
];

/// Build an extractive summary of at most [`SUMMARY_MAX_WORDS`] words.
///
/// The first two sentences are always kept; later sentences are added when they mention a
/// signal word, up to five sentences in total. Texts with fewer than three sentences are
/// returned whole, or cut to 150 characters. A failure is reported in the returned text.
pub fn summarize(text: &str) -> String {
    contain("summarize", || build_summary(text)).unwrap_or_else(summary_fault)
}

fn summary_fault(fault: AnalysisFault) -> String {
    format!("Error generating summary: {}", fault.message)
}

fn build_summary(text: &str) -> String {
    let sentences: Vec<&str> = text.split(SENTENCE_DELIMITER).collect();
    if sentences.len() < LEAD_SENTENCES + 1 {
        tracing::debug!(sentences = sentences.len(), "Summarizing short text verbatim");
        return if text.chars().count() > SHORT_TEXT_CHARS {
            format!("{}...", take_chars(text, SHORT_TEXT_CHARS))
        } else {
            text.to_string()
        };
    }

    let mut selected: Vec<&str> = sentences[..LEAD_SENTENCES].to_vec();
    for sentence in &sentences[LEAD_SENTENCES..] {
        let lower = sentence.to_lowercase();
        if SIGNAL_WORDS.iter().any(|word| lower.contains(word)) {
            selected.push(sentence);
            if selected.len() >= MAX_SUMMARY_SENTENCES {
                break;
            }
        }
    }
    tracing::debug!(
        sentences = sentences.len(),
        selected = selected.len(),
        "Selected summary sentences"
    );

    let summary = selected.join(SENTENCE_DELIMITER);
    let words: Vec<&str> = summary.split_whitespace().collect();
    if words.len() > SUMMARY_MAX_WORDS {
        format!("{}...", words[..SUMMARY_MAX_WORDS].join(" "))
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_lead_sentences_when_no_signal_words_appear() {
        assert_eq!(
            summarize("The cat sat. The dog ran. The bird flew."),
            "The cat sat. The dog ran"
        );
    }

    #[test]
    fn adds_sentences_with_signal_words() {
        let text = "Solar panels convert light. Output varies by season. Clouds reduce yield. \
                    The main result is a 12% gain. Costs fell sharply. A key finding concerns storage";
        assert_eq!(
            summarize(text),
            "Solar panels convert light. Output varies by season. The main result is a 12% gain. A key finding concerns storage"
        );
    }

    #[test]
    fn stops_after_five_sentences() {
        let text = "One. Two. Three. Key a. Key b. Key c. Key d. Key e";
        assert_eq!(summarize(text), "One. Two. Key a. Key b. Key c");
    }

    #[test]
    fn signal_words_match_case_insensitively_inside_words() {
        let text = "Intro here. Setup here. RESULTS were clear. Nothing else";
        assert_eq!(summarize(text), "Intro here. Setup here. RESULTS were clear");
    }

    #[test]
    fn short_texts_are_returned_or_truncated_by_characters() {
        assert_eq!(summarize("Just one sentence."), "Just one sentence.");
        let long = "word ".repeat(60);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), 153);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn long_summaries_are_cut_to_the_word_budget() {
        let sentence = "important ".repeat(100);
        let text = vec![sentence.trim(); 6].join(". ");
        let summary = summarize(&text);
        assert_eq!(summary.split_whitespace().count(), SUMMARY_MAX_WORDS);
        assert!(summary.ends_with("important..."));
    }

    #[test]
    fn empty_text_summarizes_to_empty() {
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn faults_are_reported_in_place_of_the_summary() {
        let summary = contain("summarize", || -> String { panic!("tokenizer exploded") })
            .unwrap_or_else(summary_fault);
        assert_eq!(summary, "Error generating summary: tokenizer exploded");
    }
}
