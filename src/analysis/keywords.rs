//! Frequency-ranked keyword and key-concept extraction.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Common English words ignored by [`extract_keywords`].
pub const KEYWORD_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those",
];

/// Common English words ignored by [`extract_key_concepts`].
pub const CONCEPT_STOPWORDS: &[&str] = &[
    "this", "that", "with", "have", "will", "from", "they", "been", "said", "each", "which",
    "their", "time", "than", "many", "some", "very", "what", "know", "just", "first", "into",
    "over", "think", "also", "back", "after", "work", "life", "only", "way", "even", "new",
    "want", "because", "any", "these", "give", "day", "most", "us",
];

const KEYWORD_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '(', ')', '[', ']', '{', '}',
];
const MAX_KEY_CONCEPTS: usize = 3;

static NON_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z]").expect("static pattern compiles"));

/// Top `max_keywords` words of `text` by frequency.
///
/// Words are lowercased, stripped of surrounding punctuation, and kept only when longer
/// than three characters and not in [`KEYWORD_STOPWORDS`]. Equal counts keep first-seen order.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    let words = text
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(KEYWORD_PUNCTUATION).to_string())
        .filter(|word| word.chars().count() > 3 && !KEYWORD_STOPWORDS.contains(&word.as_str()))
        .collect::<Vec<_>>();

    rank_by_frequency(words)
        .into_iter()
        .take(max_keywords)
        .map(|(word, _)| word)
        .collect()
}

/// Up to three recurring concepts of `text`.
///
/// Words are lowercased and reduced to their ASCII letters; a concept must be longer than
/// four letters, absent from [`CONCEPT_STOPWORDS`], and appear at least twice.
pub fn extract_key_concepts(text: &str) -> Vec<String> {
    let words = text
        .to_lowercase()
        .split_whitespace()
        .map(|word| NON_LETTERS.replace_all(word, "").into_owned())
        .filter(|word| word.len() > 4 && !CONCEPT_STOPWORDS.contains(&word.as_str()))
        .collect::<Vec<_>>();

    rank_by_frequency(words)
        .into_iter()
        .take(MAX_KEY_CONCEPTS)
        .filter(|(_, count)| *count > 1)
        .map(|(word, _)| word)
        .collect()
}

/// Count `words` and order them by descending count, ties in first-seen order.
fn rank_by_frequency(words: Vec<String>) -> Vec<(String, usize)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for word in words {
        match positions.get(&word) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(word.clone(), counts.len());
                counts.push((word, 1));
            }
        }
    }

    counts.sort_by(|left, right| right.1.cmp(&left.1));
    counts
}
