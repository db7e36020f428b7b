//! Result types produced by the analysis operations.

use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Answer to a free-text question plus the evidence it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// Answer text, or a fixed message when nothing relevant was found.
    pub answer: String,
    /// Explanation naming the matched keywords and quoting the supporting text.
    pub justification: String,
}

/// One entry of the append-only question history.
#[derive(Debug, Clone, Serialize)]
pub struct QaRecord {
    /// Question as the user asked it.
    pub question: String,
    /// Answer returned for the question.
    pub answer: String,
    /// Justification returned with the answer.
    pub justification: String,
    /// RFC 3339 timestamp of when the question was answered.
    pub asked_at: String,
}

impl QaRecord {
    /// Record `answer` for `question`, stamped with the current UTC time.
    pub fn new(question: impl Into<String>, answer: &Answer) -> Self {
        Self {
            question: question.into(),
            answer: answer.answer.clone(),
            justification: answer.justification.clone(),
            asked_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
        }
    }
}

/// Which grading branch produced an [`Evaluation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// At least 30% of the expected keywords were covered.
    Correct,
    /// Between 10% and 30% of the expected keywords were covered.
    Partial,
    /// Less than 10% of the expected keywords were covered.
    NeedsImprovement,
    /// The answer or the expected text had no usable words.
    InsufficientAnswer,
    /// Grading itself failed.
    Failed,
}

/// Grade of a user's answer to a generated question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Whether the answer counts as correct.
    pub is_correct: bool,
    /// Grading branch that produced the feedback.
    pub verdict: Verdict,
    /// Feedback shown to the user.
    pub feedback: String,
    /// Quote of the passage the answer was graded against.
    pub justification: String,
    /// Up to five words the grader expected to see.
    pub expected_keywords: Vec<String>,
}
