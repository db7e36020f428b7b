//! Caller-owned session state: the loaded document, question history, and quiz.
//!
//! The analysis functions never touch global state; the shell owns one [`SessionState`] per
//! interactive session and passes it by reference into each operation.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::{
    self, Answer, Evaluation, QaRecord, answer_question, evaluate_answer, generate_questions,
};
use crate::extraction::{
    ContentType, Document, DocumentExtractor, ExtractionError, UploadedFile,
    meaningful_char_count,
};

const MIN_DOCUMENT_CHARS: usize = 20;

/// Errors surfaced by session-level workflows.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Extraction of the uploaded file failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Extraction succeeded but produced no usable text.
    #[error("Could not extract text from the document.")]
    NoText,
    /// An operation needed a document and none is loaded.
    #[error("No document has been processed yet.")]
    NoDocument,
    /// An operation needed generated questions and none exist.
    #[error("No challenge questions have been generated yet.")]
    NoChallenge,
    /// A question index outside the current challenge.
    #[error("Question {} does not exist; the challenge has {len} questions.", .index + 1)]
    QuestionOutOfRange {
        /// Zero-based index that was requested.
        index: usize,
        /// Number of questions in the challenge.
        len: usize,
    },
    /// Evaluation was requested for a blank answer.
    #[error("Question {} has no answer to evaluate.", .index + 1)]
    EmptyAnswer {
        /// Zero-based index of the question.
        index: usize,
    },
}

/// How the user is currently interacting with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Free-text questions answered from the document.
    AskAnything,
    /// Generated comprehension questions graded against the document.
    ChallengeMe,
}

/// One comprehension quiz: questions with parallel answers and evaluations.
///
/// The three sequences always have the same length.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeSet {
    questions: Vec<String>,
    user_answers: Vec<String>,
    evaluations: Vec<Option<Evaluation>>,
}

impl ChallengeSet {
    /// Start a quiz with empty answers and no evaluations.
    pub fn new(questions: Vec<String>) -> Self {
        let len = questions.len();
        Self {
            questions,
            user_answers: vec![String::new(); len],
            evaluations: vec![None; len],
        }
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the quiz has no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Generated questions, in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Current answers, parallel to [`Self::questions`].
    pub fn user_answers(&self) -> &[String] {
        &self.user_answers
    }

    /// Evaluations, parallel to [`Self::questions`]; `None` until evaluated.
    pub fn evaluations(&self) -> &[Option<Evaluation>] {
        &self.evaluations
    }

    /// Replace the answer for question `index`.
    pub fn set_answer(
        &mut self,
        index: usize,
        answer: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.check_index(index)?;
        self.user_answers[index] = answer.into();
        Ok(())
    }

    /// Grade the stored answer for question `index` against `context` and keep the result.
    ///
    /// Blank answers are refused without grading.
    pub fn evaluate(&mut self, index: usize, context: &str) -> Result<&Evaluation, SessionError> {
        self.check_index(index)?;
        let answer = self.user_answers[index].trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer { index });
        }

        let evaluation = evaluate_answer(context, &self.questions[index], answer);
        tracing::info!(
            index,
            verdict = ?evaluation.verdict,
            "Evaluated challenge answer"
        );
        Ok(self.evaluations[index].insert(evaluation))
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(SessionError::QuestionOutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

/// Serializable overview of a session, for status displays.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Identifier of the session.
    pub session_id: Uuid,
    /// Whether a document has been processed.
    pub document_processed: bool,
    /// Name of the processed document, if any.
    pub document_name: Option<String>,
    /// Format of the processed document, if any.
    pub content_type: Option<ContentType>,
    /// Current interaction mode, if chosen.
    pub mode: Option<InteractionMode>,
    /// Number of answered questions in the history.
    pub qa_history_count: usize,
    /// Whether a challenge has been generated.
    pub has_challenge_questions: bool,
}

/// Everything one user session holds between calls.
#[derive(Debug, Clone)]
pub struct SessionState {
    session_id: Uuid,
    document: Option<Document>,
    summary: Option<String>,
    mode: Option<InteractionMode>,
    qa_history: Vec<QaRecord>,
    challenge: Option<ChallengeSet>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Create an empty session with a fresh identifier.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            document: None,
            summary: None,
            mode: None,
            qa_history: Vec::new(),
            challenge: None,
        }
    }

    /// Identifier of this session.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The processed document, if any.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Summary generated when the document was processed.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Current interaction mode.
    pub fn mode(&self) -> Option<InteractionMode> {
        self.mode
    }

    /// Switch the interaction mode.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = Some(mode);
    }

    /// Answered questions, oldest first.
    pub fn qa_history(&self) -> &[QaRecord] {
        &self.qa_history
    }

    /// The current quiz, if one was generated.
    pub fn challenge(&self) -> Option<&ChallengeSet> {
        self.challenge.as_ref()
    }

    /// Extract `file`, store it as the session document, and summarize it.
    ///
    /// Placeholder messages from the extractor are stored like any other text. Text that is
    /// empty or has fewer than 20 alphanumeric characters is refused.
    pub fn load_document(
        &mut self,
        extractor: &DocumentExtractor,
        file: &UploadedFile,
    ) -> Result<&Document, SessionError> {
        let document = extractor.extract_document(file)?;
        let text = &document.text;
        if text.trim().is_empty() || meaningful_char_count(text) < MIN_DOCUMENT_CHARS {
            tracing::warn!(
                session_id = %self.session_id,
                filename = %file.name,
                "Upload produced no usable text"
            );
            return Err(SessionError::NoText);
        }

        let summary = analysis::summarize(&document.text);
        tracing::info!(
            session_id = %self.session_id,
            filename = %document.name,
            fingerprint = %document.fingerprint,
            chars = document.text.chars().count(),
            "Document processed"
        );

        self.summary = Some(summary);
        Ok(self.document.insert(document))
    }

    /// Answer `question` from the document and record it in the history.
    pub fn ask(&mut self, question: &str) -> Result<Answer, SessionError> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        Ok(answer_question(&document.text, question, &mut self.qa_history))
    }

    /// Generate the quiz unless one already exists, and return it.
    pub fn generate_challenge(&mut self) -> Result<&ChallengeSet, SessionError> {
        if self.challenge.is_none() {
            return self.regenerate_challenge();
        }
        self.challenge.as_ref().ok_or(SessionError::NoChallenge)
    }

    /// Discard any existing quiz and generate a new one.
    pub fn regenerate_challenge(&mut self) -> Result<&ChallengeSet, SessionError> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        let questions = generate_questions(&document.text);
        tracing::info!(
            session_id = %self.session_id,
            questions = questions.len(),
            "Generated challenge"
        );
        Ok(self.challenge.insert(ChallengeSet::new(questions)))
    }

    /// Store `answer` for question `index` of the current quiz.
    pub fn answer_challenge(&mut self, index: usize, answer: &str) -> Result<(), SessionError> {
        self.challenge
            .as_mut()
            .ok_or(SessionError::NoChallenge)?
            .set_answer(index, answer)
    }

    /// Grade the stored answer for question `index` of the current quiz.
    pub fn evaluate_challenge(&mut self, index: usize) -> Result<&Evaluation, SessionError> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        let challenge = self.challenge.as_mut().ok_or(SessionError::NoChallenge)?;
        challenge.evaluate(index, &document.text)
    }

    /// Overview of the session for status displays.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            document_processed: self.document.is_some(),
            document_name: self.document.as_ref().map(|doc| doc.name.clone()),
            content_type: self.document.as_ref().map(|doc| doc.content_type),
            mode: self.mode,
            qa_history_count: self.qa_history.len(),
            has_challenge_questions: self.challenge.is_some(),
        }
    }

    /// Drop everything, including the history, and start over with a new identifier.
    pub fn reset(&mut self) {
        tracing::info!(session_id = %self.session_id, "Session reset");
        *self = Self::new();
    }
}
