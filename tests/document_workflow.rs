use docqa::analysis::{
    INSUFFICIENT_ANSWER_FEEDBACK, MAIN_TOPIC_QUESTION, NO_ANSWER, NO_RELEVANT_CONTENT,
    SUMMARY_MAX_WORDS, Verdict, answer_question, evaluate_answer, generate_questions, summarize,
};
use docqa::extraction::{
    DocumentExtractor, ExtractionError, PdfPageSource, PdfParseError, SCANNED_PDF_PLACEHOLDER,
    UploadedFile, clean_text,
};
use docqa::session::{SessionError, SessionState};

const LIMIT: usize = 1024 * 1024;

const ARTICLE: &str = "Coral reefs cover less than one percent of the ocean floor. \
Coral reefs support about a quarter of all marine species. \
Rising sea temperatures cause coral bleaching across large areas. \
The key finding is that bleaching events are becoming more frequent. \
Local protection helps reefs recover between bleaching events.";

struct BlankPages(usize);

impl PdfPageSource for BlankPages {
    fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, PdfParseError> {
        Ok(vec![String::new(); self.0])
    }
}

fn text_upload(text: &str) -> UploadedFile {
    UploadedFile::new("reefs.txt", "text/plain", text.as_bytes().to_vec())
}

fn loaded_session() -> SessionState {
    let mut session = SessionState::new();
    session
        .load_document(&DocumentExtractor::new(LIMIT), &text_upload(ARTICLE))
        .expect("document loads");
    session
}

#[test]
fn given_three_plain_sentences_when_summarizing_then_only_the_lead_pair_is_kept() {
    assert_eq!(
        summarize("The cat sat. The dog ran. The bird flew."),
        "The cat sat. The dog ran"
    );
}

#[test]
fn given_a_json_upload_when_extracting_then_the_mime_type_is_rejected() {
    let upload = UploadedFile::new("data.json", "application/json", b"{\"a\": 1}".to_vec());
    let error = DocumentExtractor::new(LIMIT)
        .extract_text(&upload)
        .expect_err("json is unsupported");

    assert!(matches!(&error, ExtractionError::UnsupportedType(mime) if mime == "application/json"));
    assert_eq!(error.to_string(), "Unsupported file type: application/json");
}

#[test]
fn given_a_json_upload_when_loading_then_the_session_stays_empty() {
    let mut session = SessionState::new();
    let upload = UploadedFile::new("data.json", "application/json", b"{}".to_vec());
    let error = session
        .load_document(&DocumentExtractor::new(LIMIT), &upload)
        .expect_err("json is unsupported");

    assert!(matches!(error, SessionError::Extraction(ExtractionError::UnsupportedType(_))));
    assert!(session.document().is_none());
    assert!(session.summary().is_none());
}

#[test]
fn given_a_pdf_with_only_blank_pages_when_extracting_then_the_scanned_placeholder_is_returned() {
    let extractor = DocumentExtractor::with_page_source(Box::new(BlankPages(3)), LIMIT);
    let upload = UploadedFile::new("scan.pdf", "application/pdf", b"%PDF-1.7".to_vec());

    let text = extractor.extract_text(&upload).expect("placeholder, not an error");
    assert_eq!(text, SCANNED_PDF_PLACEHOLDER);
}

#[test]
fn given_an_unrelated_question_when_answering_then_the_fixed_reply_is_returned() {
    let mut history = Vec::new();
    let answer = answer_question(ARTICLE, "What is the capital of France?", &mut history);

    assert_eq!(answer.answer, NO_ANSWER);
    assert_eq!(answer.justification, NO_RELEVANT_CONTENT);
    assert_eq!(history.len(), 1);
}

#[test]
fn given_a_blank_answer_when_evaluating_directly_then_more_detail_is_requested() {
    let evaluation = evaluate_answer(ARTICLE, MAIN_TOPIC_QUESTION, "   ");

    assert!(!evaluation.is_correct);
    assert_eq!(evaluation.verdict, Verdict::InsufficientAnswer);
    assert_eq!(evaluation.feedback, INSUFFICIENT_ANSWER_FEEDBACK);
}

#[test]
fn given_answered_questions_when_regenerating_then_all_answers_are_discarded() {
    let mut session = loaded_session();
    session.generate_challenge().expect("questions");
    session
        .answer_challenge(0, "Coral reefs and bleaching")
        .expect("answer stored");
    session.evaluate_challenge(0).expect("evaluated");

    let challenge = session.regenerate_challenge().expect("questions");
    assert_eq!(challenge.questions().len(), challenge.user_answers().len());
    assert_eq!(challenge.questions().len(), challenge.evaluations().len());
    assert!(challenge.user_answers().iter().all(String::is_empty));
    assert!(challenge.evaluations().iter().all(Option::is_none));
}

#[test]
fn given_a_long_document_when_summarizing_then_at_most_the_word_budget_is_returned() {
    let sentence = format!("The key finding {}", "sediment ".repeat(80).trim_end());
    let text = vec![sentence; 8].join(". ");

    let summary = summarize(&text);
    assert!(summary.ends_with("..."));
    assert_eq!(summary.split_whitespace().count(), SUMMARY_MAX_WORDS);
}

#[test]
fn given_the_same_question_twice_when_answering_then_the_answers_match() {
    let mut session = loaded_session();
    let first = session.ask("Why are bleaching events a concern?").expect("answer");
    let second = session.ask("Why are bleaching events a concern?").expect("answer");

    assert_eq!(first, second);
    assert_eq!(session.qa_history().len(), 2);
    assert!(first.answer.contains("bleaching"));
}

#[test]
fn given_the_article_when_generating_questions_then_at_most_three_are_returned() {
    let questions = generate_questions(ARTICLE);
    assert!(!questions.is_empty());
    assert!(questions.len() <= 3);
    assert_eq!(questions[0], MAIN_TOPIC_QUESTION);
}

#[test]
fn given_messy_text_when_cleaning_then_lines_are_trimmed_and_breaks_bounded() {
    let cleaned = clean_text("  first   line  \r\n\r\n\r\n\r\n x \n\n\n\n second\tline \n");

    assert!(!cleaned.contains("\n\n\n"));
    assert!(cleaned.lines().all(|line| line == line.trim()));
    assert!(cleaned.lines().all(|line| !line.contains("  ")));
    assert!(cleaned.contains("first line"));
    assert!(cleaned.contains("second line"));
    assert!(!cleaned.lines().any(|line| line == "x"));
}

#[test]
fn given_an_oversized_upload_when_extracting_then_it_is_refused() {
    let upload = text_upload(&"a".repeat(64));
    let error = DocumentExtractor::new(16)
        .extract_text(&upload)
        .expect_err("too large");
    assert!(matches!(error, ExtractionError::TooLarge { .. }));
}
