//! Line-oriented interactive session over any reader and writer.
//!
//! The shell owns one [`SessionState`] and maps each input line onto a session operation.
//! Session errors are shown to the user and the loop continues; only I/O failures end it.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::{Evaluation, extract_keywords};
use crate::extraction::{DocumentExtractor, UploadedFile, is_placeholder};
use crate::session::{ChallengeSet, InteractionMode, SessionError, SessionState};

/// Shortest accepted question, in characters after trimming.
pub const MIN_QUESTION_CHARS: usize = 5;
/// Longest accepted question, in characters after trimming.
pub const MAX_QUESTION_CHARS: usize = 1000;
/// Number of keywords shown for a document.
pub const DOCUMENT_KEYWORDS: usize = 5;

const HELP: &str = "\
Commands:
  load <path> [mime]     process a PDF or TXT file
  summary                show the document summary
  keywords               show the most frequent document keywords
  ask <question>         answer a question from the document
  history                list previous questions, newest first
  challenge              generate comprehension questions (once)
  challenge new          discard the questions and generate new ones
  answer <n> <text>      record your answer to question n
  evaluate <n>           grade your answer to question n
  status                 show the session overview
  reset                  clear the whole session
  help                   show this message
  quit                   leave the session";

/// MIME type implied by a file extension.
pub fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("md") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Read `path` into an upload, declaring `mime` or the type implied by the extension.
pub fn read_upload(path: &Path, mime: Option<&str>) -> Result<UploadedFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Cannot read '{}'", path.display()))?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    let mime = mime.unwrap_or_else(|| guess_mime(path));
    Ok(UploadedFile::new(name, mime, bytes))
}

/// Whether user input is non-blank and between `min` and `max` characters once trimmed.
pub fn is_acceptable_input(text: &str, min: usize, max: usize) -> bool {
    let length = text.trim().chars().count();
    length > 0 && (min..=max).contains(&length)
}

/// Whitespace-collapsed `text`, cut to `max_chars` characters with an ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > max_chars {
        format!("{}...", collapsed.chars().take(max_chars).collect::<String>())
    } else {
        collapsed
    }
}

/// Pretty JSON for `value`, falling back to compact output.
pub(crate) fn serialize_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(%error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

enum Flow {
    Continue,
    Quit,
}

/// Interactive session bound to an output writer.
pub struct Shell<W: Write> {
    session: SessionState,
    extractor: DocumentExtractor,
    preview_chars: usize,
    out: W,
}

impl<W: Write> Shell<W> {
    /// Start an empty session writing to `out`.
    pub fn new(extractor: DocumentExtractor, preview_chars: usize, out: W) -> Self {
        Self {
            session: SessionState::new(),
            extractor,
            preview_chars,
            out,
        }
    }

    /// Session state held by the shell.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Process the file at `path` as the session document and show its summary.
    pub fn load(&mut self, path: &Path, mime: Option<&str>) -> Result<()> {
        let upload = match read_upload(path, mime) {
            Ok(upload) => upload,
            Err(error) => return self.report(&format!("{error:#}")),
        };

        match self.session.load_document(&self.extractor, &upload) {
            Ok(document) => {
                let name = document.name.clone();
                let readable = !is_placeholder(&document.text);
                writeln!(self.out, "Processed {name}.")?;
                if !readable {
                    writeln!(
                        self.out,
                        "Note: no readable text was found; showing the extraction notice."
                    )?;
                }
                self.show_summary()?;
                self.show_keywords()
            }
            Err(error) => self.report_session(error),
        }
    }

    /// Read commands from `input` until it ends or the user quits.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        writeln!(
            self.out,
            "docqa session {}. Type 'help' for commands.",
            self.session.session_id()
        )?;
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            if let Flow::Quit = self.execute(line.trim())? {
                break;
            }
        }
        self.out.flush().context("Failed to flush output")
    }

    fn execute(&mut self, line: &str) -> Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        tracing::debug!(command, "Shell command");

        match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => writeln!(self.out, "{HELP}")?,
            "load" => self.load_command(rest)?,
            "summary" => self.show_summary()?,
            "keywords" => self.show_keywords()?,
            "ask" => self.ask(rest)?,
            "history" => self.show_history()?,
            "challenge" => self.challenge(rest)?,
            "answer" => self.answer(rest)?,
            "evaluate" => self.evaluate(rest)?,
            "status" => {
                let snapshot = serialize_json(&self.session.snapshot());
                writeln!(self.out, "{snapshot}")?;
            }
            "reset" => {
                self.session.reset();
                writeln!(self.out, "Session cleared.")?;
            }
            other => writeln!(
                self.out,
                "Unknown command '{other}'. Type 'help' for commands."
            )?,
        }
        Ok(Flow::Continue)
    }

    fn load_command(&mut self, rest: &str) -> Result<()> {
        let mut parts = rest.split_whitespace();
        let Some(path) = parts.next() else {
            return self.report("Usage: load <path> [mime]");
        };
        let mime = parts.next().map(str::to_string);
        self.load(Path::new(path), mime.as_deref())
    }

    fn show_summary(&mut self) -> Result<()> {
        match self.session.summary() {
            Some(summary) => {
                writeln!(self.out, "Summary:\n{summary}")?;
                Ok(())
            }
            None => self.report_session(SessionError::NoDocument),
        }
    }

    fn show_keywords(&mut self) -> Result<()> {
        let Some(document) = self.session.document() else {
            return self.report_session(SessionError::NoDocument);
        };
        let keywords = extract_keywords(&document.text, DOCUMENT_KEYWORDS);
        if keywords.is_empty() {
            writeln!(self.out, "Keywords: (none)")?;
        } else {
            writeln!(self.out, "Keywords: {}", keywords.join(", "))?;
        }
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<()> {
        if !is_acceptable_input(question, MIN_QUESTION_CHARS, MAX_QUESTION_CHARS) {
            return self.report(&format!(
                "Please enter a question between {MIN_QUESTION_CHARS} and {MAX_QUESTION_CHARS} characters."
            ));
        }
        self.session.set_mode(InteractionMode::AskAnything);
        match self.session.ask(question) {
            Ok(answer) => {
                writeln!(self.out, "Answer:\n{}", answer.answer)?;
                writeln!(self.out, "Justification:\n{}", answer.justification)?;
                Ok(())
            }
            Err(error) => self.report_session(error),
        }
    }

    fn show_history(&mut self) -> Result<()> {
        let history = self.session.qa_history();
        if history.is_empty() {
            writeln!(self.out, "No questions asked yet.")?;
            return Ok(());
        }
        for (offset, record) in history.iter().enumerate().rev() {
            writeln!(
                self.out,
                "Q{}: {}",
                offset + 1,
                preview(&record.question, self.preview_chars)
            )?;
            writeln!(self.out, "  Q: {}", record.question)?;
            writeln!(self.out, "  A: {}", record.answer)?;
            writeln!(self.out, "  Justification: {}", record.justification)?;
        }
        Ok(())
    }

    fn challenge(&mut self, rest: &str) -> Result<()> {
        self.session.set_mode(InteractionMode::ChallengeMe);
        let result = if rest.eq_ignore_ascii_case("new") {
            self.session.regenerate_challenge()
        } else {
            self.session.generate_challenge()
        };
        match result {
            Ok(challenge) => write_challenge(&mut self.out, challenge),
            Err(error) => self.report_session(error),
        }
    }

    fn answer(&mut self, rest: &str) -> Result<()> {
        let (number, text) = match rest.split_once(char::is_whitespace) {
            Some((number, text)) => (number, text.trim()),
            None => (rest, ""),
        };
        let Some(index) = parse_question_number(number) else {
            return self.report("Usage: answer <n> <text> (questions are numbered from 1)");
        };
        match self.session.answer_challenge(index, text) {
            Ok(()) => {
                writeln!(self.out, "Saved answer for question {}.", index + 1)?;
                Ok(())
            }
            Err(error) => self.report_session(error),
        }
    }

    fn evaluate(&mut self, rest: &str) -> Result<()> {
        let Some(index) = parse_question_number(rest) else {
            return self.report("Usage: evaluate <n> (questions are numbered from 1)");
        };
        match self.session.evaluate_challenge(index) {
            Ok(evaluation) => write_evaluation(&mut self.out, evaluation),
            Err(error) => self.report_session(error),
        }
    }

    fn report_session(&mut self, error: SessionError) -> Result<()> {
        tracing::warn!(%error, "Session command refused");
        self.report(&error.to_string())
    }

    fn report(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "Error: {message}").context("Failed to write output")
    }
}

fn parse_question_number(text: &str) -> Option<usize> {
    text.trim()
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
}

fn write_challenge<W: Write>(out: &mut W, challenge: &ChallengeSet) -> Result<()> {
    if challenge.is_empty() {
        writeln!(out, "No questions could be generated from this document.")?;
        return Ok(());
    }
    let rows = challenge
        .questions()
        .iter()
        .zip(challenge.user_answers())
        .zip(challenge.evaluations());
    for (index, ((question, answer), evaluation)) in rows.enumerate() {
        writeln!(out, "Question {}: {question}", index + 1)?;
        if !answer.is_empty() {
            writeln!(out, "  Your answer: {answer}")?;
        }
        if let Some(evaluation) = evaluation {
            write_evaluation(out, evaluation)?;
        }
    }
    Ok(())
}

/// Render an evaluation the way the shell shows it.
pub fn write_evaluation<W: Write>(out: &mut W, evaluation: &Evaluation) -> Result<()> {
    let verdict = if evaluation.is_correct {
        "Correct!"
    } else {
        "Incorrect"
    };
    writeln!(out, "{verdict}")?;
    writeln!(out, "Feedback: {}", evaluation.feedback)?;
    writeln!(out, "Justification: {}", evaluation.justification)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_mime_from_extension() {
        assert_eq!(guess_mime(Path::new("paper.PDF")), "application/pdf");
        assert_eq!(guess_mime(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_mime(Path::new("data.json")), "application/json");
        assert_eq!(guess_mime(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn input_bounds_are_inclusive() {
        assert!(is_acceptable_input("  Why?  ", 4, 10));
        assert!(!is_acceptable_input("Why", 4, 10));
        assert!(!is_acceptable_input("   ", 0, 10));
        assert!(!is_acceptable_input(&"x".repeat(11), 4, 10));
    }

    #[test]
    fn preview_collapses_and_truncates() {
        assert_eq!(preview("a   b\n\tc", 10), "a b c");
        assert_eq!(preview("abcdefghij", 4), "abcd...");
        assert_eq!(preview("", 4), "");
    }

    #[test]
    fn question_numbers_start_at_one() {
        assert_eq!(parse_question_number("1"), Some(0));
        assert_eq!(parse_question_number(" 3 "), Some(2));
        assert_eq!(parse_question_number("0"), None);
        assert_eq!(parse_question_number("first"), None);
    }
}
