//! Command-line surface: one-shot document commands plus the interactive session.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::analysis::{
    self, Answer, Evaluation, answer_question, evaluate_answer, extract_keywords,
    generate_questions,
};
use crate::config::Config;
use crate::extraction::DocumentExtractor;
use crate::shell::{DOCUMENT_KEYWORDS, Shell, read_upload, serialize_json, write_evaluation};

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(
    name = "docqa",
    version,
    about = "Summarize, question, and quiz yourself on PDF and TXT documents"
)]
pub struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Command,
}

/// Document file argument shared by every one-shot command.
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// Path to a PDF or TXT document.
    pub file: PathBuf,
    /// Declared MIME type; guessed from the extension when omitted.
    #[arg(long)]
    pub mime: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the extracted document text.
    Extract {
        /// Document to read.
        #[command(flatten)]
        document: DocumentArgs,
    },
    /// Print the extractive summary and top keywords.
    Summarize {
        /// Document to read.
        #[command(flatten)]
        document: DocumentArgs,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Answer a question from the document.
    Ask {
        /// Document to read.
        #[command(flatten)]
        document: DocumentArgs,
        /// Question words; joined with spaces.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print generated comprehension questions.
    Questions {
        /// Document to read.
        #[command(flatten)]
        document: DocumentArgs,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Grade an answer to a question against the document.
    Evaluate {
        /// Document to read.
        #[command(flatten)]
        document: DocumentArgs,
        /// Question being answered.
        #[arg(long)]
        question: String,
        /// Answer to grade.
        #[arg(long)]
        answer: String,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive session, optionally loading a document first.
    Session {
        /// Document to load before the first prompt.
        file: Option<PathBuf>,
        /// Declared MIME type for `file`.
        #[arg(long)]
        mime: Option<String>,
    },
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    summary: &'a str,
    keywords: &'a [String],
}

#[derive(Serialize)]
struct QuestionOutput<'a> {
    question: &'a str,
    #[serde(flatten)]
    answer: &'a Answer,
}

impl Cli {
    /// Execute the parsed command against the process stdin and stdout.
    pub fn run(self, config: &Config) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        execute(self.command, config, stdin.lock(), stdout.lock())
    }
}

/// Execute `command`, reading interactive input from `input` and writing results to `out`.
pub fn execute<R: BufRead, W: Write>(
    command: Command,
    config: &Config,
    input: R,
    mut out: W,
) -> Result<()> {
    let extractor = DocumentExtractor::new(config.max_upload_bytes);
    tracing::debug!(?command, "Running command");

    match command {
        Command::Extract { document } => {
            let text = extract(&extractor, &document)?;
            writeln!(out, "{text}")?;
        }
        Command::Summarize { document, json } => {
            let text = extract(&extractor, &document)?;
            let summary = analysis::summarize(&text);
            let keywords = extract_keywords(&text, DOCUMENT_KEYWORDS);
            if json {
                let output = SummaryOutput {
                    summary: &summary,
                    keywords: &keywords,
                };
                writeln!(out, "{}", serialize_json(&output))?;
            } else {
                writeln!(out, "{summary}")?;
                if !keywords.is_empty() {
                    writeln!(out, "\nKeywords: {}", keywords.join(", "))?;
                }
            }
        }
        Command::Ask {
            document,
            question,
            json,
        } => {
            let text = extract(&extractor, &document)?;
            let question = question.join(" ");
            let mut history = Vec::new();
            let answer = answer_question(&text, &question, &mut history);
            if json {
                let output = QuestionOutput {
                    question: &question,
                    answer: &answer,
                };
                writeln!(out, "{}", serialize_json(&output))?;
            } else {
                writeln!(out, "{}", answer.answer)?;
                writeln!(out, "\nJustification: {}", answer.justification)?;
            }
        }
        Command::Questions { document, json } => {
            let text = extract(&extractor, &document)?;
            let questions = generate_questions(&text);
            if json {
                writeln!(out, "{}", serialize_json(&questions))?;
            } else if questions.is_empty() {
                writeln!(out, "No questions could be generated from this document.")?;
            } else {
                for (index, question) in questions.iter().enumerate() {
                    writeln!(out, "{}. {question}", index + 1)?;
                }
            }
        }
        Command::Evaluate {
            document,
            question,
            answer,
            json,
        } => {
            let text = extract(&extractor, &document)?;
            let evaluation: Evaluation = evaluate_answer(&text, &question, &answer);
            if json {
                writeln!(out, "{}", serialize_json(&evaluation))?;
            } else {
                write_evaluation(&mut out, &evaluation)?;
            }
        }
        Command::Session { file, mime } => {
            let mut shell = Shell::new(extractor, config.preview_chars, out);
            if let Some(path) = file {
                shell.load(&path, mime.as_deref())?;
            }
            return shell.run(input);
        }
    }

    out.flush().context("Failed to flush output")
}

fn extract(extractor: &DocumentExtractor, document: &DocumentArgs) -> Result<String> {
    let upload = read_upload(&document.file, document.mime.as_deref())?;
    extractor
        .extract_text(&upload)
        .with_context(|| format!("Failed to process '{}'", display_name(&document.file)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_joins_question_words() {
        let cli = Cli::try_parse_from(["docqa", "ask", "notes.txt", "what", "is", "this"])
            .expect("parse");
        match cli.command {
            Command::Ask {
                document, question, ..
            } => {
                assert_eq!(document.file, PathBuf::from("notes.txt"));
                assert_eq!(question.join(" "), "what is this");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["docqa", "ask", "notes.txt"]).is_err());
    }

    #[test]
    fn session_file_is_optional() {
        let cli = Cli::try_parse_from(["docqa", "session"]).expect("parse");
        assert!(matches!(cli.command, Command::Session { file: None, .. }));
    }
}
