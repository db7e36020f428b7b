#![deny(missing_docs)]

//! Core library for the docqa document assistant.

/// Extractive summaries, keyword answers, question generation, and grading.
pub mod analysis;
/// Command-line parsing and one-shot command dispatch.
pub mod cli;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from uploaded PDF and plain-text files.
pub mod extraction;
/// Containment of internal faults inside analysis operations.
pub mod fault;
/// Structured logging and tracing setup.
pub mod logging;
/// Per-session document, history, and challenge state.
pub mod session;
/// Interactive line-oriented session.
pub mod shell;
