use crate::span::Span;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a cursor offset cannot be completed. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidCursorReason {
    NoCompletionInsideString,
    NoCompletionInsideCharacter,
    NoCompletionInsideNumber,
    NoCompletionInsideComment,
}

impl InvalidCursorReason {
    pub fn code(self) -> &'static str {
        match self {
            InvalidCursorReason::NoCompletionInsideString => "NO_COMPLETION_INSIDE_STRING",
            InvalidCursorReason::NoCompletionInsideCharacter => "NO_COMPLETION_INSIDE_CHARACTER",
            InvalidCursorReason::NoCompletionInsideNumber => "NO_COMPLETION_INSIDE_NUMBER",
            InvalidCursorReason::NoCompletionInsideComment => "NO_COMPLETION_INSIDE_COMMENT",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            InvalidCursorReason::NoCompletionInsideString => "string literal",
            InvalidCursorReason::NoCompletionInsideCharacter => "character literal",
            InvalidCursorReason::NoCompletionInsideNumber => "numeric literal",
            InvalidCursorReason::NoCompletionInsideComment => "comment",
        }
    }
}

impl fmt::Display for InvalidCursorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Invalid cursor location: {reason}")]
    InvalidCursorLocation {
        reason: InvalidCursorReason,
        offset: usize,
        /// The token that swallowed the cursor.
        span: Span,
    },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error("I/O error: {msg}")]
    Io { msg: String, path: PathBuf },
}

impl CompletionError {
    pub fn invalid_location(reason: InvalidCursorReason, offset: usize, span: Span) -> Self {
        Self::InvalidCursorLocation { reason, offset, span }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }

    pub fn io(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Io { msg: msg.into(), path }
    }

    /// The reason code when this is a cursor-classification failure.
    pub fn reason(&self) -> Option<InvalidCursorReason> {
        match self {
            CompletionError::InvalidCursorLocation { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Render a CompletionError with ariadne for terminal output.
pub fn render_error(source: &str, filename: &str, err: &CompletionError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    match err {
        CompletionError::InvalidCursorLocation { reason, offset, span } => {
            let report = Report::build(ReportKind::Error, filename, *offset)
                .with_code(reason.code())
                .with_message(format!("no completion inside a {}", reason.describe()))
                .with_label(
                    Label::new((filename, span.start..span.end))
                        .with_message(format!("cursor at offset {offset} falls inside this token"))
                        .with_color(Color::Red),
                )
                .finish();
            if let Err(e) = report.eprint((filename, Source::from(source))) {
                eprintln!("error[{}]: {err} ({e})", reason.code());
            }
        }
        CompletionError::Config { msg, path } => {
            eprintln!("error[config]: {msg}");
            eprintln!("  --> {}", path.display());
        }
        CompletionError::Io { msg, path } => {
            eprintln!("error[io]: {msg}");
            eprintln!("  --> {}", path.display());
        }
    }
}
