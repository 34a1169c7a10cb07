//! Error types for the translator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::span::Span;

pub type Result<T> = std::result::Result<T, TranslateError>;

/// What was wrong with a line that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("unknown token \"{0}\"")]
    UnknownToken(String),
    #[error("command missing arguments")]
    MissingArguments,
    #[error("\"{0}\" is not a command")]
    NotACommand(String),
    #[error("unknown segment \"{0}\"")]
    UnknownSegment(String),
    #[error("cannot pop into the constant segment")]
    PopConstant,
}

/// Every failure is fatal to the run that raised it.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("syntax error (line {line}): {kind}")]
    Syntax {
        line: u32,
        kind: SyntaxErrorKind,
        span: Span,
    },

    #[error("syntax error (line {line}): malformed integer \"{token}\"")]
    MalformedInteger { line: u32, token: String, span: Span },

    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no .vm input found at '{}'", path.display())]
    NoInputs { path: PathBuf },

    #[error("internal misuse: {0}")]
    Misuse(String),
}

impl TranslateError {
    pub(crate) fn syntax(kind: SyntaxErrorKind, span: Span) -> Self {
        TranslateError::Syntax {
            line: span.line,
            kind,
            span,
        }
    }

    /// Source location, for errors that came from a specific line.
    pub fn span(&self) -> Option<Span> {
        match self {
            TranslateError::Syntax { span, .. } | TranslateError::MalformedInteger { span, .. } => {
                Some(*span)
            }
            _ => None,
        }
    }

    /// 1-based source line, for errors that came from a specific line.
    pub fn line(&self) -> Option<u32> {
        self.span().map(|s| s.line)
    }
}
