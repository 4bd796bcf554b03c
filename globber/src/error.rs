use crate::fs::FsError;
use glob_lexer::{LexError, Span, TokenKind};
use thiserror::Error;

/// The pattern text could not be compiled into a `Glob`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("drive root marker `:` at {span} must directly follow a drive letter at the start of the pattern")]
    DanglingWindowsRoot { span: Span },
    #[error("`{drive}` at {span} is not a drive letter")]
    InvalidDrive { drive: String, span: Span },
    #[error("expected a path separator after the drive root, found text at {span}")]
    ExpectedSeparatorAfterDrive { span: Span },
    #[error("unexpected {kind} at {span}")]
    UnexpectedToken { kind: TokenKind, span: Span },
    #[error("error compiling regex {pattern}: {message}")]
    Regex { pattern: String, message: String },
    #[error(transparent)]
    Lex(#[from] LexError),
}

impl PatternError {
    /// The portion of the pattern that the error refers to, if any
    pub fn span(&self) -> Option<Span> {
        match self {
            PatternError::DanglingWindowsRoot { span }
            | PatternError::InvalidDrive { span, .. }
            | PatternError::ExpectedSeparatorAfterDrive { span }
            | PatternError::UnexpectedToken { span, .. } => Some(*span),
            PatternError::Lex(err) => Some(err.span),
            PatternError::Regex { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("failed to enumerate directory: {0}")]
    Enumerate(#[from] FsError),
}
