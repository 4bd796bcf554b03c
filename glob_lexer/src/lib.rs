//! Tokenizer for file matching glob patterns such as `./tools/**/*.exe`.
//!
//! The `Tokenizer` turns a pattern into a stream of `Token`s that a
//! parser pulls from with `peek` and `scan`.  Tokens are produced in a
//! single pass the first time the stream is read and cached afterwards.
//!
//! ```
//! use glob_lexer::{Tokenizer, TokenKind};
//!
//! let mut tokenizer = Tokenizer::new("tools/*.exe");
//! assert_eq!(Tokenizer::scan(&mut tokenizer).unwrap().value(), Some("tools"));
//! assert_eq!(tokenizer.peek().unwrap().kind, TokenKind::PathSeparator);
//! ```
mod errors;
mod lexer;
mod position;
#[macro_use]
mod tokenenum;

pub use errors::{LexError, LexErrorKind};
pub use lexer::{tokenize, Token, TokenKind, Tokenizer};
pub use position::Span;
pub use tokenenum::{LiteralMatcher, MatchResult};

TokenTable!(
    OPERATORS,
    TokenKind,
    "**": DirectoryWildcard,
    "*": Wildcard,
    "?": CharacterWildcard,
    "/": PathSeparator,
    "\\": PathSeparator,
    ":": WindowsRoot,
    "\0": Current
);

// Only recognized when they make up a whole path segment
TokenTable!(
    DOT_SEGMENTS,
    TokenKind,
    "..": Parent,
    ".": Current
);
