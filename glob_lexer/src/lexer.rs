use crate::errors::{LexError, LexErrorKind};
use crate::position::Span;
use crate::tokenenum::MatchResult;
use crate::{DOT_SEGMENTS, OPERATORS};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `?`
    CharacterWildcard,
    /// `*`
    Wildcard,
    /// `**`
    DirectoryWildcard,
    /// `/` or `\`
    PathSeparator,
    /// `:`, as in `C:`
    WindowsRoot,
    /// `.`, or the empty marker `\0`
    Current,
    /// `..`
    Parent,
    /// A run of literal text
    Identifier,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let text = match self {
            TokenKind::CharacterWildcard => "`?`",
            TokenKind::Wildcard => "`*`",
            TokenKind::DirectoryWildcard => "`**`",
            TokenKind::PathSeparator => "path separator",
            TokenKind::WindowsRoot => "drive root marker `:`",
            TokenKind::Current => "current directory marker",
            TokenKind::Parent => "parent directory marker `..`",
            TokenKind::Identifier => "identifier",
        };
        fmt.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The literal text; only present for `TokenKind::Identifier`
    pub value: Option<String>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            value: None,
            span,
        }
    }

    pub fn identifier<S: Into<String>>(text: S, span: Span) -> Self {
        Self {
            kind: TokenKind::Identifier,
            value: Some(text.into()),
            span,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Holds a pattern and the token stream derived from it.
/// Nothing is lexed until the stream is first read.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: String,
    tokens: Option<VecDeque<Token>>,
}

impl Tokenizer {
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        Self {
            pattern: pattern.into(),
            tokens: None,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the portion of the pattern that `token` was lexed from.
    /// `token` must have come from this tokenizer.
    pub fn source_text(&self, token: &Token) -> &str {
        &self.pattern[token.span.range()]
    }

    fn queue(&mut self) -> &mut VecDeque<Token> {
        let pattern = &self.pattern;
        self.tokens.get_or_insert_with(|| tokenize(pattern).into())
    }

    fn exhausted(&self) -> LexError {
        LexErrorKind::ExhaustedStream.at(Span::new_pos(self.pattern.len()))
    }

    /// Returns the next token without consuming it
    pub fn peek(&mut self) -> Result<&Token, LexError> {
        let err = self.exhausted();
        self.queue().front().ok_or(err)
    }

    /// Consumes and returns the next token
    pub fn scan(&mut self) -> Result<Token, LexError> {
        let err = self.exhausted();
        self.queue().pop_front().ok_or(err)
    }

    pub fn is_exhausted(&mut self) -> bool {
        self.queue().is_empty()
    }

    /// The tokens that have not been scanned yet
    pub fn remaining(&mut self) -> &VecDeque<Token> {
        self.queue()
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.scan().ok()
    }
}

fn is_segment_end(text: &str) -> bool {
    text.is_empty()
        || matches!(
            OPERATORS.matches(text),
            MatchResult::Match(TokenKind::PathSeparator, _)
        )
}

/// `.` and `..` only count when they are the whole segment;
/// otherwise the dot is part of a file name such as `readme.txt`.
fn match_dot_segment(text: &str) -> Option<(TokenKind, usize)> {
    match DOT_SEGMENTS.matches(text) {
        MatchResult::Match(kind, len) if is_segment_end(&text[len..]) => Some((kind, len)),
        _ => None,
    }
}

fn match_operator(text: &str) -> Option<(TokenKind, usize)> {
    match OPERATORS.matches(text) {
        MatchResult::Match(kind, len) => Some((kind, len)),
        MatchResult::No => None,
    }
}

/// Lex the whole of `pattern` into tokens.
/// Every byte of the pattern is covered by exactly one token, in order.
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = vec![];
    let mut cursor = 0;
    let mut identifier_start: Option<usize> = None;
    let mut segment_start = true;

    while cursor < pattern.len() {
        let rest = &pattern[cursor..];
        let matched = if segment_start {
            match_dot_segment(rest).or_else(|| match_operator(rest))
        } else {
            match_operator(rest)
        };

        match matched {
            Some((kind, len)) => {
                if let Some(start) = identifier_start.take() {
                    tokens.push(Token::identifier(
                        &pattern[start..cursor],
                        Span::new(start, cursor),
                    ));
                }
                tokens.push(Token::new(kind, Span::new(cursor, cursor + len)));
                cursor += len;
                segment_start = kind == TokenKind::PathSeparator;
            }
            None => {
                identifier_start.get_or_insert(cursor);
                segment_start = false;
                cursor += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if let Some(start) = identifier_start {
        tokens.push(Token::identifier(
            &pattern[start..],
            Span::new(start, pattern.len()),
        ));
    }

    tokens
}
