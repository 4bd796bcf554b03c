use crate::error::PatternError;
use crate::part::Part;
use crate::segment::Segment;
use glob_lexer::{Token, TokenKind, Tokenizer};

/// Where a glob starts walking from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    /// Relative to the directory passed to the walk
    Relative,
    /// `/`
    Absolute,
    /// A drive root such as `C:`
    Drive(String),
}

#[derive(Debug)]
pub struct ParsedPattern {
    pub root: Root,
    pub segments: Vec<Segment>,
    /// The pattern ended with a separator, so only directories match
    pub directories_only: bool,
    /// The pattern named its starting point and nothing else,
    /// as `.` or `/` do
    pub matches_start: bool,
}

/// Drives a `Tokenizer` with single token lookahead and builds
/// the segments of a glob.
pub struct Parser<'a> {
    tokenizer: &'a mut Tokenizer,
    case_sensitive: bool,
    root: Root,
    segments: Vec<Segment>,
    segment_count: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: &'a mut Tokenizer, case_sensitive: bool) -> Self {
        Self {
            tokenizer,
            case_sensitive,
            root: Root::Relative,
            segments: vec![],
            segment_count: 0,
        }
    }

    /// Main entry point to the parser
    pub fn parse(mut self) -> Result<ParsedPattern, PatternError> {
        let empty = self.tokenizer.is_exhausted();
        let mut trailing_separator = false;

        if self.peek_kind() == Some(TokenKind::PathSeparator) {
            self.tokenizer.scan()?;
            self.root = Root::Absolute;
        }

        while let Some(kind) = self.peek_kind() {
            if kind == TokenKind::PathSeparator {
                // Repeated separators produce empty segments; skip them
                self.tokenizer.scan()?;
                trailing_separator = true;
                continue;
            }
            trailing_separator = false;
            self.segment()?;
        }

        let matches_start = !empty && self.segments.is_empty();
        Ok(ParsedPattern {
            root: self.root,
            segments: self.segments,
            directories_only: trailing_separator,
            matches_start,
        })
    }
}

impl<'a> Parser<'a> {
    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.tokenizer.peek().ok().map(|token| token.kind)
    }

    fn at_segment_end(&mut self) -> bool {
        matches!(self.peek_kind(), None | Some(TokenKind::PathSeparator))
    }

    /// Parse the tokens up to the next separator
    fn segment(&mut self) -> Result<(), PatternError> {
        self.segment_count += 1;
        let first = self.tokenizer.scan()?;

        match first.kind {
            TokenKind::Current if self.at_segment_end() => return Ok(()),
            TokenKind::Parent if self.at_segment_end() => {
                self.segments.push(Segment::Parent);
                return Ok(());
            }
            TokenKind::DirectoryWildcard if self.at_segment_end() => {
                self.segments.push(Segment::Recursive);
                return Ok(());
            }
            TokenKind::Identifier if self.peek_kind() == Some(TokenKind::WindowsRoot) => {
                let colon = self.tokenizer.scan()?;
                return self.drive(first, colon);
            }
            _ => {}
        }

        let mut parts = vec![];
        push_part(&mut parts, first)?;
        while !self.at_segment_end() {
            let token = self.tokenizer.scan()?;
            push_part(&mut parts, token)?;
        }

        self.segments.push(Segment::compile(parts, self.case_sensitive)?);
        Ok(())
    }

    /// `C:` is only meaningful as the very first thing in the pattern
    fn drive(&mut self, letter: Token, colon: Token) -> Result<(), PatternError> {
        if self.segment_count != 1 || self.root != Root::Relative {
            return Err(PatternError::DanglingWindowsRoot { span: colon.span });
        }

        let drive = letter.value().unwrap_or_default();
        let mut chars = drive.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {}
            _ => {
                return Err(PatternError::InvalidDrive {
                    drive: drive.to_owned(),
                    span: letter.span,
                })
            }
        }

        if !self.at_segment_end() {
            let span = self.tokenizer.peek()?.span;
            return Err(PatternError::ExpectedSeparatorAfterDrive { span });
        }

        self.root = Root::Drive(format!("{}:", drive));
        Ok(())
    }
}

fn push_part(parts: &mut Vec<Part>, token: Token) -> Result<(), PatternError> {
    match token.kind {
        TokenKind::Identifier => parts.push(Part::Literal(token.value.unwrap_or_default())),
        TokenKind::Wildcard | TokenKind::DirectoryWildcard => parts.push(Part::ZeroOrMore),
        TokenKind::CharacterWildcard => parts.push(Part::Any),
        // The empty marker contributes nothing to a name
        TokenKind::Current => {}
        TokenKind::WindowsRoot => {
            return Err(PatternError::DanglingWindowsRoot { span: token.span })
        }
        TokenKind::Parent | TokenKind::PathSeparator => {
            return Err(PatternError::UnexpectedToken {
                kind: token.kind,
                span: token.span,
            })
        }
    }
    Ok(())
}

/// Parse a pattern string
pub fn parse(pattern: &str, case_sensitive: bool) -> Result<ParsedPattern, PatternError> {
    let mut tokenizer = Tokenizer::new(pattern);
    Parser::new(&mut tokenizer, case_sensitive).parse()
}
