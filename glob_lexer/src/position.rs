use std::fmt::{Display, Error, Formatter};
use std::ops::Range;

/// The byte range of the pattern text that a token was lexed from.
/// `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span sitting at `pos`
    pub fn new_pos(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Display for Span {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), Error> {
        if self.len() <= 1 {
            write!(fmt, "column {}", self.start)
        } else {
            write!(fmt, "column {} thru {}", self.start, self.end - 1)
        }
    }
}
