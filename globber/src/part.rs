/// One piece of a path segment that contains wildcards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Literal(String),
    /// `?`
    Any,
    /// `*`, or `**` when it shares a segment with other text
    ZeroOrMore,
}

impl Part {
    /// Append a regex representation of Part to the supplied pattern string
    pub fn append_regex(&self, pattern: &mut String) {
        match self {
            Part::Literal(text) => pattern.push_str(&regex::escape(text)),
            // exactly one character, and never a separator.  A stray
            // byte from a non-utf8 name counts as a character.
            Part::Any => pattern.push_str(r"(?:[^/\\]|(?-u:[\x80-\xFF]))"),
            Part::ZeroOrMore => pattern.push_str(r"(?-u:[^/\\])*"),
        }
    }
}
