use crate::error::PatternError;
use crate::part::Part;
use bstr::{BStr, ByteSlice};
use regex::bytes::Regex;

/// A compiled path segment of a glob
#[derive(Debug)]
pub enum Segment {
    /// `..`
    Parent,
    /// `**` standing alone between separators
    Recursive,
    Literal(String),
    Pattern(SegmentPattern),
}

/// When matching case-insensitively, the literal text in `regex` is
/// case folded and names are folded the same way before matching.
#[derive(Debug)]
pub struct SegmentPattern {
    regex: Regex,
    parts: Vec<Part>,
    case_sensitive: bool,
}

impl SegmentPattern {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

/// Full case folding, so that `straße` and `STRASSE` compare equal.
/// Names that aren't utf8 can only be folded as ASCII.
fn fold_name(name: &BStr) -> Vec<u8> {
    match name.to_str() {
        Ok(name) => caseless::default_case_fold_str(name).into_bytes(),
        Err(_) => name.to_ascii_lowercase(),
    }
}

/// If the parts are all literals, returns them combined into a string
fn collapse_literals(parts: &[Part]) -> Option<String> {
    let mut s = String::new();
    for part in parts {
        match part {
            Part::Literal(text) => s.push_str(text),
            _ => return None,
        }
    }
    Some(s)
}

impl Segment {
    pub fn compile(parts: Vec<Part>, case_sensitive: bool) -> Result<Segment, PatternError> {
        if let Some(literal) = collapse_literals(&parts) {
            return Ok(Segment::Literal(literal));
        }

        let mut pattern = String::from("^");
        for part in &parts {
            match part {
                Part::Literal(text) if !case_sensitive => {
                    Part::Literal(caseless::default_case_fold_str(text)).append_regex(&mut pattern)
                }
                _ => part.append_regex(&mut pattern),
            }
        }
        pattern.push('$');
        let regex = Regex::new(&pattern).map_err(|e| PatternError::Regex {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        Ok(Segment::Pattern(SegmentPattern {
            regex,
            parts,
            case_sensitive,
        }))
    }

    /// Test a directory entry name against this segment.
    /// `Parent` never matches an entry; `Recursive` matches any name.
    /// A `Pattern` uses the case sensitivity it was compiled with.
    pub fn is_match(&self, name: &BStr, case_sensitive: bool) -> bool {
        match self {
            Segment::Parent => false,
            Segment::Recursive => true,
            Segment::Literal(literal) => {
                if case_sensitive {
                    name.as_bytes() == literal.as_bytes()
                } else {
                    match name.to_str() {
                        Ok(name) => caseless::default_caseless_match_str(name, literal),
                        Err(_) => name.as_bytes().eq_ignore_ascii_case(literal.as_bytes()),
                    }
                }
            }
            Segment::Pattern(pattern) if pattern.case_sensitive => {
                pattern.regex.is_match(name.as_bytes())
            }
            Segment::Pattern(pattern) => pattern.regex.is_match(&fold_name(name)),
        }
    }

    pub fn is_recursive(&self) -> bool {
        matches!(self, Segment::Recursive)
    }
}
