use regex::Regex;
use std::collections::HashMap;

/// Declares a lazily compiled `LiteralMatcher` static from an ordered
/// table of `"trigger": Variant` entries of an existing enum.
macro_rules! TokenTable {
    ($Matcher:ident, $Enum:ident, $(
            $text:literal : $variant:ident
        ),+) => {

lazy_static::lazy_static! {
    pub(crate) static ref $Matcher: $crate::tokenenum::LiteralMatcher<$Enum> = {
        $crate::tokenenum::LiteralMatcher::new(&[
            $(
                ($text, $Enum::$variant)
            ),+
        ])
    };
}

    }
}

/// Matches the longest trigger from a fixed table against the start
/// of some text.
#[derive(Debug)]
pub struct LiteralMatcher<T: Copy> {
    re: Regex,
    map: HashMap<&'static str, T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult<T: Copy> {
    Match(T, usize),
    No,
}

impl<T: Copy> LiteralMatcher<T> {
    /// Build a matcher from an ordered table.
    /// The longest trigger always wins.  Triggers of the same length
    /// keep their declaration order, so a trigger that appears more
    /// than once resolves to its first entry.
    pub fn new(literals: &[(&'static str, T)]) -> Self {
        let mut ordered: Vec<&(&'static str, T)> = literals.iter().collect();
        // stable, so equal lengths keep declaration order
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut pattern = String::new();
        let mut map = HashMap::new();
        pattern.push_str("^(?:");
        for (idx, entry) in ordered.iter().enumerate() {
            let (text, value) = **entry;
            if idx > 0 {
                pattern.push('|');
            }
            pattern.push_str(&regex::escape(text));
            map.entry(text).or_insert(value);
        }
        pattern.push(')');

        Self {
            re: Regex::new(&pattern).expect("literal table to compile"),
            map,
        }
    }

    pub fn lookup(&self, text: &str) -> Option<T> {
        self.map.get(text).copied()
    }

    pub fn matches(&self, text: &str) -> MatchResult<T> {
        match self.re.find(text) {
            Some(m) if !m.as_str().is_empty() => match self.lookup(m.as_str()) {
                Some(value) => MatchResult::Match(value, m.end()),
                None => MatchResult::No,
            },
            _ => MatchResult::No,
        }
    }
}
