use crate::fs::EntryKind;

/// Which kinds of entries a walk reports
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EntryTypes {
    #[default]
    All,
    Files,
    Directories,
}

impl EntryTypes {
    pub fn accepts(self, kind: EntryKind) -> bool {
        match self {
            EntryTypes::All => true,
            EntryTypes::Files => kind == EntryKind::File,
            EntryTypes::Directories => kind == EntryKind::Directory,
        }
    }
}

/// Controls how a `Glob` is compiled and walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare names exactly rather than case-insensitively
    pub case_sensitive: bool,
    pub entry_types: EntryTypes,
    /// Don't look at entries more than this many directories below
    /// the starting directory
    pub max_depth: Option<usize>,
    /// Fail the walk on the first directory that can't be read,
    /// instead of skipping it
    pub strict: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            entry_types: EntryTypes::All,
            max_depth: None,
            strict: false,
        }
    }
}
