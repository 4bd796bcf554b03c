//! ## Glob matching against a directory tree
//!
//! This crate compiles file matching patterns such as
//! `./tools/**/nuget.exe` and evaluates them by walking a directory
//! tree.  Patterns are lexed by `glob_lexer` and parsed into one
//! matcher per path segment, so only the directories that can lead to
//! a match are ever listed.
//!
//! The walk goes through the `FileSystem` trait, which only needs to
//! be able to list the children of a directory.  `DiskFileSystem`
//! walks the real filesystem and `MemoryFileSystem` holds a tree in
//! memory.
//!
//! ```
//! use globber::{Glob, MemoryFileSystem};
//! use std::path::{Path, PathBuf};
//!
//! fn main() -> anyhow::Result<()> {
//!   let fs = MemoryFileSystem::with_files(&["/Working/tools/NuGet.exe"]);
//!   let glob = Glob::new("./tools/**/nuget.exe")?;
//!   assert_eq!(
//!       glob.walk_fs(&fs, Path::new("/Working"))?,
//!       vec![PathBuf::from("tools/NuGet.exe")]
//!   );
//!   Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

mod error;
mod fs;
mod options;
mod parser;
mod part;
mod segment;
mod walker;

pub use error::{MatchError, PatternError};
pub use fs::{DirEntry, DiskFileSystem, EntryKind, FileSystem, FsError, MemoryFileSystem};
pub use glob_lexer::{Span, Token, TokenKind, Tokenizer};
pub use options::{EntryTypes, MatchOptions};
pub use parser::Root;
use parser::{parse, ParsedPattern};
use segment::Segment;
use walker::Walker;

/// Represents a compiled glob expression.
///
/// Special tokens allowed in a pattern:
///
/// `?` matches exactly one character other than a path separator.
///
/// `*` matches zero or more characters within a single path segment.
///
/// `**`, when it is a whole path segment, matches zero or more
///     directories.  In the leaf position it matches every entry
///     below the directory it starts from.  When it shares a
///     segment with other text it acts the same as `*`.
///
/// `/` and `\` both separate path segments.  There is no way to
///     quote a special character.
///
/// `.` and `..` refer to the current and parent directory.
///
/// `C:` at the start of the pattern anchors it to a drive root, and a
///     leading separator anchors it to the filesystem root.
///
/// Names are compared case-insensitively unless
/// `MatchOptions::case_sensitive` is set.
#[derive(Debug)]
pub struct Glob {
    pattern: String,
    root: Root,
    segments: Vec<Segment>,
    directories_only: bool,
    matches_start: bool,
    options: MatchOptions,
}

impl Glob {
    /// Compile pattern into a `Glob` using the default options
    pub fn new(pattern: &str) -> Result<Glob, PatternError> {
        Self::with_options(pattern, MatchOptions::default())
    }

    pub fn with_options(pattern: &str, options: MatchOptions) -> Result<Glob, PatternError> {
        let ParsedPattern {
            root,
            segments,
            directories_only,
            matches_start,
        } = parse(pattern, options.case_sensitive)?;

        tracing::debug!(pattern, ?root, segments = segments.len(), "compiled glob");

        Ok(Glob {
            pattern: pattern.to_owned(),
            root,
            segments,
            directories_only,
            matches_start,
            options,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Returns true if the pattern contains `**` as a whole segment,
    /// which means that evaluating it may walk an entire subtree.
    pub fn is_recursive(&self) -> bool {
        self.segments.iter().any(Segment::is_recursive)
    }

    /// Evaluate the glob against `fs`.
    /// Relative patterns are evaluated starting at `path` and produce
    /// paths relative to it; rooted patterns ignore `path` and produce
    /// absolute paths.  The results are sorted and contain no duplicates.
    pub fn walk_fs<F, P>(&self, fs: &F, path: P) -> Result<Vec<PathBuf>, MatchError>
    where
        F: FileSystem + ?Sized,
        P: AsRef<Path>,
    {
        let (walk_root, start) = match &self.root {
            Root::Relative => (path.as_ref(), PathBuf::new()),
            Root::Absolute => (Path::new(""), PathBuf::from("/")),
            Root::Drive(drive) => (Path::new(""), PathBuf::from(format!("{}/", drive))),
        };
        Walker::new(self, fs, walk_root).run(start)
    }

    /// Walk the real filesystem starting at `path` and execute the glob.
    pub fn try_walk<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PathBuf>, MatchError> {
        self.walk_fs(&DiskFileSystem::default(), path)
    }

    /// Walk the real filesystem starting at `path` and execute the glob.
    /// Returns all matching entries in sorted order.  A failed walk,
    /// which can only happen with `MatchOptions::strict`, is logged and
    /// produces no entries.
    pub fn walk<P: AsRef<Path>>(&self, path: P) -> Vec<PathBuf> {
        match self.try_walk(path) {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!("{}: {}", self.pattern, err);
                vec![]
            }
        }
    }
}

impl std::fmt::Display for Glob {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        fmt.write_str(&self.pattern)
    }
}

/// Expand `pattern` relative to `root` on the real filesystem
pub fn glob<P: AsRef<Path>>(pattern: &str, root: P) -> anyhow::Result<Vec<PathBuf>> {
    let glob = Glob::new(pattern)?;
    Ok(glob.try_walk(root)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    fn nuget_tree() -> MemoryFileSystem {
        MemoryFileSystem::with_files(&[
            "/Working/tools/NuGet.exe",
            "/Working/tools/sub/NuGet.exe",
            "/Working/tools/sub/readme.txt",
            "/Working/build.cake",
        ])
    }

    #[test]
    fn nuget_scenario() -> anyhow::Result<()> {
        let fs = nuget_tree();
        let glob = Glob::new("./tools/**/nuget.exe")?;
        assert_eq!(
            glob.walk_fs(&fs, "/Working")?,
            paths(&["tools/NuGet.exe", "tools/sub/NuGet.exe"])
        );

        let glob = Glob::new("./tools/*.exe")?;
        assert_eq!(glob.walk_fs(&fs, "/Working")?, paths(&["tools/NuGet.exe"]));
        Ok(())
    }

    #[test]
    fn absolute_patterns() -> anyhow::Result<()> {
        let fs = nuget_tree();
        let glob = Glob::new("/Working/tools/**/NuGet.exe")?;
        assert_eq!(glob.root(), &Root::Absolute);
        assert_eq!(
            glob.walk_fs(&fs, "/elsewhere")?,
            paths(&["/Working/tools/NuGet.exe", "/Working/tools/sub/NuGet.exe"])
        );
        assert_eq!(Glob::new("/")?.walk_fs(&fs, "/Working")?, paths(&["/"]));
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn drive_patterns() -> anyhow::Result<()> {
        let fs = MemoryFileSystem::with_files(&["C:/Program Files/tool.exe", "D:/tool.exe"]);
        let glob = Glob::new("c:\\Program Files\\*.exe")?;
        assert_eq!(glob.root(), &Root::Drive("c:".into()));
        assert_eq!(
            Glob::new("C:/*/*.exe")?.walk_fs(&fs, "")?,
            paths(&["C:/Program Files/tool.exe"])
        );
        Ok(())
    }

    #[test]
    fn case_sensitivity() -> anyhow::Result<()> {
        let fs = nuget_tree();
        let options = MatchOptions {
            case_sensitive: true,
            ..Default::default()
        };
        let glob = Glob::with_options("tools/**/nuget.exe", options.clone())?;
        assert_eq!(glob.walk_fs(&fs, "/Working")?, Vec::<PathBuf>::new());

        let glob = Glob::with_options("tools/**/NuGet.*", options)?;
        assert_eq!(
            glob.walk_fs(&fs, "/Working")?,
            paths(&["tools/NuGet.exe", "tools/sub/NuGet.exe"])
        );

        let glob = Glob::new("TOOLS/SUB/*.TXT")?;
        assert_eq!(
            glob.walk_fs(&fs, "/Working")?,
            paths(&["tools/sub/readme.txt"])
        );
        Ok(())
    }

    #[test]
    fn wildcards_do_not_change_case_folding() -> anyhow::Result<()> {
        let fs = MemoryFileSystem::with_files(&["/r/STRASSE"]);
        assert_eq!(Glob::new("straße")?.walk_fs(&fs, "/r")?, paths(&["STRASSE"]));
        assert_eq!(Glob::new("straße*")?.walk_fs(&fs, "/r")?, paths(&["STRASSE"]));
        assert_eq!(Glob::new("stra?e")?.walk_fs(&fs, "/r")?, Vec::<PathBuf>::new());
        Ok(())
    }

    #[test]
    fn accessors() -> anyhow::Result<()> {
        let options = MatchOptions {
            max_depth: Some(3),
            ..Default::default()
        };
        let glob = Glob::with_options("tools/*.exe", options.clone())?;
        assert_eq!(glob.pattern(), "tools/*.exe");
        assert_eq!(glob.to_string(), "tools/*.exe");
        assert_eq!(glob.options(), &options);
        assert!(!glob.is_recursive());
        Ok(())
    }

    #[test]
    fn recursive_wildcard_matches_zero_or_more_directories() -> anyhow::Result<()> {
        let fs = MemoryFileSystem::with_files(&["/r/a/b", "/r/a/x/y/b", "/r/a/x/c"]);
        let glob = Glob::new("a/**/b")?;
        assert!(glob.is_recursive());
        assert_eq!(glob.walk_fs(&fs, "/r")?, paths(&["a/b", "a/x/y/b"]));

        let glob = Glob::new("**/**/b")?;
        assert_eq!(glob.walk_fs(&fs, "/r")?, paths(&["a/b", "a/x/y/b"]));
        Ok(())
    }

    #[test]
    fn trailing_recursive_wildcard() -> anyhow::Result<()> {
        let fs = MemoryFileSystem::with_files(&["/r/a/b", "/r/a/x/y/b", "/r/c"]);
        let glob = Glob::new("a/**")?;
        assert_eq!(
            glob.walk_fs(&fs, "/r")?,
            paths(&["a/b", "a/x", "a/x/y", "a/x/y/b"])
        );
        Ok(())
    }

    #[test]
    fn character_wildcard() -> anyhow::Result<()> {
        let fs = MemoryFileSystem::with_files(&["/r/ab", "/r/abc", "/r/abcd", "/r/a/c"]);
        let glob = Glob::new("a?c")?;
        assert_eq!(glob.walk_fs(&fs, "/r")?, paths(&["abc"]));
        let glob = Glob::new("ab?")?;
        assert_eq!(glob.walk_fs(&fs, "/r")?, paths(&["abc"]));
        Ok(())
    }

    #[test]
    fn parent_and_current() -> anyhow::Result<()> {
        let fs = MemoryFileSystem::with_files(&["/r/a/one.txt", "/r/b/two.txt"]);
        let glob = Glob::new("./a/../b/*.txt")?;
        assert_eq!(glob.walk_fs(&fs, "/r")?, paths(&["a/../b/two.txt"]));

        let glob = Glob::new("../*/*.txt")?;
        assert_eq!(
            glob.walk_fs(&fs, "/r/a")?,
            paths(&["../a/one.txt", "../b/two.txt"])
        );

        assert_eq!(Glob::new(".")?.walk_fs(&fs, "/r")?, paths(&["."]));
        assert_eq!(Glob::new("..")?.walk_fs(&fs, "/r/a")?, paths(&[".."]));
        assert_eq!(Glob::new("")?.walk_fs(&fs, "/r")?, Vec::<PathBuf>::new());
        Ok(())
    }

    #[test]
    fn entry_type_filters() -> anyhow::Result<()> {
        let fs = nuget_tree();
        let files = MatchOptions {
            entry_types: EntryTypes::Files,
            ..Default::default()
        };
        let dirs = MatchOptions {
            entry_types: EntryTypes::Directories,
            ..Default::default()
        };
        assert_eq!(
            Glob::with_options("tools/*", files)?.walk_fs(&fs, "/Working")?,
            paths(&["tools/NuGet.exe"])
        );
        assert_eq!(
            Glob::with_options("tools/*", dirs)?.walk_fs(&fs, "/Working")?,
            paths(&["tools/sub"])
        );
        assert_eq!(
            Glob::new("tools/*/")?.walk_fs(&fs, "/Working")?,
            paths(&["tools/sub"])
        );
        Ok(())
    }

    #[test]
    fn max_depth_bounds_the_walk() -> anyhow::Result<()> {
        let fs = MemoryFileSystem::with_files(&["/r/a.txt", "/r/x/b.txt", "/r/x/y/c.txt"]);
        let options = MatchOptions {
            max_depth: Some(2),
            ..Default::default()
        };
        let glob = Glob::with_options("**/*.txt", options)?;
        assert_eq!(glob.walk_fs(&fs, "/r")?, paths(&["a.txt", "x/b.txt"]));

        let options = MatchOptions {
            max_depth: Some(0),
            ..Default::default()
        };
        let glob = Glob::with_options("*", options)?;
        assert_eq!(glob.walk_fs(&fs, "/r")?, Vec::<PathBuf>::new());
        Ok(())
    }

    #[test]
    fn unreadable_subtrees() -> anyhow::Result<()> {
        let mut fs = MemoryFileSystem::with_files(&["/r/ok/a.txt", "/r/locked/b.txt"]);
        fs.deny_access("/r/locked");

        let glob = Glob::new("**/*.txt")?;
        assert_eq!(glob.walk_fs(&fs, "/r")?, paths(&["ok/a.txt"]));

        let strict = MatchOptions {
            strict: true,
            ..Default::default()
        };
        let glob = Glob::with_options("**/*.txt", strict)?;
        match glob.walk_fs(&fs, "/r") {
            Err(MatchError::Enumerate(FsError::PermissionDenied(path))) => {
                assert_eq!(path, PathBuf::from("/r/locked"))
            }
            other => panic!("expected a permission error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn missing_start_directory() -> anyhow::Result<()> {
        let fs = nuget_tree();
        let strict = MatchOptions {
            strict: true,
            ..Default::default()
        };
        let glob = Glob::with_options("**/*", strict)?;
        assert_eq!(glob.walk_fs(&fs, "/nowhere")?, Vec::<PathBuf>::new());
        Ok(())
    }

    #[test]
    fn bare_directory_patterns_need_the_directory() -> anyhow::Result<()> {
        let fs = MemoryFileSystem::with_files(&["/r/a.txt"]);
        let none = Vec::<PathBuf>::new();
        assert_eq!(Glob::new(".")?.walk_fs(&fs, "/nowhere")?, none);
        assert_eq!(Glob::new("..")?.walk_fs(&fs, "/nowhere")?, none);
        assert_eq!(Glob::new("../*.txt")?.walk_fs(&fs, "/r/nowhere")?, none);
        assert_eq!(Glob::new("Q:")?.walk_fs(&fs, "/r")?, none);
        assert_eq!(Glob::new("./")?.walk_fs(&fs, "/r/a.txt")?, none);

        assert_eq!(Glob::new(".")?.walk_fs(&fs, "/r")?, paths(&["."]));
        assert_eq!(Glob::new("/")?.walk_fs(&fs, "/nowhere")?, paths(&["/"]));
        Ok(())
    }

    #[test]
    fn pattern_errors() {
        assert_eq!(
            Glob::new("tools/C:/x").unwrap_err(),
            PatternError::DanglingWindowsRoot {
                span: Span::new(7, 8)
            }
        );
        assert!(glob("a:b", ".").is_err());
    }

    fn make_dirs_in(root: &TempDir, dirs: &[&str]) -> anyhow::Result<()> {
        for d in dirs {
            let p = root.path().join(d);
            std::fs::create_dir_all(p)?;
        }
        Ok(())
    }

    fn touch_file<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
        let _file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path.as_ref())?;
        Ok(())
    }

    fn touch_files_in(root: &TempDir, files: &[&str]) -> anyhow::Result<()> {
        for f in files {
            let p = root.path().join(f);
            if let Some(d) = p.parent() {
                std::fs::create_dir_all(d)?;
            }
            touch_file(p)?;
        }
        Ok(())
    }

    #[test]
    fn disk_nuget_scenario() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        touch_files_in(&root, &["tools/NuGet.exe", "tools/sub/NuGet.exe"])?;

        let glob = Glob::new("./tools/**/nuget.exe")?;
        assert_eq!(
            glob.walk(&root),
            paths(&["tools/NuGet.exe", "tools/sub/NuGet.exe"])
        );
        assert_eq!(
            crate::glob("./tools/*.exe", root.path())?,
            paths(&["tools/NuGet.exe"])
        );
        Ok(())
    }

    #[test]
    fn spaces_and_parens() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        touch_files_in(&root, &["Program Files (x86)/Foo Bar/baz.exe"])?;

        let glob = Glob::new("Program Files (x86)/*")?;
        assert_eq!(glob.walk(&root), paths(&["Program Files (x86)/Foo Bar"]));

        let glob = Glob::new("Program Files (x86)\\*\\*.exe")?;
        assert_eq!(
            glob.walk(&root),
            paths(&["Program Files (x86)/Foo Bar/baz.exe"])
        );
        Ok(())
    }

    #[test]
    fn disk_doublestar() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        make_dirs_in(&root, &["empty"])?;
        touch_files_in(
            &root,
            &["foo/src/foo.rs", "bar/src/bar.rs", "woot/woot.rs"],
        )?;
        let glob = Glob::new("**/*.rs")?;
        assert_eq!(
            glob.walk(&root),
            paths(&["bar/src/bar.rs", "foo/src/foo.rs", "woot/woot.rs"])
        );

        let glob = Glob::new("*/")?;
        assert_eq!(glob.walk(&root), paths(&["bar", "empty", "foo", "woot"]));
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn symlink_cycles_terminate() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        touch_files_in(&root, &["a/file.txt"])?;
        std::os::unix::fs::symlink(root.path().join("a"), root.path().join("a/loop"))?;

        let glob = Glob::new("**/*.txt")?;
        let results = glob.walk(&root);
        assert!(results.contains(&PathBuf::from("a/file.txt")));
        assert!(results.len() < 4);
        Ok(())
    }
}
