use crate::error::MatchError;
use crate::fs::{DirEntry, EntryKind, FileSystem, FsError};
use crate::segment::Segment;
use crate::Glob;
use bstr::{BStr, ByteSlice};
use std::path::{Path, PathBuf};

/// Evaluates a `Glob` by descending through a `FileSystem` one
/// segment at a time.  Paths are accumulated relative to the walk
/// root (or absolute, for rooted globs) and only joined onto the
/// walk root when the filesystem needs to be consulted.
pub(crate) struct Walker<'a, F: FileSystem + ?Sized> {
    glob: &'a Glob,
    fs: &'a F,
    walk_root: &'a Path,
    /// Canonical paths of the directories currently being expanded
    /// by `**`
    ancestors: Vec<Option<PathBuf>>,
    results: Vec<PathBuf>,
}

impl<'a, F: FileSystem + ?Sized> Walker<'a, F> {
    pub fn new(glob: &'a Glob, fs: &'a F, walk_root: &'a Path) -> Self {
        Self {
            glob,
            fs,
            walk_root,
            ancestors: vec![],
            results: vec![],
        }
    }

    /// Walk the whole glob and return the sorted, de-duplicated matches
    pub fn run(mut self, start: PathBuf) -> Result<Vec<PathBuf>, MatchError> {
        let glob = self.glob;
        if glob.matches_start {
            if !self.is_dir(&start) {
                return Ok(vec![]);
            }
            let start = if start.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                start
            };
            self.emit(start, EntryKind::Directory);
        } else {
            self.walk(start, &glob.segments, 0)?;
        }

        let mut results = self.results;
        results.sort();
        results.dedup();
        Ok(results)
    }

    fn fs_path(&self, path: &Path) -> PathBuf {
        self.walk_root.join(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.fs.is_dir(&self.fs_path(path))
    }

    fn emit(&mut self, path: PathBuf, kind: EntryKind) {
        if self.glob.directories_only && kind != EntryKind::Directory {
            return;
        }
        if !self.glob.options.entry_types.accepts(kind) {
            return;
        }
        tracing::trace!(path = %path.display(), "matched");
        self.results.push(path);
    }

    /// List `dir`, which is `depth` levels below the start of the walk.
    /// Returns `None` if the directory is to be skipped.
    fn list(&self, dir: &Path, depth: usize) -> Result<Option<Vec<DirEntry>>, MatchError> {
        if let Some(max_depth) = self.glob.options.max_depth {
            if depth >= max_depth {
                tracing::trace!(dir = %dir.display(), depth, "not descending past max depth");
                return Ok(None);
            }
        }

        let fs_path = self.fs_path(dir);
        tracing::trace!(dir = %fs_path.display(), "listing");
        match self.fs.list_dir(&fs_path) {
            Ok(entries) => Ok(Some(entries)),
            // Nothing to match in a directory that isn't there
            Err(FsError::NotFound(_)) | Err(FsError::NotADirectory(_)) => Ok(None),
            Err(err) if self.glob.options.strict => Err(err.into()),
            Err(err) => {
                tracing::warn!("skipping {}: {}", fs_path.display(), err);
                Ok(None)
            }
        }
    }

    /// Record that `**` is about to expand `dir`.
    /// Returns false if that would revisit a directory already
    /// being expanded, which happens with symlink cycles.
    fn enter(&mut self, dir: &Path) -> bool {
        let canonical = self.fs.canonicalize(&self.fs_path(dir));
        if canonical.is_some() && self.ancestors.contains(&canonical) {
            tracing::warn!("skipping {}: directory cycle", dir.display());
            return false;
        }
        self.ancestors.push(canonical);
        true
    }

    fn leave(&mut self) {
        self.ancestors.pop();
    }

    fn walk(
        &mut self,
        current: PathBuf,
        segments: &'a [Segment],
        depth: usize,
    ) -> Result<(), MatchError> {
        let (segment, rest) = match segments.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };

        match segment {
            Segment::Parent => {
                // `..` of a directory that isn't there leads nowhere
                if !self.is_dir(&current) {
                    return Ok(());
                }
                let parent = current.join("..");
                if rest.is_empty() {
                    self.emit(parent, EntryKind::Directory);
                    Ok(())
                } else {
                    self.walk(parent, rest, depth)
                }
            }
            Segment::Recursive if rest.is_empty() => self.walk_descendants(&current, depth),
            Segment::Recursive => {
                // `**` standing for zero segments
                self.walk(current.clone(), rest, depth)?;

                // and for one or more
                let entries = match self.list(&current, depth)? {
                    Some(entries) => entries,
                    None => return Ok(()),
                };
                for entry in entries.into_iter().filter(DirEntry::is_dir) {
                    let child = current.join(&entry.name);
                    if self.enter(&child) {
                        let result = self.walk(child, segments, depth + 1);
                        self.leave();
                        result?;
                    }
                }
                Ok(())
            }
            _ => {
                let entries = match self.list(&current, depth)? {
                    Some(entries) => entries,
                    None => return Ok(()),
                };
                let case_sensitive = self.glob.options.case_sensitive;
                for entry in entries {
                    let name = match <[u8]>::from_os_str(&entry.name) {
                        Some(name) => BStr::new(name),
                        None => continue,
                    };
                    if !segment.is_match(name, case_sensitive) {
                        continue;
                    }

                    let path = current.join(&entry.name);
                    if rest.is_empty() {
                        self.emit(path, entry.kind);
                    } else if entry.is_dir() {
                        // Only a directory can satisfy a non-leaf segment
                        self.walk(path, rest, depth + 1)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// A trailing `**` matches everything below `dir`
    fn walk_descendants(&mut self, dir: &Path, depth: usize) -> Result<(), MatchError> {
        let entries = match self.list(dir, depth)? {
            Some(entries) => entries,
            None => return Ok(()),
        };
        for entry in entries {
            let path = dir.join(&entry.name);
            let is_dir = entry.is_dir();
            self.emit(path.clone(), entry.kind);
            if is_dir && self.enter(&path) {
                let result = self.walk_descendants(&path, depth + 1);
                self.leave();
                result?;
            }
        }
        Ok(())
    }
}
