use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors produced while enumerating a directory
#[derive(Debug, Error)]
pub enum FsError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// An immediate child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new<S: Into<OsString>>(name: S, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// The only capability the matcher needs from a filesystem:
/// listing the immediate children of a directory.
pub trait FileSystem {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError>;

    /// Returns true if `path` names an existing directory.
    /// A directory that exists but can't be read still counts.
    fn is_dir(&self, path: &Path) -> bool {
        !matches!(
            self.list_dir(path),
            Err(FsError::NotFound(_)) | Err(FsError::NotADirectory(_))
        )
    }

    /// Resolve `path` to its real location, if the filesystem has
    /// such a notion.  The walker uses this to avoid descending into
    /// a symlink cycle while expanding `**`.
    fn canonicalize(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        (**self).list_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        (**self).canonicalize(path)
    }
}

/// The real filesystem
#[derive(Debug, Clone)]
pub struct DiskFileSystem {
    follow_links: bool,
}

impl Default for DiskFileSystem {
    fn default() -> Self {
        Self { follow_links: true }
    }
}

impl DiskFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// When following links, a symlink to a directory is reported as
    /// a directory and may be descended into.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

impl FileSystem for DiskFileSystem {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        let walk = walkdir::WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links);

        let mut entries = vec![];
        for entry in walk {
            match entry {
                Ok(entry) => {
                    let kind = if entry.file_type().is_dir() {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    };
                    entries.push(DirEntry::new(entry.file_name(), kind));
                }
                // The directory itself couldn't be read
                Err(err) if err.depth() == 0 => return Err(FsError::from_io(path, err.into())),
                // Most likely a dangling symlink or a link loop
                Err(err) => {
                    tracing::debug!(dir = %path.display(), error = %err, "skipping entry");
                }
            }
        }
        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }
}

/// Resolve `.` and `..` components without consulting any filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// An in-memory directory tree.
/// Creating an entry implicitly creates all of its parent directories.
///
/// ```
/// use globber::{FileSystem, MemoryFileSystem};
/// use std::path::Path;
///
/// let mut fs = MemoryFileSystem::new();
/// fs.create_file("/Working/tools/NuGet.exe");
/// let entries = fs.list_dir(Path::new("/Working/tools")).unwrap();
/// assert_eq!(entries[0].name, "NuGet.exe");
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    entries: BTreeMap<PathBuf, EntryKind>,
    denied: BTreeSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut fs = Self::new();
        for file in files {
            fs.create_file(file);
        }
        fs
    }

    fn create_parents(&mut self, path: &Path) {
        for parent in path.ancestors().skip(1) {
            self.entries.insert(parent.to_path_buf(), EntryKind::Directory);
        }
    }

    pub fn create_file<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        let path = normalize(path.as_ref());
        self.create_parents(&path);
        self.entries.insert(path, EntryKind::File);
        self
    }

    pub fn create_dir<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        let path = normalize(path.as_ref());
        self.create_parents(&path);
        self.entries.insert(path, EntryKind::Directory);
        self
    }

    /// Make listing `path` fail with a permission error
    pub fn deny_access<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        self.denied.insert(normalize(path.as_ref()));
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        let dir = normalize(path);
        match self.entries.get(&dir) {
            None => return Err(FsError::NotFound(dir)),
            Some(EntryKind::File) => return Err(FsError::NotADirectory(dir)),
            Some(EntryKind::Directory) => {}
        }
        if self.denied.contains(&dir) {
            return Err(FsError::PermissionDenied(dir));
        }

        Ok(self
            .entries
            .iter()
            .filter(|(child, _)| child.parent() == Some(dir.as_path()))
            .filter_map(|(child, kind)| child.file_name().map(|name| DirEntry::new(name, *kind)))
            .collect())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.entries.get(&normalize(path)) == Some(&EntryKind::Directory)
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        Some(normalize(path))
    }
}
