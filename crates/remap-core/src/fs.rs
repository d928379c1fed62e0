//! The file system operations source map loading and rendering rely on.

use path_clean::PathClean;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

/// Access to files and path manipulation.
///
/// Only `exists` and `read_file` touch storage; the path helpers have
/// purely lexical default implementations.
pub trait FileSystem {
    /// Whether something exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path` as UTF-8.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Resolve `segment` against `base` and normalise `.`/`..` components.
    ///
    /// An absolute `segment` replaces `base`.
    fn resolve(&self, base: &Path, segment: &str) -> PathBuf {
        if segment.is_empty() {
            base.clean()
        } else {
            base.join(segment).clean()
        }
    }

    /// The directory containing `path`.
    fn dirname(&self, path: &Path) -> PathBuf {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }

    /// `path` expressed relative to the directory `from`, with `/` separators.
    fn relative(&self, from: &Path, path: &Path) -> String {
        let relative = pathdiff::diff_paths(path, from).unwrap_or_else(|| path.to_path_buf());
        relative.to_string_lossy().replace('\\', "/")
    }

    /// The final component of `path`.
    fn basename(&self, path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// An in-memory file system.
///
/// Paths are normalised on insert and lookup. Every read is recorded so
/// callers can check which files were actually consulted.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: FxHashMap<PathBuf, String>,
    reads: RefCell<Vec<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files.insert(path.as_ref().clean(), contents.into());
    }

    /// Builder-style `insert`.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Paths passed to `read_file`, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.borrow().clone()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&path.clean())
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        let path = path.clean();
        self.reads.borrow_mut().push(path.clone());
        self.files.get(&path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_normalises() {
        let fs = OsFileSystem;
        assert_eq!(
            fs.resolve(Path::new("/project/dist"), "../src/./a.ts"),
            PathBuf::from("/project/src/a.ts")
        );
        assert_eq!(
            fs.resolve(Path::new("/project/dist"), "/abs/b.ts"),
            PathBuf::from("/abs/b.ts")
        );
        assert_eq!(fs.resolve(Path::new("/project/dist/"), ""), PathBuf::from("/project/dist"));
    }

    #[test]
    fn test_path_helpers() {
        let fs = OsFileSystem;
        let path = Path::new("/project/dist/index.js");
        assert_eq!(fs.dirname(path), PathBuf::from("/project/dist"));
        assert_eq!(fs.basename(path), "index.js");
        assert_eq!(
            fs.relative(Path::new("/project/dist"), Path::new("/project/src/index.ts")),
            "../src/index.ts"
        );
    }

    #[test]
    fn test_memory_fs_records_reads() {
        let fs = MemoryFileSystem::new().with_file("/a/./b.js", "x");
        assert!(fs.exists(Path::new("/a/b.js")));
        assert_eq!(fs.read_file(Path::new("/a/c/../b.js")).unwrap(), "x");
        assert!(fs.read_file(Path::new("/a/missing.js")).is_err());
        assert_eq!(
            fs.reads(),
            vec![PathBuf::from("/a/b.js"), PathBuf::from("/a/missing.js")]
        );
    }
}
