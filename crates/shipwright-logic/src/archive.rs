//! Read-only access to the game's resource archive.
//!
//! The builder only ever asks two questions of an archive: is a path
//! present, and give me a byte stream for it. Streams are owned values, so
//! they are closed when they go out of scope on every exit path.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Component, Path, PathBuf};

use crate::error::LoadError;

/// Read-only resource store keyed by archive path (`data/<name>.txt`).
pub trait ArchiveStore {
    /// Whether a resource exists at `path`.
    fn contains(&self, path: &str) -> bool;

    /// Open a stream over the resource at `path`.
    ///
    /// Fails with [`LoadError::ResourceNotFound`] when the path is absent.
    fn open_stream(&self, path: &str) -> Result<Box<dyn Read + '_>, LoadError>;
}

/// Archive held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), bytes.into());
    }

    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ArchiveStore for MemoryArchive {
    fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    fn open_stream(&self, path: &str) -> Result<Box<dyn Read + '_>, LoadError> {
        match self.entries.get(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
            None => Err(LoadError::ResourceNotFound(path.to_string())),
        }
    }
}

/// Archive backed by an unpacked data tree on disk.
///
/// Archive paths are resolved relative to `root`; `data/foo.txt` maps to
/// `<root>/data/foo.txt`. Paths that try to leave the root are absent.
#[derive(Debug, Clone)]
pub struct DirArchive {
    root: PathBuf,
}

impl DirArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ArchiveStore for DirArchive {
    fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn open_stream(&self, path: &str) -> Result<Box<dyn Read + '_>, LoadError> {
        let full = self
            .resolve(path)
            .filter(|p| p.is_file())
            .ok_or_else(|| LoadError::ResourceNotFound(path.to_string()))?;
        let file = File::open(&full).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read a whole resource as UTF-8 text (lossy for stray bytes).
pub fn read_text(archive: &dyn ArchiveStore, path: &str) -> Result<String, LoadError> {
    let mut stream = archive.open_stream(path)?;
    let mut bytes = Vec::new();
    stream
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
