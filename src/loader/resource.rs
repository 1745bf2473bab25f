//! Resource lookup
//!
//! Maps resource names to byte streams.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Failure to open a named resource.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("failed to read resource {name}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Opens resources by name.
pub trait ResourceLoader {
    fn open(&self, name: &str) -> Result<Box<dyn Read>, ResourceError>;

    /// Read a whole resource into memory.
    fn read(&self, name: &str) -> Result<Vec<u8>, ResourceError> {
        let mut bytes = Vec::new();
        self.open(name)?
            .read_to_end(&mut bytes)
            .map_err(|source| ResourceError::Io {
                name: name.to_string(),
                source,
            })?;
        Ok(bytes)
    }
}

/// Resolves names against an ordered list of directories.
#[derive(Debug, Clone)]
pub struct FileResourceLoader {
    roots: Vec<PathBuf>,
}

impl FileResourceLoader {
    /// Search only the current working directory.
    pub fn new() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
        }
    }

    /// Search the given directories, first match wins.
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a search directory.
    pub fn add_root(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_absolute() {
            return direct.is_file().then(|| direct.to_path_buf());
        }
        self.roots
            .iter()
            .map(|root| root.join(name))
            .find(|candidate| candidate.is_file())
    }
}

impl Default for FileResourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader for FileResourceLoader {
    fn open(&self, name: &str) -> Result<Box<dyn Read>, ResourceError> {
        let path = self
            .resolve(name)
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))?;
        let file = File::open(&path).map_err(|source| ResourceError::Io {
            name: name.to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Serves resources from memory, e.g. assets embedded with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceLoader {
    entries: HashMap<String, Arc<[u8]>>,
}

impl MemoryResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.entries.insert(name.into(), bytes.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }
}

struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ResourceLoader for MemoryResourceLoader {
    fn open(&self, name: &str) -> Result<Box<dyn Read>, ResourceError> {
        let bytes = self
            .entries
            .get(name)
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))?;
        Ok(Box::new(Cursor::new(SharedBytes(Arc::clone(bytes)))))
    }
}
