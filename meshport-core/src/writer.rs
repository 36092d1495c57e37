//! Output tree persistence.

use crate::models::NavDescriptor;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of navigation descriptors
pub const NAV_FILE: &str = "meta.json";

/// Extension of ported documents
pub const DOC_EXTENSION: &str = "mdx";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize navigation for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A file of the output tree, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

impl OutputFile {
    /// Ported document `<dir>/<slug>.mdx`
    pub fn document(dir: Option<&str>, slug: &str, contents: String) -> Self {
        let name = format!("{slug}.{DOC_EXTENSION}");
        let path = match dir {
            Some(dir) => Path::new(dir).join(name),
            None => PathBuf::from(name),
        };
        Self { path, contents }
    }

    /// Navigation descriptor `<dir>/meta.json`, pretty-printed with a trailing newline
    pub fn navigation(dir: Option<&str>, nav: &NavDescriptor) -> Result<Self, WriteError> {
        let path = match dir {
            Some(dir) => Path::new(dir).join(NAV_FILE),
            None => PathBuf::from(NAV_FILE),
        };
        let mut contents = serde_json::to_string_pretty(nav).map_err(|source| WriteError::Json {
            path: path.clone(),
            source,
        })?;
        contents.push('\n');
        Ok(Self { path, contents })
    }
}

/// Writes the output tree under a single root directory.
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Delete the output root (if present) and recreate it empty.
    pub fn reset(&self) -> Result<(), WriteError> {
        if self.root.exists() {
            tracing::debug!("Removing previous output at {:?}", self.root);
            fs::remove_dir_all(&self.root).map_err(|source| self.io_error(&self.root, source))?;
        }
        fs::create_dir_all(&self.root).map_err(|source| self.io_error(&self.root, source))
    }

    /// Write one file, creating its parent directory.
    pub fn write(&self, file: &OutputFile) -> Result<(), WriteError> {
        let path = self.root.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(parent, source))?;
        }
        fs::write(&path, &file.contents).map_err(|source| self.io_error(&path, source))?;
        tracing::debug!("Wrote {:?}", path);
        Ok(())
    }

    /// Reset the root, then write every file in order.
    pub fn write_all(&self, files: &[OutputFile]) -> Result<(), WriteError> {
        self.reset()?;
        for file in files {
            self.write(file)?;
        }
        Ok(())
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> WriteError {
        WriteError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
