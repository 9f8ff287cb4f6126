//! Filesystem and in-memory collaborators for the export pipeline

use guardplan_core::{FetchError, FileSink, LogoSource};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A file handed to a [`MemorySink`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps saved files in memory (browser bindings, tests)
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub saved: Vec<SavedFile>,
}

impl MemorySink {
    /// Most recently saved file
    pub fn last(&self) -> Option<&SavedFile> {
        self.saved.last()
    }

    /// Take the most recently saved file out of the sink
    pub fn take_last(&mut self) -> Option<SavedFile> {
        self.saved.pop()
    }
}

impl FileSink for MemorySink {
    fn save(&mut self, bytes: &[u8], filename: &str, mime_type: &str) -> io::Result<()> {
        self.saved.push(SavedFile {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}

/// Writes exports into a directory.
///
/// The bytes go to a temporary file in the same directory and are persisted
/// under the final name, so a failed save never leaves a truncated workbook
/// behind. The temporary file is removed on every error path.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            saved: Vec::new(),
        }
    }

    /// Paths written so far, in order
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, bytes: &[u8], filename: &str, _mime_type: &str) -> io::Result<()> {
        // Only the final component is honoured; a suggested name never escapes the directory
        let name = Path::new(filename).file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid file name: {filename:?}"),
            )
        })?;
        let target = self.dir.join(name);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target)?;

        debug!(path = %target.display(), bytes = bytes.len(), "workbook saved");
        self.saved.push(target);
        Ok(())
    }
}

/// Reads the logo from disk.
///
/// Locators are tried as given first; web-style absolute locators such as
/// `/logo.png` are then resolved against the base directory (a site's
/// public root). `http(s)` locators are not supported.
#[derive(Clone, Debug, Default)]
pub struct FsLogoSource {
    base_dir: Option<PathBuf>,
}

impl FsLogoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative and web-root locators against `dir`
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, locator: &str) -> Option<PathBuf> {
        let direct = PathBuf::from(locator);
        if direct.is_file() {
            return Some(direct);
        }
        let base = self.base_dir.as_ref()?;
        let relative = locator.trim_start_matches(['/', '\\']);
        let candidate = base.join(relative);
        candidate.is_file().then_some(candidate)
    }
}

impl LogoSource for FsLogoSource {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            return Err(FetchError::Unsupported(locator.to_string()));
        }
        let path = self
            .resolve(locator)
            .ok_or_else(|| FetchError::NotFound(locator.to_string()))?;
        Ok(fs::read(path)?)
    }
}
