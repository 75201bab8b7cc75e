use crate::output::OutputError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes extracted page text as `page_{n}.txt` files in one directory
///
/// Files are written through a temporary file and renamed into place, so a
/// crash never leaves a truncated page behind.
#[derive(Debug, Clone)]
pub struct CorpusWriter {
    dir: PathBuf,
}

impl CorpusWriter {
    /// Opens the corpus directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let dir = dir.into();

        if dir.exists() && !dir.is_dir() {
            return Err(OutputError::NotADirectory(dir));
        }

        fs::create_dir_all(&dir).map_err(|source| OutputError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for the `seq`-th saved page
    pub fn file_name(seq: u64) -> String {
        format!("page_{}.txt", seq)
    }

    /// Full path for the `seq`-th saved page
    pub fn page_path(&self, seq: u64) -> PathBuf {
        self.dir.join(Self::file_name(seq))
    }

    /// Writes `text` as the `seq`-th page, replacing any existing file
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(OutputError)` - The file could not be written
    pub fn write_page(&self, seq: u64, text: &str) -> Result<PathBuf, OutputError> {
        let path = self.page_path(seq);
        let write_err = |source| OutputError::Write {
            path: path.clone(),
            source,
        };

        let mut file = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        file.write_all(text.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;
        file.persist(&path).map_err(|e| write_err(e.error))?;

        Ok(path)
    }
}
