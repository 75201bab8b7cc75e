use crate::state::CrawlState;
use crate::storage::schema::{StateSnapshot, VersionProbe, STATE_SCHEMA_VERSION};
use crate::storage::traits::{PersistError, PersistResult, PersistedState, StateStore};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes a snapshot of `state` to `path`, atomically replacing any previous file
///
/// The snapshot is written to a temporary file in the same directory, flushed
/// and synced, then renamed over `path`. If any step fails the temporary file
/// is removed when it is dropped and `path` keeps its previous contents.
pub fn save_state(state: &CrawlState, config_hash: Option<&str>, path: &Path) -> PersistResult<()> {
    let write_err = |source: std::io::Error| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(write_err)?;
    }

    let snapshot = StateSnapshot::capture(state, config_hash);

    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, &snapshot)
            .map_err(|e| write_err(e.into()))?;
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;

    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(
        "State saved to {} ({} pending, {} visited)",
        path.display(),
        snapshot.frontier.len(),
        snapshot.visited.len()
    );
    Ok(())
}

/// Loads a snapshot from `path` and rebuilds the crawl state
///
/// # Returns
///
/// * `Err(PersistError::StateFileMissing)` - `path` does not exist
/// * `Err(PersistError::StateCorrupt)` - the file is not a valid snapshot
///   or uses an unsupported schema version
/// * `Err(PersistError::Read)` - any other I/O failure
pub fn load_state(path: &Path, max_depth: u32) -> PersistResult<PersistedState> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(PersistError::StateFileMissing {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(PersistError::StateCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
        Err(source) => {
            return Err(PersistError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let corrupt = |reason: String| PersistError::StateCorrupt {
        path: path.to_path_buf(),
        reason,
    };

    let probe: VersionProbe =
        serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
    if probe.version != STATE_SCHEMA_VERSION {
        return Err(corrupt(format!(
            "unsupported schema version {} (expected {})",
            probe.version, STATE_SCHEMA_VERSION
        )));
    }

    let snapshot: StateSnapshot =
        serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;

    if snapshot.counters.saved > snapshot.counters.crawled {
        return Err(corrupt(format!(
            "saved count {} exceeds crawled count {}",
            snapshot.counters.saved, snapshot.counters.crawled
        )));
    }

    let config_hash = snapshot.config_hash.clone();
    let saved_at = snapshot.saved_at;
    let (state, dropped_entries) = snapshot.into_state(max_depth);

    if dropped_entries > 0 {
        tracing::warn!(
            "Dropped {} frontier entries from {} (duplicate, visited, or deeper than max depth {})",
            dropped_entries,
            path.display(),
            max_depth
        );
    }

    tracing::debug!("State loaded from {}", path.display());

    Ok(PersistedState {
        state,
        config_hash,
        saved_at,
        dropped_entries,
    })
}

/// JSON state file backend
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
    config_hash: Option<String>,
}

impl JsonStateFile {
    /// Creates a backend writing to `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the state file
    /// * `config_hash` - Hash recorded in every snapshot, if known
    pub fn new(path: impl Into<PathBuf>, config_hash: Option<String>) -> Self {
        Self {
            path: path.into(),
            config_hash,
        }
    }
}

impl StateStore for JsonStateFile {
    fn save(&self, state: &CrawlState) -> PersistResult<()> {
        save_state(state, self.config_hash.as_deref(), &self.path)
    }

    fn load(&self, max_depth: u32) -> PersistResult<PersistedState> {
        load_state(&self.path, max_depth)
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
