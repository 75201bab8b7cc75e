//! Storage traits and error types
//!
//! This module defines the trait interface for crawl state persistence and
//! the associated error types.

use crate::state::CrawlState;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while saving or loading crawl state
///
/// `StateFileMissing` and `StateCorrupt` let a caller fall back to a fresh
/// crawl; `Write` is fatal for the session.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("State file not found: {}", path.display())]
    StateFileMissing { path: PathBuf },

    #[error("State file {} is corrupt: {reason}", path.display())]
    StateCorrupt { path: PathBuf, reason: String },

    #[error("Failed to read state file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write state file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    /// Returns true if starting a fresh crawl is a reasonable recovery
    pub fn allows_fresh_start(&self) -> bool {
        matches!(
            self,
            Self::StateFileMissing { .. } | Self::StateCorrupt { .. }
        )
    }
}

/// Result type for persistence operations
pub type PersistResult<T> = Result<T, PersistError>;

/// A crawl state reconstructed from storage
#[derive(Debug, Clone)]
pub struct PersistedState {
    /// The restored frontier, visited set and counters
    pub state: CrawlState,

    /// Hash of the configuration that wrote the snapshot, if known
    pub config_hash: Option<String>,

    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,

    /// Entries dropped while rebuilding the frontier
    pub dropped_entries: usize,
}

/// Trait for crawl state persistence backends
pub trait StateStore {
    /// Persists a consistent snapshot of `state`
    ///
    /// Either the new snapshot fully replaces the previous one, or the
    /// previous one is left untouched and an error is returned.
    fn save(&self, state: &CrawlState) -> PersistResult<()>;

    /// Loads the last saved snapshot
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Depth limit of the frontier being rebuilt
    fn load(&self, max_depth: u32) -> PersistResult<PersistedState>;

    /// Location of the persisted state, for diagnostics
    fn location(&self) -> &Path;
}
