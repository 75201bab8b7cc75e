//! Storage module for persisting crawl state
//!
//! This module handles checkpointing and resuming a crawl:
//! - The versioned on-disk snapshot schema
//! - Atomic save (temp file + rename) and typed load failures
//! - The `StateStore` trait the coordinator checkpoints through

mod schema;
mod state_file;
mod traits;

pub use schema::{CountersRecord, EntryRecord, StateSnapshot, STATE_SCHEMA_VERSION};
pub use state_file::{load_state, save_state, JsonStateFile};
pub use traits::{PersistError, PersistResult, PersistedState, StateStore};
