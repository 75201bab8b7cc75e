//! Output module for the corpus and crawl reports
//!
//! This module handles:
//! - Writing extracted page text as numbered corpus files
//! - Summarizing a finished crawl session
//! - Displaying statistics about a saved state file

mod corpus;
pub mod stats;

pub use corpus::CorpusWriter;
pub use stats::{print_report, print_statistics, CrawlReport, StateStatistics};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing the corpus
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Corpus path {} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to create corpus directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
