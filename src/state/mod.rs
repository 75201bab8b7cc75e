//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Frontier`: FIFO queue of pending URLs plus the visited set
//! - `CrawlState`: frontier and counters, the unit of persistence
//! - `CrawlPhase`: the coordinator's state machine

mod crawl_phase;
mod crawl_state;
mod frontier;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use crawl_state::{Counters, CrawlState};
pub use frontier::{EnqueueOutcome, Frontier, FrontierEmpty, FrontierEntry};
