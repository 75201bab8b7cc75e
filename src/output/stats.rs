//! Crawl reports and state-file statistics
//!
//! This module provides the end-of-session summary and the `--stats` view
//! of a saved state file.

use crate::state::{Counters, CrawlPhase, CrawlState};
use crate::storage::PersistedState;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Summary of one crawl session
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Terminal phase the session ended in
    pub phase: CrawlPhase,

    /// Counters at the end of the session (cumulative across resumes)
    pub counters: Counters,

    /// Saved-page limit the session ran with
    pub max_pages: u64,

    /// Entries still waiting in the frontier
    pub frontier_remaining: usize,

    /// Number of URLs visited so far
    pub visited: usize,

    /// Pages crawled during this session only
    pub crawled_this_session: u64,

    /// Wall-clock time of this session
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Crawl rate of this session in pages per second
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.crawled_this_session as f64 / secs
        } else {
            0.0
        }
    }

    /// The one-line progress summary printed at the end of a crawl
    pub fn summary_line(&self) -> String {
        format!(
            "Saved pages: {}/{} | Crawled: {}",
            self.counters.saved, self.max_pages, self.counters.crawled
        )
    }
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Finished ({}) ===\n", report.phase);
    println!("  {}", report.summary_line());
    println!("  Visited URLs: {}", report.visited);
    println!("  Frontier remaining: {}", report.frontier_remaining);
    println!(
        "  Session: {} pages in {:.1}s ({:.2} pages/sec)",
        report.crawled_this_session,
        report.elapsed.as_secs_f64(),
        report.pages_per_second()
    );

    if report.phase == CrawlPhase::TerminatedInterrupted {
        println!();
        println!("State saved. Run again with --resume to continue.");
    }
}

/// Statistics derived from a saved state file
#[derive(Debug, Clone)]
pub struct StateStatistics {
    pub saved_at: DateTime<Utc>,
    pub config_hash: Option<String>,
    pub counters: Counters,
    pub visited: usize,
    pub frontier: usize,

    /// Frontier entries per depth
    pub frontier_by_depth: BTreeMap<u32, usize>,

    /// Frontier entries per host
    pub frontier_by_host: BTreeMap<String, usize>,
}

impl StateStatistics {
    pub fn from_persisted(persisted: &PersistedState) -> Self {
        let mut stats = Self::from_state(&persisted.state);
        stats.saved_at = persisted.saved_at;
        stats.config_hash = persisted.config_hash.clone();
        stats
    }

    fn from_state(state: &CrawlState) -> Self {
        let mut frontier_by_depth = BTreeMap::new();
        let mut frontier_by_host = BTreeMap::new();

        for entry in state.frontier.entries() {
            *frontier_by_depth.entry(entry.depth).or_insert(0) += 1;

            let host = url::Url::parse(&entry.url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| "(invalid)".to_string());
            *frontier_by_host.entry(host).or_insert(0) += 1;
        }

        Self {
            saved_at: Utc::now(),
            config_hash: None,
            counters: state.counters,
            visited: state.frontier.visited_count(),
            frontier: state.frontier.len(),
            frontier_by_depth,
            frontier_by_host,
        }
    }

    /// Share of crawled pages that produced a corpus file, in percent
    pub fn save_rate(&self) -> f64 {
        if self.counters.crawled > 0 {
            (self.counters.saved as f64 / self.counters.crawled as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `path` - The state file the statistics were loaded from
/// * `stats` - The statistics to display
pub fn print_statistics(path: &Path, stats: &StateStatistics) {
    println!("=== Crawl State Statistics ===\n");

    println!("State file: {}", path.display());
    println!("  Saved at: {}", stats.saved_at.to_rfc3339());
    if let Some(hash) = &stats.config_hash {
        println!("  Config hash: {}", hash);
    }
    println!();

    println!("Overview:");
    println!("  Pages crawled: {}", stats.counters.crawled);
    println!(
        "  Pages saved: {} ({:.1}% of crawled)",
        stats.counters.saved,
        stats.save_rate()
    );
    println!("  Visited URLs: {}", stats.visited);
    println!("  Frontier: {}", stats.frontier);
    println!();

    if !stats.frontier_by_depth.is_empty() {
        println!("Frontier by Depth:");
        for (depth, count) in &stats.frontier_by_depth {
            println!("  {}: {}", depth, count);
        }
        println!();
    }

    if !stats.frontier_by_host.is_empty() {
        println!("Frontier by Host:");
        let mut host_counts: Vec<_> = stats.frontier_by_host.iter().collect();
        host_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (host, count) in host_counts {
            println!("  {}: {}", host, count);
        }
    }
}
