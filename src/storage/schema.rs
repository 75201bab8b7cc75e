//! On-disk schema of the crawl state file
//!
//! The state file is a JSON document carrying an explicit `version`. Readers
//! check the version before decoding the rest, so a file written by a future
//! layout is reported as unsupported instead of half-parsed.

use crate::state::{Counters, CrawlState, FrontierEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version written by this crate
pub const STATE_SCHEMA_VERSION: u32 = 1;

/// Minimal view used to read the version before the full decode
#[derive(Debug, Deserialize)]
pub(crate) struct VersionProbe {
    pub version: u32,
}

/// Serialized form of [`Counters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountersRecord {
    pub crawled: u64,
    pub saved: u64,
}

/// Serialized form of a [`FrontierEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub url: String,
    pub depth: u32,
}

/// Version 1 of the state file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
    pub counters: CountersRecord,
    /// Pending entries in pop order
    pub frontier: Vec<EntryRecord>,
    /// Visited URLs, sorted for stable output
    pub visited: Vec<String>,
}

impl StateSnapshot {
    /// Captures a point-in-time copy of `state`
    pub fn capture(state: &CrawlState, config_hash: Option<&str>) -> Self {
        let mut visited: Vec<String> = state.frontier.visited().cloned().collect();
        visited.sort();

        Self {
            version: STATE_SCHEMA_VERSION,
            saved_at: Utc::now(),
            config_hash: config_hash.map(str::to_string),
            counters: CountersRecord {
                crawled: state.counters.crawled,
                saved: state.counters.saved,
            },
            frontier: state
                .frontier
                .entries()
                .map(|e| EntryRecord {
                    url: e.url.clone(),
                    depth: e.depth,
                })
                .collect(),
            visited,
        }
    }

    /// Rebuilds the crawl state, returning it with the count of dropped entries
    pub fn into_state(self, max_depth: u32) -> (CrawlState, usize) {
        let entries = self
            .frontier
            .into_iter()
            .map(|e| FrontierEntry::new(e.url, e.depth))
            .collect();
        let counters = Counters {
            crawled: self.counters.crawled,
            saved: self.counters.saved,
        };
        CrawlState::restore(entries, self.visited, counters, max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sorts_visited_and_keeps_order() {
        let mut state = CrawlState::fresh(["https://a.com/z", "https://a.com/a"], 2);
        state.frontier.mark_visited("https://a.com/y");
        state.frontier.mark_visited("https://a.com/b");

        let snapshot = StateSnapshot::capture(&state, Some("abc"));

        assert_eq!(snapshot.version, STATE_SCHEMA_VERSION);
        assert_eq!(snapshot.visited, vec!["https://a.com/b", "https://a.com/y"]);
        assert_eq!(snapshot.frontier[0].url, "https://a.com/z");
        assert_eq!(snapshot.frontier[1].url, "https://a.com/a");
        assert_eq!(snapshot.config_hash.as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_config_hash_defaults_to_none() {
        let json = r#"{
            "version": 1,
            "saved_at": "2024-05-01T10:00:00Z",
            "counters": {"crawled": 3, "saved": 1},
            "frontier": [{"url": "https://a.com/next", "depth": 1}],
            "visited": ["https://a.com/"]
        }"#;

        let snapshot: StateSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.config_hash.is_none());

        let (state, dropped) = snapshot.into_state(5);
        assert_eq!(dropped, 0);
        assert_eq!(state.counters.crawled, 3);
        assert!(state.frontier.is_visited("https://a.com/"));
    }
}
