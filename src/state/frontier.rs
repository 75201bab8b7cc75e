//! Breadth-first frontier with visited-set deduplication
//!
//! The frontier owns three structures that together guarantee a URL is
//! fetched at most once:
//! - a FIFO queue of pending `(url, depth)` entries
//! - the set of URLs currently in that queue
//! - the set of URLs already popped and visited
//!
//! Membership is checked on enqueue, so a URL discovered on many pages only
//! ever occupies one queue slot.

use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// One pending crawl task
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrontierEntry {
    /// Normalized URL
    pub url: String,

    /// Link hops from the seed (seeds are depth 0)
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Returned by [`Frontier::pop_next`] when no entries remain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("frontier is empty")]
pub struct FrontierEmpty;

/// Result of an enqueue attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The entry was appended to the queue
    Queued,
    /// The URL was already visited
    AlreadyVisited,
    /// The URL is already waiting in the queue
    AlreadyPending,
    /// The depth exceeds the frontier's maximum
    TooDeep,
}

impl EnqueueOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// FIFO frontier plus visited set
#[derive(Debug, Clone)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    pending: HashSet<String>,
    visited: HashSet<String>,
    max_depth: u32,
}

impl Frontier {
    /// Creates an empty frontier accepting entries up to `max_depth`
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            pending: HashSet::new(),
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Rebuilds a frontier from persisted entries and visited URLs
    ///
    /// Entries are re-enqueued in their original order, so anything that
    /// would be rejected by [`Frontier::enqueue`] (visited, duplicated, or
    /// deeper than the current `max_depth`) is dropped. The number of dropped
    /// entries is returned alongside the frontier.
    pub fn restore(
        entries: impl IntoIterator<Item = FrontierEntry>,
        visited: impl IntoIterator<Item = String>,
        max_depth: u32,
    ) -> (Self, usize) {
        let mut frontier = Self::new(max_depth);
        frontier.visited.extend(visited);

        let mut dropped = 0;
        for entry in entries {
            if !frontier.enqueue(entry.url, entry.depth).is_queued() {
                dropped += 1;
            }
        }

        (frontier, dropped)
    }

    /// Adds `url` at `depth` unless it was visited, is pending, or is too deep
    pub fn enqueue(&mut self, url: impl Into<String>, depth: u32) -> EnqueueOutcome {
        let url = url.into();

        if depth > self.max_depth {
            return EnqueueOutcome::TooDeep;
        }
        if self.visited.contains(&url) {
            return EnqueueOutcome::AlreadyVisited;
        }
        if self.pending.contains(&url) {
            return EnqueueOutcome::AlreadyPending;
        }

        self.pending.insert(url.clone());
        self.queue.push_back(FrontierEntry { url, depth });
        EnqueueOutcome::Queued
    }

    /// Removes and returns the earliest-inserted entry
    pub fn pop_next(&mut self) -> Result<FrontierEntry, FrontierEmpty> {
        let entry = self.queue.pop_front().ok_or(FrontierEmpty)?;
        self.pending.remove(&entry.url);
        Ok(entry)
    }

    /// Records `url` as visited; calling it again has no further effect
    pub fn mark_visited(&mut self, url: &str) {
        if !self.visited.contains(url) {
            self.visited.insert(url.to_string());
        }
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Pending entries in pop order
    pub fn entries(&self) -> impl Iterator<Item = &FrontierEntry> {
        self.queue.iter()
    }

    /// Visited URLs, in no particular order
    pub fn visited(&self) -> impl Iterator<Item = &String> {
        self.visited.iter()
    }
}
