use crate::state::frontier::{EnqueueOutcome, Frontier, FrontierEntry};

/// Progress counters of a crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Fetch attempts, successful or not
    pub crawled: u64,

    /// Pages whose text was written to the corpus
    pub saved: u64,
}

/// Everything needed to continue a crawl: frontier, visited set and counters
///
/// Owned by the coordinator for the duration of a run and handed to
/// [`crate::storage::save_state`] at checkpoints.
#[derive(Debug, Clone)]
pub struct CrawlState {
    pub frontier: Frontier,
    pub counters: Counters,
}

impl CrawlState {
    /// Creates the state of a fresh crawl with `seeds` queued at depth 0
    pub fn fresh<I, S>(seeds: I, max_depth: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frontier = Frontier::new(max_depth);
        for seed in seeds {
            frontier.enqueue(seed, 0);
        }

        Self {
            frontier,
            counters: Counters::default(),
        }
    }

    /// Reassembles a state from persisted parts
    ///
    /// Returns the state and the number of frontier entries that were dropped
    /// while rebuilding (see [`Frontier::restore`]).
    pub fn restore(
        entries: Vec<FrontierEntry>,
        visited: Vec<String>,
        counters: Counters,
        max_depth: u32,
    ) -> (Self, usize) {
        let (frontier, dropped) = Frontier::restore(entries, visited, max_depth);
        (Self { frontier, counters }, dropped)
    }

    /// Enqueues a discovered link one hop below `parent_depth`
    pub fn enqueue_child(&mut self, url: impl Into<String>, parent_depth: u32) -> EnqueueOutcome {
        self.frontier.enqueue(url, parent_depth.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_queues_seeds_at_depth_zero() {
        let state = CrawlState::fresh(["https://a.com/", "https://b.com/"], 2);

        let depths: Vec<u32> = state.frontier.entries().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 0]);
        assert_eq!(state.counters, Counters::default());
    }

    #[test]
    fn test_fresh_state_deduplicates_seeds() {
        let state = CrawlState::fresh(["https://a.com/", "https://a.com/"], 2);
        assert_eq!(state.frontier.len(), 1);
    }

    #[test]
    fn test_enqueue_child_respects_depth() {
        let mut state = CrawlState::fresh(Vec::<String>::new(), 1);
        assert!(state.enqueue_child("https://a.com/b", 0).is_queued());
        assert_eq!(
            state.enqueue_child("https://a.com/d", 1),
            EnqueueOutcome::TooDeep
        );
    }

    #[test]
    fn test_restore_keeps_counters() {
        let counters = Counters {
            crawled: 12,
            saved: 5,
        };
        let (state, dropped) = CrawlState::restore(
            vec![FrontierEntry::new("https://a.com/next", 1)],
            vec!["https://a.com/".to_string()],
            counters,
            3,
        );

        assert_eq!(dropped, 0);
        assert_eq!(state.counters, counters);
        assert_eq!(state.frontier.len(), 1);
        assert_eq!(state.frontier.visited_count(), 1);
    }
}
