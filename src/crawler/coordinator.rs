//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Pulling URLs from the frontier in breadth-first order
//! - Coordinating fetching, extraction and link discovery
//! - Writing corpus files and periodic checkpoints
//! - Handling limits, exhaustion and interrupts

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{FetchOutcome, PageFetcher};
use crate::crawler::interrupt::InterruptFlag;
use crate::extract::{Extraction, TextExtractor};
use crate::output::{CorpusWriter, CrawlReport};
use crate::state::{CrawlPhase, CrawlState, FrontierEntry};
use crate::storage::StateStore;
use crate::url::{normalize_url, LinkScope};
use crate::HarvestError;
use std::time::Instant;

/// Main crawler coordinator structure
///
/// Owns the crawl state for the duration of a session. The fetcher, the
/// extractor and the state store are injected so the loop can be driven
/// without a network.
pub struct Coordinator<F, E, S> {
    settings: CrawlerConfig,
    scope: LinkScope,
    fetcher: F,
    extractor: E,
    store: S,
    corpus: CorpusWriter,
    state: CrawlState,
    interrupt: InterruptFlag,
    phase: CrawlPhase,
}

impl<F, E, S> Coordinator<F, E, S>
where
    F: PageFetcher,
    E: TextExtractor,
    S: StateStore,
{
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (limits, sites, exclusions)
    /// * `fetcher` - Retrieves pages
    /// * `extractor` - Turns pages into corpus text
    /// * `store` - Persists checkpoints
    /// * `corpus` - Writes corpus files
    /// * `state` - A fresh or restored crawl state
    /// * `interrupt` - Polled between pages
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - A site pattern in the config is invalid
    pub fn new(
        config: &Config,
        fetcher: F,
        extractor: E,
        store: S,
        corpus: CorpusWriter,
        state: CrawlState,
        interrupt: InterruptFlag,
    ) -> Result<Self, HarvestError> {
        let scope = LinkScope::from_config(config)?;

        Ok(Self {
            settings: config.crawler.clone(),
            scope,
            fetcher,
            extractor,
            store,
            corpus,
            state,
            interrupt,
            phase: CrawlPhase::Running,
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Consumes the coordinator and hands back the crawl state
    pub fn into_state(self) -> CrawlState {
        self.state
    }

    /// Runs the main crawl loop until a terminal phase is reached
    ///
    /// Each iteration first checks, in order, the page limits, frontier
    /// exhaustion and the interrupt flag. It then crawls exactly one URL.
    /// A checkpoint is written every `checkpoint-interval` crawled pages and
    /// once more when the loop ends.
    ///
    /// Fetch failures and pages without text are logged and skipped. Failing
    /// to write a checkpoint or a corpus file ends the session with an error.
    pub async fn run(&mut self) -> Result<CrawlReport, HarvestError> {
        let start_time = Instant::now();
        let crawled_at_start = self.state.counters.crawled;

        tracing::info!(
            "Starting crawl: {} queued, {} visited, {} saved so far",
            self.state.frontier.len(),
            self.state.frontier.visited_count(),
            self.state.counters.saved
        );

        let terminal = loop {
            if let Some(terminal) = self.termination() {
                break terminal;
            }

            self.crawl_next().await?;

            let crawled = self.state.counters.crawled;
            if crawled % self.settings.checkpoint_interval.max(1) == 0 {
                self.checkpoint()?;
                tracing::info!(
                    "Progress: {} crawled, {}/{} saved, {} in frontier",
                    crawled,
                    self.state.counters.saved,
                    self.settings.max_pages,
                    self.state.frontier.len()
                );
            }
        };

        self.transition(terminal);
        self.store.save(&self.state)?;

        match terminal {
            CrawlPhase::TerminatedLimitReached => tracing::info!(
                "Page limit reached: {} saved, {} crawled",
                self.state.counters.saved,
                self.state.counters.crawled
            ),
            CrawlPhase::TerminatedFrontierExhausted => {
                tracing::info!("Frontier is empty, crawl complete")
            }
            _ => tracing::warn!(
                "Crawl interrupted; state saved to {}",
                self.store.location().display()
            ),
        }

        Ok(CrawlReport {
            phase: terminal,
            counters: self.state.counters,
            max_pages: self.settings.max_pages,
            frontier_remaining: self.state.frontier.len(),
            visited: self.state.frontier.visited_count(),
            crawled_this_session: self.state.counters.crawled - crawled_at_start,
            elapsed: start_time.elapsed(),
        })
    }

    /// Returns the terminal phase the loop should stop in, if any
    fn termination(&self) -> Option<CrawlPhase> {
        let counters = self.state.counters;

        if counters.saved >= self.settings.max_pages
            || counters.crawled >= self.settings.max_crawled
        {
            Some(CrawlPhase::TerminatedLimitReached)
        } else if self.state.frontier.is_empty() {
            Some(CrawlPhase::TerminatedFrontierExhausted)
        } else if self.interrupt.is_triggered() {
            Some(CrawlPhase::TerminatedInterrupted)
        } else {
            None
        }
    }

    /// Crawls the next URL in the frontier
    async fn crawl_next(&mut self) -> Result<(), HarvestError> {
        let Ok(entry) = self.state.frontier.pop_next() else {
            return Ok(());
        };

        self.state.frontier.mark_visited(&entry.url);
        self.state.counters.crawled += 1;

        let page = match self.fetcher.fetch(&entry.url).await {
            FetchOutcome::Fetched(page) => page,
            FetchOutcome::Failed(e) => {
                if self.settings.verbose {
                    tracing::warn!("Error fetching {}: {}", entry.url, e);
                } else {
                    tracing::debug!("Error fetching {}: {}", entry.url, e);
                }
                return Ok(());
            }
        };

        // A redirect target still waiting in the frontier keeps its own turn
        if page.final_url != entry.url {
            if let Ok(final_url) = normalize_url(&page.final_url) {
                if !self.state.frontier.is_pending(final_url.as_str()) {
                    self.state.frontier.mark_visited(final_url.as_str());
                }
            }
        }

        match self.extractor.extract(&page.html) {
            Extraction::Extracted(text) => {
                let seq = self.state.counters.saved + 1;
                let path = self.corpus.write_page(seq, &text)?;
                self.state.counters.saved = seq;
                self.note(format_args!(
                    "Saved {} ({} lines) from {}",
                    path.display(),
                    text.lines().count(),
                    entry.url
                ));
            }
            Extraction::NoText => {
                self.note(format_args!("No Nepali text on {}", entry.url));
            }
        }

        let queued = self.enqueue_links(&entry, &page.links);
        tracing::debug!(
            "{} links on {} ({:?}), {} queued",
            page.links.len(),
            entry.url,
            page.title.as_deref().unwrap_or(""),
            queued
        );

        Ok(())
    }

    /// Normalizes, scopes and enqueues discovered links one level deeper
    ///
    /// Returns the number of links actually added to the frontier.
    fn enqueue_links(&mut self, parent: &FrontierEntry, links: &[String]) -> usize {
        let mut queued = 0;

        for link in links {
            let Ok(url) = normalize_url(link) else {
                continue;
            };

            if !self.scope.classify(&url).should_follow() {
                continue;
            }

            if self
                .state
                .enqueue_child(url.as_str(), parent.depth)
                .is_queued()
            {
                queued += 1;
            }
        }

        queued
    }

    /// Writes a checkpoint, passing through the Checkpointing phase
    fn checkpoint(&mut self) -> Result<(), HarvestError> {
        self.transition(CrawlPhase::Checkpointing);
        let result = self.store.save(&self.state);
        self.transition(CrawlPhase::Running);

        result?;
        tracing::debug!("Checkpoint written to {}", self.store.location().display());
        Ok(())
    }

    fn transition(&mut self, next: CrawlPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid phase transition {} -> {}",
            self.phase,
            next
        );
        self.phase = next;
    }

    /// Per-page decisions go to info in verbose mode and to debug otherwise
    fn note(&self, message: std::fmt::Arguments<'_>) {
        if self.settings.verbose {
            tracing::info!("{}", message);
        } else {
            tracing::debug!("{}", message);
        }
    }
}
