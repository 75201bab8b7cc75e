//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a minimum delay between requests
//! - Charset decoding, HTML parsing and link extraction
//! - Cooperative interrupt handling
//! - Overall crawl coordination

mod coordinator;
mod decode;
mod fetcher;
mod interrupt;
mod parser;

pub use coordinator::Coordinator;
pub use decode::decode_body;
pub use fetcher::{
    build_http_client, FetchError, FetchOutcome, FetchedPage, HttpFetcher, PageFetcher,
};
pub use interrupt::{install_signal_handlers, InterruptFlag};
pub use parser::{parse_html, ParsedPage};

use crate::config::Config;
use crate::extract::NepaliExtractor;
use crate::output::{CorpusWriter, CrawlReport};
use crate::state::CrawlState;
use crate::storage::{JsonStateFile, StateStore};
use crate::url::normalize_url;
use crate::HarvestError;
use std::path::PathBuf;

/// Session options that do not live in the config file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Continue from the state file instead of starting from the seeds
    pub resume: bool,

    /// Overrides `output.state-file`
    pub state_file: Option<PathBuf>,

    /// Hash of the config file, recorded in every checkpoint
    pub config_hash: Option<String>,
}

impl RunOptions {
    /// The state file this session reads and writes
    pub fn state_path(&self, config: &Config) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.state_file))
    }
}

/// Runs a complete crawl session
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Load the saved state when resuming, or seed a fresh frontier
/// 2. Build the HTTP client and the extractor
/// 3. Drive the coordinator until a limit, exhaustion or an interrupt
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `options` - Resume and state file options
/// * `interrupt` - Flag raised by the signal handlers
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The session ended in a terminal phase
/// * `Err(HarvestError)` - The session could not start, or a checkpoint or
///   corpus file could not be written
pub async fn run(
    config: &Config,
    options: RunOptions,
    interrupt: InterruptFlag,
) -> Result<CrawlReport, HarvestError> {
    let store = JsonStateFile::new(options.state_path(config), options.config_hash.clone());
    let state = initial_state(config, &store, options.resume, options.config_hash.as_deref())?;

    let fetcher = HttpFetcher::from_config(config)?;
    let extractor = NepaliExtractor::from_config(&config.extractor);
    let corpus = CorpusWriter::new(&config.output.corpus_dir)?;

    let mut coordinator =
        Coordinator::new(config, fetcher, extractor, store, corpus, state, interrupt)?;
    coordinator.run().await
}

/// Chooses the state a session starts from
///
/// With `resume`, a missing or corrupt state file falls back to a fresh
/// crawl with a warning; any other load failure is returned.
pub fn initial_state<S: StateStore>(
    config: &Config,
    store: &S,
    resume: bool,
    config_hash: Option<&str>,
) -> Result<CrawlState, HarvestError> {
    if resume {
        match store.load(config.crawler.max_depth) {
            Ok(persisted) => {
                if let (Some(saved), Some(current)) = (persisted.config_hash.as_deref(), config_hash)
                {
                    if saved != current {
                        tracing::warn!(
                            "Config file changed since the state was saved; continuing with the new config"
                        );
                    }
                }

                if page_limit_reached(&persisted.state, config) {
                    tracing::warn!(
                        "State already holds {} saved pages and max-pages is {}; raise --max-pages to crawl further",
                        persisted.state.counters.saved,
                        config.crawler.max_pages
                    );
                }

                tracing::info!(
                    "Resuming from {} (saved {}): {} crawled, {} saved, {} queued",
                    store.location().display(),
                    persisted.saved_at.to_rfc3339(),
                    persisted.state.counters.crawled,
                    persisted.state.counters.saved,
                    persisted.state.frontier.len()
                );
                return Ok(persisted.state);
            }
            Err(e) if e.allows_fresh_start() => {
                tracing::warn!("{}; starting a fresh crawl", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    fresh_state(config)
}

/// True when a restored state has nothing left to save under the current limit
fn page_limit_reached(state: &CrawlState, config: &Config) -> bool {
    state.counters.saved >= config.crawler.max_pages
}

/// Builds the state of a fresh crawl from the configured seeds
pub fn fresh_state(config: &Config) -> Result<CrawlState, HarvestError> {
    let seeds = seed_urls(config)?;
    tracing::info!("Seeding frontier with {} URLs", seeds.len());
    Ok(CrawlState::fresh(seeds, config.crawler.max_depth))
}

/// Normalized seed URLs of all configured sites
pub fn seed_urls(config: &Config) -> Result<Vec<String>, HarvestError> {
    config
        .sites
        .iter()
        .map(|site| {
            normalize_url(&site.seed)
                .map(|url| url.to_string())
                .map_err(HarvestError::from)
        })
        .collect()
}
