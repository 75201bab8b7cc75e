//! Interrupt and resume tests
//!
//! An interrupted crawl must be resumable from its state file without
//! re-fetching visited pages, re-saving corpus files or skipping pages.

use crate::support::{corpus_files, create_test_config, mount_page, nepali_page};
use async_trait::async_trait;
use nepali_harvest::config::Config;
use nepali_harvest::crawler::{
    self, Coordinator, FetchOutcome, HttpFetcher, InterruptFlag, PageFetcher,
};
use nepali_harvest::extract::NepaliExtractor;
use nepali_harvest::output::{CorpusWriter, CrawlReport};
use nepali_harvest::storage::{load_state, JsonStateFile};
use nepali_harvest::CrawlPhase;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use wiremock::MockServer;

/// Raises the interrupt flag once `limit` pages have been fetched
struct InterruptAfter {
    inner: HttpFetcher,
    flag: InterruptFlag,
    limit: usize,
    fetched: AtomicUsize,
}

#[async_trait]
impl PageFetcher for InterruptAfter {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let outcome = self.inner.fetch(url).await;
        if self.fetched.fetch_add(1, Ordering::SeqCst) + 1 == self.limit {
            self.flag.trigger();
        }
        outcome
    }
}

async fn run_session<F: PageFetcher>(
    config: &Config,
    state_file: &Path,
    resume: bool,
    fetcher: F,
    interrupt: InterruptFlag,
) -> CrawlReport {
    let store = JsonStateFile::new(state_file, None);
    let state = crawler::initial_state(config, &store, resume, None).expect("Failed to load state");

    let mut coordinator = Coordinator::new(
        config,
        fetcher,
        NepaliExtractor::from_config(&config.extractor),
        store,
        CorpusWriter::new(&config.output.corpus_dir).expect("Failed to open corpus"),
        state,
        interrupt,
    )
    .expect("Failed to create coordinator");

    coordinator.run().await.expect("Crawl failed")
}

/// Mounts a home page linking to eight Nepali articles, each fetched once
async fn mount_site(server: &MockServer) {
    let articles: Vec<String> = (1..=8).map(|n| format!("/article/{}", n)).collect();
    let links: Vec<&str> = articles.iter().map(String::as_str).collect();

    mount_page(server, "/", nepali_page(0, &links), 1).await;
    for (n, route) in (1..=8).zip(&articles) {
        mount_page(server, route, nepali_page(n, &[]), 1).await;
    }
}

#[tokio::test]
async fn test_interrupt_then_resume_saves_every_page_once() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let corpus_dir = dir.path().join("corpus");
    let state_file = dir.path().join("state.json");
    let config = create_test_config(&mock_server.uri(), &corpus_dir, 150, 3);

    // First session: interrupted after five pages
    let interrupt = InterruptFlag::new();
    let fetcher = InterruptAfter {
        inner: HttpFetcher::from_config(&config).expect("Failed to build client"),
        flag: interrupt.clone(),
        limit: 5,
        fetched: AtomicUsize::new(0),
    };
    let first = run_session(&config, &state_file, false, fetcher, interrupt).await;

    assert_eq!(first.phase, CrawlPhase::TerminatedInterrupted);
    assert_eq!(first.counters.crawled, 5);
    assert_eq!(first.counters.saved, 5);
    assert_eq!(corpus_files(&corpus_dir).len(), 5);

    let persisted = load_state(&state_file, 3).expect("Interrupted crawl must save state");
    assert_eq!(persisted.state.counters, first.counters);
    assert_eq!(persisted.state.frontier.len(), 4);
    assert_eq!(persisted.state.frontier.visited_count(), 5);

    // Second session: resumes where the first stopped
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build client");
    let second = run_session(&config, &state_file, true, fetcher, InterruptFlag::new()).await;

    assert_eq!(second.phase, CrawlPhase::TerminatedFrontierExhausted);
    assert_eq!(second.counters.crawled, 9);
    assert_eq!(second.counters.saved, 9);
    assert_eq!(second.crawled_this_session, 4);

    // Nine distinct files, numbered without gaps
    let files = corpus_files(&corpus_dir);
    let names: HashSet<String> = files.iter().map(|(name, _)| name.clone()).collect();
    let expected: HashSet<String> = (1..=9).map(|n| format!("page_{}.txt", n)).collect();
    assert_eq!(names, expected);

    let contents: HashSet<&str> = files.iter().map(|(_, content)| content.as_str()).collect();
    assert_eq!(contents.len(), 9);

    // Every mounted page was requested exactly once across both sessions
    mock_server.verify().await;
}

#[tokio::test]
async fn test_resume_without_state_file_starts_fresh() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", nepali_page(1, &[]), 1).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &dir.path().join("corpus"), 10, 3);

    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build client");
    let report = run_session(
        &config,
        &dir.path().join("missing.json"),
        true,
        fetcher,
        InterruptFlag::new(),
    )
    .await;

    assert_eq!(report.phase, CrawlPhase::TerminatedFrontierExhausted);
    assert_eq!(report.counters.saved, 1);
    assert!(dir.path().join("missing.json").exists());
}

#[tokio::test]
async fn test_resume_after_page_limit_with_higher_limit() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let corpus_dir = dir.path().join("corpus");
    let state_file = dir.path().join("state.json");

    let config = create_test_config(&mock_server.uri(), &corpus_dir, 3, 3);
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build client");
    let first = run_session(&config, &state_file, false, fetcher, InterruptFlag::new()).await;
    assert_eq!(first.phase, CrawlPhase::TerminatedLimitReached);
    assert_eq!(first.counters.saved, 3);

    // Resuming with the same limit does nothing
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build client");
    let again = run_session(&config, &state_file, true, fetcher, InterruptFlag::new()).await;
    assert_eq!(again.phase, CrawlPhase::TerminatedLimitReached);
    assert_eq!(again.crawled_this_session, 0);

    // Raising the limit continues the same crawl
    let config = create_test_config(&mock_server.uri(), &corpus_dir, 150, 3);
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build client");
    let last = run_session(&config, &state_file, true, fetcher, InterruptFlag::new()).await;

    assert_eq!(last.phase, CrawlPhase::TerminatedFrontierExhausted);
    assert_eq!(last.counters.saved, 9);
    assert_eq!(corpus_files(&corpus_dir).len(), 9);
    mock_server.verify().await;
}
