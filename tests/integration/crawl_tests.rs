//! End-to-end crawl tests
//!
//! These tests use wiremock to create mock HTTP servers and test the full
//! crawl cycle: fetching, extraction, corpus files and checkpoints.

use crate::support::{corpus_files, create_test_config, english_page, mount_page, nepali_page};
use nepali_harvest::crawler::{self, Coordinator, HttpFetcher, InterruptFlag, RunOptions};
use nepali_harvest::extract::NepaliExtractor;
use nepali_harvest::output::CorpusWriter;
use nepali_harvest::storage::{load_state, JsonStateFile};
use nepali_harvest::{CrawlPhase, HarvestError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_page_limit_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let corpus_dir = dir.path().join("corpus");

    // A links to B and C; B has no Nepali text and links to D at depth 2
    mount_page(&mock_server, "/", nepali_page(1, &["/b", "/c"]), 1).await;
    mount_page(&mock_server, "/b", english_page(&["/d"]), 1).await;
    mount_page(&mock_server, "/c", nepali_page(3, &[]), 1).await;
    mount_page(&mock_server, "/d", nepali_page(4, &[]), 0).await;

    let config = create_test_config(&mock_server.uri(), &corpus_dir, 2, 1);
    let options = RunOptions {
        resume: false,
        state_file: Some(dir.path().join("state.json")),
        config_hash: None,
    };

    let report = crawler::run(&config, options, InterruptFlag::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.phase, CrawlPhase::TerminatedLimitReached);
    assert_eq!(report.counters.saved, 2);
    assert_eq!(report.counters.crawled, 3);

    let files = corpus_files(&corpus_dir);
    let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["page_1.txt", "page_2.txt"]);
    assert!(files[0].1.contains("१"));
    assert!(files[1].1.contains("३"));
    assert_eq!(files[0].1.lines().count(), 2);

    // The final checkpoint matches the report
    let persisted = load_state(&dir.path().join("state.json"), 1).expect("State not saved");
    assert_eq!(persisted.state.counters, report.counters);
    let too_deep = format!("{}/d", mock_server.uri());
    assert!(!persisted.state.frontier.is_pending(&too_deep));
    assert!(!persisted.state.frontier.is_visited(&too_deep));
}

#[tokio::test]
async fn test_fetch_failures_do_not_stop_the_crawl() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let corpus_dir = dir.path().join("corpus");

    mount_page(
        &mock_server,
        "/",
        nepali_page(1, &["/broken", "/report.pdf", "/missing", "/ok"]),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/ok", nepali_page(2, &[]), 1).await;

    let config = create_test_config(&mock_server.uri(), &corpus_dir, 10, 3);
    let options = RunOptions {
        state_file: Some(dir.path().join("state.json")),
        ..RunOptions::default()
    };

    let report = crawler::run(&config, options, InterruptFlag::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.phase, CrawlPhase::TerminatedFrontierExhausted);
    assert_eq!(report.counters.crawled, 5);
    assert_eq!(report.counters.saved, 2);
    assert_eq!(corpus_files(&corpus_dir).len(), 2);
}

#[tokio::test]
async fn test_off_site_links_are_never_fetched() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    let off_site = format!("http://localhost:{}/elsewhere", other_server.address().port());
    let archived = "https://web.archive.org/web/2024/http://127.0.0.1/";

    mount_page(
        &mock_server,
        "/",
        nepali_page(1, &[off_site.as_str(), archived, "/next#comments", "/next"]),
        1,
    )
    .await;
    mount_page(&mock_server, "/next", nepali_page(2, &["/"]), 1).await;
    mount_page(&other_server, "/elsewhere", nepali_page(3, &[]), 0).await;

    let config = create_test_config(&mock_server.uri(), &dir.path().join("corpus"), 10, 3);
    let options = RunOptions {
        state_file: Some(dir.path().join("state.json")),
        ..RunOptions::default()
    };

    let report = crawler::run(&config, options, InterruptFlag::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.counters.crawled, 2);
    assert_eq!(report.counters.saved, 2);
}

#[tokio::test]
async fn test_unwritable_state_file_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(&mock_server, "/", nepali_page(1, &[]), 1).await;

    // The state file's parent is a regular file, so every save fails
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").expect("Failed to create blocker");

    let config = create_test_config(&mock_server.uri(), &dir.path().join("corpus"), 10, 3);
    let store = JsonStateFile::new(blocker.join("state.json"), None);
    let state = crawler::fresh_state(&config).expect("Invalid seeds");

    let mut coordinator = Coordinator::new(
        &config,
        HttpFetcher::from_config(&config).expect("Failed to build client"),
        NepaliExtractor::from_config(&config.extractor),
        store,
        CorpusWriter::new(dir.path().join("corpus")).expect("Failed to open corpus"),
        state,
        InterruptFlag::new(),
    )
    .expect("Failed to create coordinator");

    let result = coordinator.run().await;

    assert!(matches!(result, Err(HarvestError::Persist(_))));
}
