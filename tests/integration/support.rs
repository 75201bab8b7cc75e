//! Shared helpers for the integration tests

use nepali_harvest::config::{Config, ExtractorConfig, SiteEntry};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `seed` into `corpus_dir`
///
/// Requests are not throttled and the extractor checks the script only, so
/// results do not depend on language detection heuristics.
pub fn create_test_config(seed: &str, corpus_dir: &Path, max_pages: u64, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.max_depth = max_depth;
    config.crawler.checkpoint_interval = 2;
    config.crawler.minimum_time_between_requests = 0;
    config.crawler.request_timeout = 5;
    config.output.corpus_dir = corpus_dir.display().to_string();
    config.extractor = ExtractorConfig {
        min_lines: 2,
        require_nepali: false,
    };
    config.sites = vec![SiteEntry {
        seed: seed.to_string(),
        domain: None,
        url_patterns: vec![],
    }];
    config
}

/// An HTML page with two Nepali paragraphs numbered `n`, plus links
///
/// The number is written in Devanagari digits so it survives text cleaning.
pub fn nepali_page(n: u32, links: &[&str]) -> String {
    let marker = devanagari_number(n);
    format!(
        r#"<html><head><title>{marker}</title></head><body>
        <p>समाचार नम्बर {marker}: काठमाडौं उपत्यकामा आज बिहानदेखि पानी परिरहेको छ।</p>
        <p>मौसम पूर्वानुमान महाशाखाका अनुसार भोलि पनि वर्षा हुनेछ।</p>
        {}
        </body></html>"#,
        anchors(links)
    )
}

/// An HTML page without any Devanagari text, plus links
pub fn english_page(links: &[&str]) -> String {
    format!(
        r#"<html><head><title>English</title></head><body>
        <p>This page has no Nepali text at all.</p>
        <p>It only links to other pages.</p>
        {}
        </body></html>"#,
        anchors(links)
    )
}

/// Writes `n` with Devanagari digits
pub fn devanagari_number(n: u32) -> String {
    n.to_string()
        .chars()
        .filter_map(|d| d.to_digit(10))
        .filter_map(|d| char::from_u32(0x0966 + d))
        .collect()
}

fn anchors(links: &[&str]) -> String {
    links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mounts an HTML page at `route`, expecting exactly `times` requests
pub async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Reads all corpus files, sorted by file name
pub fn corpus_files(dir: &Path) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = std::fs::read_dir(dir)
        .expect("Failed to read corpus dir")
        .map(|entry| {
            let entry = entry.expect("Failed to read dir entry");
            let name = entry.file_name().to_string_lossy().into_owned();
            let content = std::fs::read_to_string(entry.path()).expect("Failed to read page");
            (name, content)
        })
        .collect();
    files.sort();
    files
}
