use serde::Deserialize;

/// Main configuration structure for Nepali Harvest
///
/// Every section is optional; a missing section falls back to the defaults
/// below, which reproduce a single-site crawl of nepalpress.com.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(rename = "site", default = "default_sites")]
    pub sites: Vec<SiteEntry>,
    #[serde(default = "default_exclusions")]
    pub exclude: Vec<DomainEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            extractor: ExtractorConfig::default(),
            sites: default_sites(),
            exclude: default_exclusions(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of saved pages after which the crawl stops
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u64,

    /// Maximum link depth from a seed URL (seeds are depth 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Hard cap on fetch attempts, saved or not
    #[serde(rename = "max-crawled", default = "default_max_crawled")]
    pub max_crawled: u64,

    /// Number of crawled pages between two state checkpoints
    #[serde(rename = "checkpoint-interval", default = "default_checkpoint_interval")]
    pub checkpoint_interval: u64,

    /// Minimum time between two consecutive requests (milliseconds)
    #[serde(
        rename = "minimum-time-between-requests",
        default = "default_minimum_time_between_requests"
    )]
    pub minimum_time_between_requests: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Log every page decision at info level
    #[serde(default)]
    pub verbose: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            max_crawled: default_max_crawled(),
            checkpoint_interval: default_checkpoint_interval(),
            minimum_time_between_requests: default_minimum_time_between_requests(),
            request_timeout: default_request_timeout(),
            verbose: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{})",
            self.crawler_name, self.crawler_version
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one text file per saved page
    #[serde(rename = "corpus-dir", default = "default_corpus_dir")]
    pub corpus_dir: String,

    /// Path of the crawl state snapshot
    #[serde(rename = "state-file", default = "default_state_file")]
    pub state_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            state_file: default_state_file(),
        }
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Minimum number of Nepali paragraphs for a page to be saved
    #[serde(rename = "min-lines", default = "default_min_lines")]
    pub min_lines: usize,

    /// Require paragraphs to be detected as Nepali rather than just Devanagari
    #[serde(rename = "require-nepali", default = "default_require_nepali")]
    pub require_nepali: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_lines: default_min_lines(),
            require_nepali: default_require_nepali(),
        }
    }
}

/// A site to crawl, with its seed URL and link filters
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Seed URL, crawled at depth 0
    pub seed: String,

    /// Domain pattern of followed links (e.g., "*.example.com");
    /// defaults to the seed's host
    #[serde(default)]
    pub domain: Option<String>,

    /// Regexes of which at least one must match a followed link;
    /// an empty list follows every in-domain link
    #[serde(rename = "url-patterns", default)]
    pub url_patterns: Vec<String>,
}

/// Simple domain entry for the exclusion list
#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    /// Domain pattern (e.g., "example.com" or "*.example.com")
    pub domain: String,
}

fn default_max_pages() -> u64 {
    150
}

fn default_max_depth() -> u32 {
    10
}

fn default_max_crawled() -> u64 {
    10_000
}

fn default_checkpoint_interval() -> u64 {
    100
}

fn default_minimum_time_between_requests() -> u64 {
    100
}

fn default_request_timeout() -> u64 {
    10
}

fn default_crawler_name() -> String {
    "NepaliCrawler".to_string()
}

fn default_crawler_version() -> String {
    "1.0".to_string()
}

fn default_corpus_dir() -> String {
    "nepali_corpus".to_string()
}

fn default_state_file() -> String {
    "crawler_state.json".to_string()
}

fn default_min_lines() -> usize {
    2
}

fn default_require_nepali() -> bool {
    true
}

fn default_sites() -> Vec<SiteEntry> {
    vec![SiteEntry {
        seed: "https://www.nepalpress.com/".to_string(),
        domain: None,
        url_patterns: vec![r"https://www\.nepalpress\.com/(2023|2024)".to_string()],
    }]
}

fn default_exclusions() -> Vec<DomainEntry> {
    vec![DomainEntry {
        domain: "web.archive.org".to_string(),
    }]
}
