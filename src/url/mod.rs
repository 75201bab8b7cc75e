//! URL handling module for Nepali Harvest
//!
//! This module provides URL normalization, wildcard domain matching and the
//! link scope that decides which discovered links are worth following.

mod matcher;
mod normalize;

use crate::config::Config;
use crate::ConfigError;
use url::Url;

// Re-export main functions
pub use matcher::{matches_wildcard, UrlPatterns};
pub use normalize::normalize_url;

/// Extracts the lowercase host from a URL
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// What to do with a discovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkDecision {
    /// In scope - enqueue it
    Follow,
    /// Host is on the exclusion list
    Excluded,
    /// Host does not belong to any configured site
    OffSite,
    /// Host belongs to a site but the URL matches none of its patterns
    PatternMismatch,
}

impl LinkDecision {
    /// Returns true if the link should be enqueued
    pub fn should_follow(&self) -> bool {
        matches!(self, Self::Follow)
    }
}

/// Scope of a single configured site
#[derive(Debug, Clone)]
struct SiteScope {
    domain: String,
    patterns: UrlPatterns,
}

/// Decides which links belong to the crawl
///
/// Built once from the configuration: each `[[site]]` contributes a domain
/// pattern (its explicit `domain`, or the seed's host) and its URL regexes,
/// and `[[exclude]]` entries veto hosts outright.
#[derive(Debug, Clone)]
pub struct LinkScope {
    sites: Vec<SiteScope>,
    excluded: Vec<String>,
}

impl LinkScope {
    /// Builds the scope from configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut sites = Vec::with_capacity(config.sites.len());

        for site in &config.sites {
            let domain = match &site.domain {
                Some(domain) => domain.to_lowercase(),
                None => {
                    let seed = normalize_url(&site.seed).map_err(|e| {
                        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", site.seed, e))
                    })?;
                    extract_domain(&seed).ok_or_else(|| {
                        ConfigError::InvalidUrl(format!("Seed URL '{}' has no host", site.seed))
                    })?
                }
            };

            let patterns = UrlPatterns::compile(&site.url_patterns)
                .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;

            sites.push(SiteScope { domain, patterns });
        }

        let excluded = config
            .exclude
            .iter()
            .map(|entry| entry.domain.to_lowercase())
            .collect();

        Ok(Self { sites, excluded })
    }

    /// Classifies a normalized URL
    ///
    /// Exclusions win over site membership. A host may belong to several
    /// sites; the link is followed if any of them accepts it.
    pub fn classify(&self, url: &Url) -> LinkDecision {
        let Some(domain) = extract_domain(url) else {
            return LinkDecision::OffSite;
        };

        if self
            .excluded
            .iter()
            .any(|pattern| matches_wildcard(pattern, &domain))
        {
            return LinkDecision::Excluded;
        }

        let mut on_site = false;
        for site in &self.sites {
            if matches_wildcard(&site.domain, &domain) {
                on_site = true;
                if site.patterns.matches(url.as_str()) {
                    return LinkDecision::Follow;
                }
            }
        }

        if on_site {
            LinkDecision::PatternMismatch
        } else {
            LinkDecision::OffSite
        }
    }
}
