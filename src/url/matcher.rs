use regex::Regex;

/// Checks if a domain matches a wildcard pattern
///
/// `"example.com"` matches only itself; `"*.example.com"` matches the bare
/// domain and any subdomain at any depth.
///
/// # Examples
///
/// ```
/// use nepali_harvest::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.onlinekhabar.com", "onlinekhabar.com"));
/// assert!(matches_wildcard("*.onlinekhabar.com", "english.onlinekhabar.com"));
/// assert!(!matches_wildcard("onlinekhabar.com", "english.onlinekhabar.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base
            || candidate
                .strip_suffix(base)
                .is_some_and(|prefix| prefix.ends_with('.'))
    } else {
        candidate == pattern
    }
}

/// A compiled list of URL regexes
///
/// An empty list matches every URL, so a site without `url-patterns`
/// follows all of its in-domain links.
#[derive(Debug, Clone, Default)]
pub struct UrlPatterns {
    patterns: Vec<Regex>,
}

impl UrlPatterns {
    /// Compiles the given patterns
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if any pattern is found in `url`, or if there are no patterns
    pub fn matches(&self, url: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(url))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
