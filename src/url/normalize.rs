use crate::UrlError;
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a URL into the form used as its crawl identity
///
/// Two links that normalize to the same string are the same page as far as
/// the visited set and the frontier are concerned.
///
/// # Normalization Steps
///
/// 1. Repair a collapsed scheme separator (`https:/host` becomes `https://host`)
/// 2. Parse the URL; reject if malformed or not HTTP(S)
/// 3. Lowercase the host
/// 4. Normalize path:
///    - Remove dot segments and repeated slashes
///    - Remove trailing slash (except for root /)
/// 5. Remove fragment
/// 6. Remove tracking query parameters, sort the rest
///
/// # Examples
///
/// ```
/// use nepali_harvest::url::normalize_url;
///
/// let url = normalize_url("https:/www.NepalPress.com/2024/07/01/").unwrap();
/// assert_eq!(url.as_str(), "https://www.nepalpress.com/2024/07/01");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let repaired = repair_scheme_separator(url_str.trim());

    let mut url = Url::parse(&repaired).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if let Some(host) = url.host_str() {
        let normalized_host = host.to_lowercase();
        if normalized_host != host {
            url.set_host(Some(&normalized_host))
                .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
        }
    } else {
        return Err(UrlError::MissingDomain);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let filtered_params = filter_and_sort_query_params(&url);

        if filtered_params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(filtered_params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }

    Ok(url)
}

/// Turns `http:/host` and `https:/host` into their two-slash form
///
/// Some news sites emit hrefs with a single slash after the scheme; a plain
/// parse would treat the host as the first path segment.
fn repair_scheme_separator(url_str: &str) -> String {
    for scheme in ["https:/", "http:/"] {
        if let Some(rest) = url_str.strip_prefix(scheme) {
            if !rest.starts_with('/') {
                return format!("{}/{}", scheme, rest);
            }
        }
    }
    url_str.to_string()
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort();
    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repairs_single_slash_scheme() {
        let result = normalize_url("https:/www.nepalpress.com/2024/news").unwrap();
        assert_eq!(result.as_str(), "https://www.nepalpress.com/2024/news");

        let result = normalize_url("http:/example.com/page").unwrap();
        assert_eq!(result.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_keeps_scheme_and_www() {
        let result = normalize_url("http://www.example.com/page").unwrap();
        assert_eq!(result.as_str(), "http://www.example.com/page");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/page/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#comments").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_tracking_params_removed_and_rest_sorted() {
        let result = normalize_url(
            "https://example.com/page?keep=yes&utm_medium=email&another=value&fbclid=123",
        )
        .unwrap();
        assert_eq!(
            result.as_str(),
            "https://example.com/page?another=value&keep=yes"
        );

        let result = normalize_url("https://example.com/page?utm_source=a&gclid=c").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_content_params_are_kept() {
        let first = normalize_url("https://a.com/news.php?ref=101").unwrap();
        let second = normalize_url("https://a.com/news.php?ref=102").unwrap();
        assert_ne!(first, second);
        assert_eq!(first.as_str(), "https://a.com/news.php?ref=101");

        let result = normalize_url("https://a.com/news.php?source=ekantipur&id=7").unwrap();
        assert_eq!(result.as_str(), "https://a.com/news.php?id=7&source=ekantipur");
    }

    #[test]
    fn test_dot_segments_and_repeated_slashes() {
        let result = normalize_url("https://example.com///a/../b/./c//").unwrap();
        assert_eq!(result.as_str(), "https://example.com/b/c");
    }

    #[test]
    fn test_lowercase_host_only() {
        let result = normalize_url("https://EKANTIPUR.COM/News").unwrap();
        assert_eq!(result.as_str(), "https://ekantipur.com/News");
    }

    #[test]
    fn test_devanagari_path_is_stable() {
        let first = normalize_url("https://example.com/समाचार/").unwrap();
        let second = normalize_url(first.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/page");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        assert!(normalize_url("not a url").is_err());
    }
}
