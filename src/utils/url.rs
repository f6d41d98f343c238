//! URL checks applied to playlist entries and source locations

use url::{Host, Url};

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Whether the string starts with an `http://` or `https://` scheme
    ///
    /// ```rust
    /// use stream_curator::utils::url::UrlUtils;
    ///
    /// assert!(UrlUtils::is_http_url("https://example.com/live.m3u8"));
    /// assert!(UrlUtils::is_http_url("HTTP://example.com/a.ts"));
    /// assert!(!UrlUtils::is_http_url("rtmp://example.com/live"));
    /// ```
    pub fn is_http_url(url: &str) -> bool {
        let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Whether the URL points at an IPv6 literal host
    ///
    /// Any bracket or `::` sequence counts, even when the URL would not parse.
    pub fn has_ipv6_literal_host(url: &str) -> bool {
        if url.contains('[') || url.contains("::") {
            return true;
        }
        Url::parse(url).is_ok_and(|u| matches!(u.host(), Some(Host::Ipv6(_))))
    }

    /// A URL that may become a playlist entry
    pub fn is_acceptable_stream_url(url: &str) -> bool {
        !url.is_empty() && Self::is_http_url(url) && !Self::has_ipv6_literal_host(url)
    }

    /// Channel name guessed from the last path segment, without query string
    pub fn name_from_url(url: &str) -> String {
        url.split(['?', '#'])
            .next()
            .unwrap_or(url)
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty() && !segment.contains(':'))
            .unwrap_or("Unnamed Channel")
            .to_string()
    }
}
