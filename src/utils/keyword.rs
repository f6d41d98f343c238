//! Keyword normalization and keyword list loading
//!
//! Matching works on normalized tokens: lowercase ASCII letters and digits
//! only. The same transformation is applied to keywords and to playlist
//! labels, so `"HD Channel-1"` and `"hdchannel1"` are the same token.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::Keyword;

/// Lowercase `raw` and drop every character that is not an ASCII letter or digit
pub fn normalize(raw: &str) -> Keyword {
    let token = raw
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    Keyword::from_normalized(token)
}

/// Ordered keyword tokens plus the raw labels they came from
#[derive(Debug, Clone, Default)]
pub struct KeywordList {
    /// Distinct tokens in priority order
    keywords: Vec<Keyword>,
    /// Token -> first raw label that produced it
    display: HashMap<Keyword, String>,
    /// Every accepted raw label with its token, in file order
    raw: Vec<(String, Keyword)>,
}

impl KeywordList {
    /// Build from raw labels, keeping the first occurrence of each token
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for label in labels {
            let label = label.into();
            let keyword = normalize(&label);
            if keyword.is_empty() {
                warn!("Ignoring keyword '{}': nothing left after normalization", label);
                continue;
            }
            if !list.display.contains_key(&keyword) {
                list.display.insert(keyword.clone(), label.clone());
                list.keywords.push(keyword.clone());
            } else {
                debug!("Keyword '{}' shares token '{}' with an earlier line", label, keyword);
            }
            list.raw.push((label, keyword));
        }
        list
    }

    /// Parse a keyword file body
    ///
    /// Blank lines, `#` comments and lines containing `sentinel` are skipped.
    /// An empty `sentinel` disables that filter.
    pub fn parse(content: &str, sentinel: &str) -> Self {
        let labels = content.lines().map(str::trim).filter(|line| {
            !line.is_empty()
                && !line.starts_with('#')
                && (sentinel.is_empty() || !line.contains(sentinel))
        });
        Self::from_labels(labels)
    }

    /// Distinct tokens in priority order
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Raw label to show for a token
    pub fn display_label<'a>(&'a self, keyword: &'a Keyword) -> &'a str {
        self.display
            .get(keyword)
            .map(String::as_str)
            .unwrap_or(keyword.as_str())
    }

    /// Raw labels in file order with their tokens
    pub fn raw_labels(&self) -> &[(String, Keyword)] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_case_and_punctuation() {
        assert_eq!(normalize("HD Channel-1"), normalize("hdchannel1"));
        assert_eq!(normalize("HD Channel-1").as_str(), "hdchannel1");
        assert_eq!(normalize("CCTV-5+ 体育").as_str(), "cctv5");
        assert_eq!(normalize("!!!").as_str(), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Sports HD", "#EXTINF:-1,News 24", "ÄÖÜ abc", "", "already"] {
            let once = normalize(raw);
            assert_eq!(normalize(once.as_str()), once);
        }
    }

    #[test]
    fn test_parse_skips_comments_blanks_and_sentinel() {
        let content = "# channels\n\nSports\nMovies,#genre#\n  News  \n";
        let list = KeywordList::parse(content, "genre");

        let tokens: Vec<&str> = list.keywords().iter().map(Keyword::as_str).collect();
        assert_eq!(tokens, vec!["sports", "news"]);
        assert_eq!(list.raw_labels().len(), 2);
    }

    #[test]
    fn test_parse_without_sentinel_keeps_genre_lines() {
        let list = KeywordList::parse("Movies,#genre#\n", "");
        assert_eq!(list.keywords()[0].as_str(), "moviesgenre");
    }

    #[test]
    fn test_duplicate_tokens_share_one_slot() {
        let list = KeywordList::from_labels(["Sports", "sports!", "News"]);

        assert_eq!(list.len(), 2);
        assert_eq!(list.display_label(&normalize("SPORTS")), "Sports");
        assert_eq!(list.raw_labels().len(), 3);
        assert_eq!(list.raw_labels()[1].1, normalize("Sports"));
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let list = KeywordList::from_labels(["***", "News"]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.raw_labels().len(), 1);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_normalize_is_idempotent_for_any_string(raw in any::<String>()) {
                let once = normalize(&raw);
                prop_assert_eq!(normalize(once.as_str()), once.clone());
                prop_assert!(once.as_str().chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
            }

            #[test]
            fn test_normalize_ignores_ascii_case(raw in any::<String>()) {
                let token = normalize(&raw);
                prop_assert_eq!(normalize(&raw.to_ascii_uppercase()), token.clone());
                prop_assert_eq!(normalize(&raw.to_ascii_lowercase()), token);
            }

            // Unicode uppercasing can expand to ASCII ('ß' -> "SS"), so full case
            // mapping is only checked on label-like text
            #[test]
            fn test_normalize_ignores_case_of_labels(raw in "[ -~]{0,40}") {
                prop_assert_eq!(normalize(&raw.to_uppercase()), normalize(&raw));
                prop_assert_eq!(normalize(&raw.to_lowercase()), normalize(&raw));
            }
        }
    }
}
