//! Line-oriented M3U playlist parsing
//!
//! A `#EXTINF` line starts an entry and the line immediately after it is the
//! entry's URL. Parsing is a single forward pass over the document.

use tracing::debug;

use crate::models::PlaylistEntry;
use crate::utils::UrlUtils;

/// Metadata marker that starts an entry
pub const EXTINF_MARKER: &str = "#EXTINF";

/// Header line of an extended M3U document
pub const M3U_HEADER: &str = "#EXTM3U";

/// Result of parsing one playlist document
#[derive(Debug, Clone, Default)]
pub struct ParsedPlaylist {
    pub entries: Vec<PlaylistEntry>,
    /// Entries dropped for a non-HTTP URL or an IPv6 literal host
    pub discarded: usize,
    pub total_lines: usize,
}

#[derive(Debug, Clone, Default)]
pub struct M3uParser {
    synthesize_missing_labels: bool,
}

impl M3uParser {
    pub fn new(synthesize_missing_labels: bool) -> Self {
        Self {
            synthesize_missing_labels,
        }
    }

    pub fn parse(&self, content: &str) -> ParsedPlaylist {
        let mut parsed = ParsedPlaylist::default();
        let mut pending_label: Option<&str> = None;
        let mut seen_metadata = false;

        for (line_num, line) in content.lines().enumerate() {
            parsed.total_lines += 1;
            let trimmed = line.trim();

            if trimmed.starts_with(EXTINF_MARKER) {
                seen_metadata = true;
                if let Some(orphan) = pending_label.replace(line.trim_end()) {
                    debug!("EXTINF without URL before line {}: {}", line_num + 1, orphan);
                    parsed.discarded += 1;
                }
                continue;
            }

            match pending_label.take() {
                Some(label) => self.push_entry(&mut parsed, label.to_string(), trimmed, line_num + 1),
                None if self.synthesize_missing_labels
                    && !seen_metadata
                    && UrlUtils::is_http_url(trimmed) =>
                {
                    let label = format!("{EXTINF_MARKER}:-1,{}", UrlUtils::name_from_url(trimmed));
                    self.push_entry(&mut parsed, label, trimmed, line_num + 1);
                }
                None => {}
            }
        }

        if pending_label.is_some() {
            parsed.discarded += 1;
        }

        parsed
    }

    fn push_entry(&self, parsed: &mut ParsedPlaylist, label: String, url: &str, line_number: usize) {
        if UrlUtils::is_acceptable_stream_url(url) {
            parsed.entries.push(PlaylistEntry::new(label, url));
        } else {
            debug!("Skipping entry at line {}: unusable URL '{}'", line_number, url);
            parsed.discarded += 1;
        }
    }
}
