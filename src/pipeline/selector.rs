//! Candidate selection
//!
//! Each entry's label is normalized and tested for substring containment
//! against the keywords in priority order. The first keyword that matches
//! owns the entry; later keywords are never consulted. Entries beyond a
//! keyword's cap, and entries that match nothing, are dropped without being
//! recorded anywhere.

use tracing::debug;

use crate::models::{CandidateSet, Keyword, PlaylistEntry};
use crate::utils::{KeywordList, normalize};

/// Display label of the single bucket used when keyword filtering is off
pub const ALL_CHANNELS_LABEL: &str = "all channels";

/// What happened to one offered entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDecision {
    Added,
    /// Matched a keyword whose bucket is already full
    CapReached,
    NoMatch,
}

/// Counts of decisions over a batch of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    pub added: usize,
    pub cap_reached: usize,
    pub no_match: usize,
}

impl SelectionStats {
    fn record(&mut self, decision: SelectionDecision) {
        match decision {
            SelectionDecision::Added => self.added += 1,
            SelectionDecision::CapReached => self.cap_reached += 1,
            SelectionDecision::NoMatch => self.no_match += 1,
        }
    }
}

#[derive(Debug, Clone)]
enum SelectionMode {
    Keywords { keywords: KeywordList, cap: usize },
    /// Every entry is a candidate, in one uncapped bucket
    Passthrough,
}

#[derive(Debug, Clone)]
pub struct CandidateSelector {
    mode: SelectionMode,
}

impl CandidateSelector {
    pub fn by_keywords(keywords: KeywordList, cap: usize) -> Self {
        Self {
            mode: SelectionMode::Keywords { keywords, cap },
        }
    }

    pub fn passthrough() -> Self {
        Self {
            mode: SelectionMode::Passthrough,
        }
    }

    pub fn keywords(&self) -> Option<&KeywordList> {
        match &self.mode {
            SelectionMode::Keywords { keywords, .. } => Some(keywords),
            SelectionMode::Passthrough => None,
        }
    }

    /// Per-keyword cap, `None` in passthrough mode
    pub fn cap(&self) -> Option<usize> {
        match &self.mode {
            SelectionMode::Keywords { cap, .. } => Some(*cap),
            SelectionMode::Passthrough => None,
        }
    }

    /// First keyword (in priority order) contained in the normalized label
    pub fn match_keyword(&self, label: &str) -> Option<&Keyword> {
        let SelectionMode::Keywords { keywords, .. } = &self.mode else {
            return None;
        };
        let normalized = normalize(label);
        keywords
            .keywords()
            .iter()
            .find(|keyword| normalized.as_str().contains(keyword.as_str()))
    }

    /// Offer one entry to the candidate set
    pub fn offer(&self, set: &mut CandidateSet, entry: PlaylistEntry) -> SelectionDecision {
        match &self.mode {
            SelectionMode::Passthrough => {
                let bucket = set.bucket_mut(&normalize(""), ALL_CHANNELS_LABEL);
                bucket.matched += 1;
                bucket.entries.push(entry);
                SelectionDecision::Added
            }
            SelectionMode::Keywords { keywords, cap } => {
                let Some(keyword) = self.match_keyword(&entry.label) else {
                    return SelectionDecision::NoMatch;
                };
                debug!(
                    "Keyword hit: {} -> {}",
                    keywords.display_label(keyword),
                    entry.label
                );

                let bucket = set.bucket_mut(keyword, keywords.display_label(keyword));
                bucket.matched += 1;
                if bucket.entries.len() < *cap {
                    bucket.entries.push(entry);
                    SelectionDecision::Added
                } else {
                    SelectionDecision::CapReached
                }
            }
        }
    }

    /// Offer a batch of entries, in order
    pub fn extend<I>(&self, set: &mut CandidateSet, entries: I) -> SelectionStats
    where
        I: IntoIterator<Item = PlaylistEntry>,
    {
        let mut stats = SelectionStats::default();
        for entry in entries {
            stats.record(self.offer(set, entry));
        }
        stats
    }

    /// Build a fresh candidate set from `entries`
    pub fn select<I>(&self, entries: I) -> CandidateSet
    where
        I: IntoIterator<Item = PlaylistEntry>,
    {
        let mut set = CandidateSet::new();
        self.extend(&mut set, entries);
        set
    }
}
