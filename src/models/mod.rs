use std::collections::HashMap;
use std::fmt;

/// One `(label, url)` pair read from a playlist document
///
/// The label is the full metadata line (e.g. `#EXTINF:-1,Sports HD`) and is
/// written back verbatim when the entry is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub label: String,
    pub url: String,
}

impl PlaylistEntry {
    pub fn new<L: Into<String>, U: Into<String>>(label: L, url: U) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Normalized matching token derived from a channel label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(String);

impl Keyword {
    /// Wrap an already-normalized token
    pub(crate) fn from_normalized(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidates collected for one keyword
#[derive(Debug, Clone)]
pub struct CandidateBucket {
    pub keyword: Keyword,
    /// Display label for reporting (first raw keyword that produced the token)
    pub display: String,
    pub entries: Vec<PlaylistEntry>,
    /// Every match seen, including those dropped at the cap
    pub matched: usize,
}

/// Keyword -> candidates, in the order keywords first matched
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    buckets: Vec<CandidateBucket>,
    index: HashMap<Keyword, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket for `keyword`, created at the end of the order on first use
    pub fn bucket_mut(&mut self, keyword: &Keyword, display: &str) -> &mut CandidateBucket {
        let position = match self.index.get(keyword) {
            Some(&position) => position,
            None => {
                self.buckets.push(CandidateBucket {
                    keyword: keyword.clone(),
                    display: display.to_string(),
                    entries: Vec::new(),
                    matched: 0,
                });
                self.index.insert(keyword.clone(), self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[position]
    }

    pub fn get(&self, keyword: &Keyword) -> Option<&CandidateBucket> {
        self.index.get(keyword).map(|&position| &self.buckets[position])
    }

    pub fn buckets(&self) -> &[CandidateBucket] {
        &self.buckets
    }

    /// Total number of candidates across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Width and height reported by the media inspector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Why a candidate was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    UnknownResolution,
    LowResolution { width: u32, height: u32 },
    LowThroughput,
    ProbeError(String),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownResolution => f.write_str("unable to determine resolution"),
            Self::LowResolution { width, height } => {
                write!(f, "resolution too low: {width}x{height}")
            }
            Self::LowThroughput => f.write_str("throughput too low"),
            Self::ProbeError(message) => write!(f, "probe error: {message}"),
        }
    }
}

/// Terminal result of validating one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(RejectionReason),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected(reason) => write!(f, "rejected ({reason})"),
        }
    }
}

/// A rejected candidate together with its reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub entry: PlaylistEntry,
    pub reason: RejectionReason,
}

/// Accepted and rejected candidates in validation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputArtifacts {
    pub filtered: Vec<PlaylistEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl OutputArtifacts {
    pub fn record(&mut self, entry: PlaylistEntry, outcome: ValidationOutcome) {
        match outcome {
            ValidationOutcome::Accepted => self.filtered.push(entry),
            ValidationOutcome::Rejected(reason) => self.skipped.push(SkippedEntry { entry, reason }),
        }
    }
}
