use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult, SourceResult};
use crate::utils::UrlUtils;

pub mod ingest_m3u;
pub mod m3u_parser;

pub use ingest_m3u::M3uIngestor;
pub use m3u_parser::{M3uParser, ParsedPlaylist};

/// Where a playlist document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(String),
    Local(PathBuf),
}

impl SourceLocation {
    pub fn parse(line: &str) -> Self {
        if UrlUtils::is_http_url(line) {
            Self::Remote(line.to_string())
        } else {
            Self::Local(PathBuf::from(line))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse a source list body: one location per line, blanks and `#` comments ignored
pub fn parse_source_list(content: &str) -> Vec<SourceLocation> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(SourceLocation::parse)
        .collect()
}

/// Read and parse the source list file
pub async fn load_source_list(path: &Path) -> AppResult<Vec<SourceLocation>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::input_file(path, e))?;
    Ok(parse_source_list(&content))
}

#[async_trait]
pub trait SourceIngestor: Send + Sync {
    /// Fetch one playlist document and parse it into entries
    async fn ingest(&self, source: &SourceLocation) -> SourceResult<ParsedPlaylist>;
}
