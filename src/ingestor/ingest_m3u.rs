use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::m3u_parser::{M3uParser, ParsedPlaylist};
use super::{SourceIngestor, SourceLocation};
use crate::errors::{SourceError, SourceResult};

/// Fetches playlist documents over HTTP (or from disk) and parses them
pub struct M3uIngestor {
    client: Client,
    timeout: Duration,
    parser: M3uParser,
}

impl M3uIngestor {
    pub fn new(client: Client, timeout: Duration, parser: M3uParser) -> Self {
        Self {
            client,
            timeout,
            parser,
        }
    }

    /// GET the document; `timeout` bounds the connect and every body read,
    /// not the whole transfer
    async fn fetch(&self, url: &str) -> SourceResult<String> {
        info!("Connecting to M3U source: {}", url);

        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| SourceError::timeout(url))?
            .map_err(|e| SourceError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        debug!(
            "Connected to M3U source '{}', content length: {:?} bytes",
            url,
            response.content_length()
        );

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        loop {
            match tokio::time::timeout(self.timeout, stream.next()).await {
                Err(_) => return Err(SourceError::timeout(url)),
                Ok(None) => break,
                Ok(Some(chunk)) => {
                    body.extend_from_slice(&chunk.map_err(|e| SourceError::from_reqwest(url, e))?)
                }
            }
        }

        debug!("Downloaded {} bytes from '{}'", body.len(), url);
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn read_local(&self, path: &std::path::Path) -> SourceResult<String> {
        info!("Reading M3U file: {}", path.display());
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl SourceIngestor for M3uIngestor {
    async fn ingest(&self, source: &SourceLocation) -> SourceResult<ParsedPlaylist> {
        let content = match source {
            SourceLocation::Remote(url) => self.fetch(url).await?,
            SourceLocation::Local(path) => self.read_local(path).await?,
        };

        let parsed = self.parser.parse(&content);
        info!(
            "Parsed {} entries from {} lines of '{}' ({} discarded)",
            parsed.entries.len(),
            parsed.total_lines,
            source,
            parsed.discarded
        );
        Ok(parsed)
    }
}
