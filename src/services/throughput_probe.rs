//! Fixed-size read probe
//!
//! Opens a streaming GET to the candidate and reads until `limit` bytes have
//! arrived or the body ends. This is a size check on the first read, not a
//! bytes-per-second measurement.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::{ProbeError, ProbeResult};

#[async_trait]
pub trait ThroughputProbe: Send + Sync {
    /// Number of bytes received, capped at `limit`
    async fn read_chunk(&self, url: &str, limit: usize) -> ProbeResult<usize>;
}

pub struct HttpThroughputProbe {
    client: Client,
    read_timeout: Duration,
}

impl HttpThroughputProbe {
    /// `read_timeout` bounds the connect and every individual body read
    pub fn new(client: Client, read_timeout: Duration) -> Self {
        Self {
            client,
            read_timeout,
        }
    }
}

#[async_trait]
impl ThroughputProbe for HttpThroughputProbe {
    async fn read_chunk(&self, url: &str, limit: usize) -> ProbeResult<usize> {
        let response = tokio::time::timeout(self.read_timeout, self.client.get(url).send())
            .await
            .map_err(|_| ProbeError::timeout("stream connect", self.read_timeout))??;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                status: status.as_u16(),
            });
        }

        let mut stream = response.bytes_stream();
        let mut received = 0usize;
        while received < limit {
            match tokio::time::timeout(self.read_timeout, stream.next()).await {
                Err(_) => return Err(ProbeError::timeout("stream read", self.read_timeout)),
                Ok(None) => break,
                Ok(Some(chunk)) => received += chunk?.len(),
            }
        }

        debug!("Read {} bytes (limit {}) from {}", received, limit, url);
        Ok(received.min(limit))
    }
}
