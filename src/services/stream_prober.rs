//! Stream Probing Service
//!
//! Asks ffprobe for the width and height of the first video stream of a
//! candidate URL.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{ProbeError, ProbeResult};
use crate::models::Resolution;

/// Source of stream resolution information
#[async_trait]
pub trait ResolutionProbe: Send + Sync {
    /// `Ok(None)` when the inspector produced no output for the stream
    async fn probe_resolution(&self, url: &str) -> ProbeResult<Option<Resolution>>;
}

/// ffprobe-backed resolution probe
pub struct StreamProber {
    ffprobe_command: String,
    probe_timeout: Duration,
}

impl StreamProber {
    pub fn new(ffprobe_command: Option<String>, probe_timeout: Duration) -> Self {
        Self {
            ffprobe_command: ffprobe_command.unwrap_or_else(|| "ffprobe".to_string()),
            probe_timeout,
        }
    }

    fn build_command(&self, input_url: &str) -> Command {
        let mut cmd = Command::new(&self.ffprobe_command);
        cmd.args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries", "stream=width,height",
            "-of", "csv=p=0",
            input_url,
        ]);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // The child must not outlive a timed-out probe
        cmd.kill_on_drop(true);
        cmd
    }
}

/// Parse `width,height` from ffprobe's csv output
pub(crate) fn parse_resolution(output: &str) -> ProbeResult<Option<Resolution>> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let first_line = trimmed.lines().next().unwrap_or(trimmed);
    let values: Vec<&str> = first_line
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();

    match values.as_slice() {
        [width, height] => match (width.parse(), height.parse()) {
            (Ok(width), Ok(height)) => Ok(Some(Resolution { width, height })),
            _ => Err(ProbeError::malformed(trimmed)),
        },
        _ => Err(ProbeError::malformed(trimmed)),
    }
}

#[async_trait]
impl ResolutionProbe for StreamProber {
    async fn probe_resolution(&self, url: &str) -> ProbeResult<Option<Resolution>> {
        debug!("Probing resolution of {}", url);

        let output = tokio::time::timeout(self.probe_timeout, self.build_command(url).output())
            .await
            .map_err(|_| ProbeError::timeout("ffprobe", self.probe_timeout))?
            .map_err(|e| ProbeError::Spawn {
                command: self.ffprobe_command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            debug!(
                "ffprobe exited with {:?} for {}: {}",
                output.status.code(),
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let resolution = parse_resolution(&stdout)?;
        debug!("Probed {}: {:?}", url, resolution);
        Ok(resolution)
    }
}
