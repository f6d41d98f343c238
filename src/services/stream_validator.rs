//! Candidate validation
//!
//! Strict mode runs the resolution probe first and only reads from the
//! stream when the resolution clears the threshold. Lenient mode skips the
//! resolution probe and accepts any stream that returns at least one byte.
//! Every probe failure becomes a `ProbeError` rejection; nothing is retried.

use tracing::debug;

use super::stream_prober::ResolutionProbe;
use super::throughput_probe::ThroughputProbe;
use crate::config::{FilterConfig, ThroughputRequirement};
use crate::errors::ProbeResult;
use crate::models::{RejectionReason, ValidationOutcome};

/// Thresholds applied to every candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSettings {
    pub strict: bool,
    pub min_width: u32,
    pub min_height: u32,
    pub throughput: ThroughputRequirement,
}

impl From<&FilterConfig> for ValidationSettings {
    fn from(filter: &FilterConfig) -> Self {
        Self {
            strict: filter.enable_strict_filter,
            min_width: filter.min_width,
            min_height: filter.min_height,
            throughput: filter.throughput_requirement(),
        }
    }
}

pub struct StreamValidator {
    resolution_probe: Box<dyn ResolutionProbe>,
    throughput_probe: Box<dyn ThroughputProbe>,
    settings: ValidationSettings,
}

impl StreamValidator {
    pub fn new(
        resolution_probe: Box<dyn ResolutionProbe>,
        throughput_probe: Box<dyn ThroughputProbe>,
        settings: ValidationSettings,
    ) -> Self {
        Self {
            resolution_probe,
            throughput_probe,
            settings,
        }
    }

    /// Probe one candidate URL
    pub async fn validate(&self, url: &str) -> ValidationOutcome {
        match self.run_checks(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("Probe failed for {}: {}", url, e);
                ValidationOutcome::Rejected(RejectionReason::ProbeError(e.to_string()))
            }
        }
    }

    async fn run_checks(&self, url: &str) -> ProbeResult<ValidationOutcome> {
        if self.settings.strict {
            match self.resolution_probe.probe_resolution(url).await? {
                None => {
                    return Ok(ValidationOutcome::Rejected(
                        RejectionReason::UnknownResolution,
                    ));
                }
                Some(resolution)
                    if resolution.width < self.settings.min_width
                        || resolution.height < self.settings.min_height =>
                {
                    return Ok(ValidationOutcome::Rejected(RejectionReason::LowResolution {
                        width: resolution.width,
                        height: resolution.height,
                    }));
                }
                Some(resolution) => debug!("Resolution {} accepted for {}", resolution, url),
            }
        }

        let requirement = self.settings.throughput;
        let received = self
            .throughput_probe
            .read_chunk(url, requirement.read_limit)
            .await?;

        if received < requirement.min_bytes {
            Ok(ValidationOutcome::Rejected(RejectionReason::LowThroughput))
        } else {
            Ok(ValidationOutcome::Accepted)
        }
    }
}
