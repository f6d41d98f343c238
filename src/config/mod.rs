use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use crate::errors::{AppError, AppResult};
use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub filter: FilterConfig,
    pub probe: ProbeConfig,
}

/// Input lists and output artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// One source location per line (URL or local playlist path)
    pub sources_file: PathBuf,
    /// One channel label per line
    pub keywords_file: PathBuf,
    pub output_dir: PathBuf,
    pub filtered_file_name: String,
    pub skipped_file_name: String,
}

/// Selection and validation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// When false only reachability is checked (no resolution probe, 1 KiB read)
    pub enable_strict_filter: bool,
    pub min_width: u32,
    pub min_height: u32,
    /// Bytes that must arrive in the strict-mode read
    pub min_throughput_bytes: usize,
    /// Bytes requested in the lenient-mode read
    pub lenient_chunk_bytes: usize,
    pub max_links_per_channel: usize,
    /// Upper bound on validated candidates across the whole run
    pub max_links_total: Option<usize>,
    /// When false every ingested entry is a candidate (flat mode)
    pub keyword_filter_enabled: bool,
    /// Keyword lines containing this term are ignored; empty disables the filter
    pub keyword_sentinel: String,
    /// Give bare URL lines a placeholder `#EXTINF` label
    pub synthesize_missing_labels: bool,
}

/// External probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub ffprobe_command: String,
    #[serde(with = "duration_serde::duration")]
    pub resolution_timeout: Duration,
    /// Per-read timeout of the throughput probe
    #[serde(with = "duration_serde::duration")]
    pub throughput_timeout: Duration,
    #[serde(with = "duration_serde::duration")]
    pub source_timeout: Duration,
    pub user_agent: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources_file: PathBuf::from(DEFAULT_SOURCES_FILE),
            keywords_file: PathBuf::from(DEFAULT_KEYWORDS_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            filtered_file_name: DEFAULT_FILTERED_FILE_NAME.to_string(),
            skipped_file_name: DEFAULT_SKIPPED_FILE_NAME.to_string(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enable_strict_filter: DEFAULT_ENABLE_STRICT_FILTER,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            min_throughput_bytes: DEFAULT_MIN_THROUGHPUT_BYTES,
            lenient_chunk_bytes: DEFAULT_LENIENT_CHUNK_BYTES,
            max_links_per_channel: DEFAULT_MAX_LINKS_PER_CHANNEL,
            max_links_total: None,
            keyword_filter_enabled: DEFAULT_KEYWORD_FILTER_ENABLED,
            keyword_sentinel: DEFAULT_KEYWORD_SENTINEL.to_string(),
            synthesize_missing_labels: DEFAULT_SYNTHESIZE_MISSING_LABELS,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_command: DEFAULT_FFPROBE_COMMAND.to_string(),
            resolution_timeout: Duration::from_secs(DEFAULT_RESOLUTION_TIMEOUT_SECONDS),
            throughput_timeout: Duration::from_secs(DEFAULT_THROUGHPUT_TIMEOUT_SECONDS),
            source_timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECONDS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PathsConfig {
    pub fn filtered_path(&self) -> PathBuf {
        self.output_dir.join(&self.filtered_file_name)
    }

    pub fn skipped_path(&self) -> PathBuf {
        self.output_dir.join(&self.skipped_file_name)
    }
}

impl FilterConfig {
    /// Read size and acceptance floor for the throughput probe in the configured mode
    pub fn throughput_requirement(&self) -> ThroughputRequirement {
        if self.enable_strict_filter {
            ThroughputRequirement {
                read_limit: self.min_throughput_bytes,
                min_bytes: self.min_throughput_bytes,
            }
        } else {
            ThroughputRequirement {
                read_limit: self.lenient_chunk_bytes,
                min_bytes: 1,
            }
        }
    }
}

/// How many bytes the throughput probe reads and how many must arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputRequirement {
    pub read_limit: usize,
    pub min_bytes: usize,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when the file is absent
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> AppResult<Self> {
        let config_file = config_file.as_ref();
        if config_file.exists() {
            let contents = std::fs::read_to_string(config_file)
                .map_err(|e| AppError::input_file(config_file, e))?;
            let config: Self = toml::from_str(&contents).map_err(|e| {
                AppError::configuration(format!("{}: {e}", config_file.display()))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            info!(
                "Config file {} not found, using built-in defaults",
                config_file.display()
            );
            Ok(Self::default())
        }
    }

    /// Effective configuration as TOML, in the same shape `load_from_file` reads
    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::configuration(format!("failed to render config: {e}")))
    }

    /// Reject settings that would make every candidate fail or loop forever
    pub fn validate(&self) -> AppResult<()> {
        if self.filter.max_links_per_channel == 0 {
            return Err(AppError::configuration(
                "filter.max_links_per_channel must be at least 1",
            ));
        }
        if self.filter.max_links_total == Some(0) {
            return Err(AppError::configuration(
                "filter.max_links_total must be at least 1 when set",
            ));
        }
        if self.filter.enable_strict_filter && self.filter.min_throughput_bytes == 0 {
            return Err(AppError::configuration(
                "filter.min_throughput_bytes must be at least 1",
            ));
        }
        if !self.filter.enable_strict_filter && self.filter.lenient_chunk_bytes == 0 {
            return Err(AppError::configuration(
                "filter.lenient_chunk_bytes must be at least 1",
            ));
        }
        if self.probe.ffprobe_command.trim().is_empty() {
            return Err(AppError::configuration("probe.ffprobe_command is empty"));
        }
        Ok(())
    }
}
