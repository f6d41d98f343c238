//! Pipeline orchestration
//!
//! Sources are ingested one at a time and selected incrementally into a
//! single candidate set. Candidates are then validated one at a time, bucket
//! by bucket, under the per-channel and global caps. Everything runs
//! sequentially: at most one outbound connection and one ffprobe child exist
//! at any moment.

use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::output::write_artifacts;
use super::selector::CandidateSelector;
use crate::config::{Config, FilterConfig};
use crate::errors::{AppError, AppResult};
use crate::ingestor::{
    M3uIngestor, M3uParser, SourceIngestor, SourceLocation, load_source_list,
};
use crate::models::{CandidateSet, OutputArtifacts};
use crate::services::{
    HttpThroughputProbe, StreamProber, StreamValidator, ValidationSettings,
};
use crate::utils::KeywordList;

/// Counters collected while ingesting sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionStats {
    pub sources_fetched: usize,
    pub sources_failed: usize,
    /// Sources not fetched because the global cap was already covered
    pub sources_skipped: usize,
    pub entries_parsed: usize,
}

/// End-of-run summary
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub ingestion: IngestionStats,
    pub candidates: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Raw keyword label -> number of matching entries seen (including capped ones)
    pub keyword_tally: Vec<(String, usize)>,
    pub global_cap_reached: bool,
}

impl RunSummary {
    pub fn log(&self) {
        if !self.keyword_tally.is_empty() {
            info!("Channel match tally:");
            for (label, count) in &self.keyword_tally {
                info!("  - {}: {} matching streams", label, count);
            }
        }
        info!(
            "Sources: {} fetched, {} failed, {} skipped; {} entries parsed, {} candidates",
            self.ingestion.sources_fetched,
            self.ingestion.sources_failed,
            self.ingestion.sources_skipped,
            self.ingestion.entries_parsed,
            self.candidates
        );
        if self.global_cap_reached {
            info!("Validation stopped early at the global link limit");
        }
        info!("Accepted streams written: {}", self.accepted);
        info!("Rejected streams written: {}", self.rejected);
        info!(
            "Run started {} finished in {}",
            self.started_at.to_rfc3339(),
            humantime::format_duration(Duration::from_secs(self.elapsed.as_secs()))
        );
    }
}

/// Artifacts plus summary of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub artifacts: OutputArtifacts,
    pub summary: RunSummary,
}

pub struct PipelineOrchestrator {
    ingestor: Box<dyn SourceIngestor>,
    selector: CandidateSelector,
    validator: StreamValidator,
    max_links_total: Option<usize>,
}

impl PipelineOrchestrator {
    pub fn new(
        ingestor: Box<dyn SourceIngestor>,
        selector: CandidateSelector,
        validator: StreamValidator,
        max_links_total: Option<usize>,
    ) -> Self {
        Self {
            ingestor,
            selector,
            validator,
            max_links_total,
        }
    }

    /// Wire up the HTTP ingestor, ffprobe and HTTP probes from configuration
    pub fn from_config(config: &Config, keywords: Option<KeywordList>) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.probe.user_agent.clone())
            .connect_timeout(config.probe.throughput_timeout)
            .build()?;

        let ingestor = M3uIngestor::new(
            client.clone(),
            config.probe.source_timeout,
            M3uParser::new(config.filter.synthesize_missing_labels),
        );
        let validator = StreamValidator::new(
            Box::new(StreamProber::new(
                Some(config.probe.ffprobe_command.clone()),
                config.probe.resolution_timeout,
            )),
            Box::new(HttpThroughputProbe::new(client, config.probe.throughput_timeout)),
            ValidationSettings::from(&config.filter),
        );

        Ok(Self::new(
            Box::new(ingestor),
            selector_for(&config.filter, keywords),
            validator,
            config.filter.max_links_total,
        ))
    }

    fn global_cap_covered(&self, count: usize) -> bool {
        self.max_links_total.is_some_and(|total| count >= total)
    }

    /// Ingest each source in order and select its entries into one candidate set
    pub async fn collect_candidates(&self, sources: &[SourceLocation]) -> (CandidateSet, IngestionStats) {
        let mut set = CandidateSet::new();
        let mut stats = IngestionStats::default();

        for (position, source) in sources.iter().enumerate() {
            if self.global_cap_covered(set.len()) {
                stats.sources_skipped = sources.len() - position;
                info!(
                    "Candidate set already holds {} streams, skipping {} remaining sources",
                    set.len(),
                    stats.sources_skipped
                );
                break;
            }

            info!("Fetching source: {}", source);
            match self.ingestor.ingest(source).await {
                Ok(parsed) => {
                    stats.sources_fetched += 1;
                    stats.entries_parsed += parsed.entries.len();
                    let selection = self.selector.extend(&mut set, parsed.entries);
                    info!(
                        "Source '{}': {} candidates added, {} over channel cap, {} unmatched",
                        source, selection.added, selection.cap_reached, selection.no_match
                    );
                }
                Err(e) => {
                    stats.sources_failed += 1;
                    warn!("Source fetch failed, skipping '{}': {}", source, e);
                }
            }
        }

        (set, stats)
    }

    /// Validate candidates in order, partitioning them into accepted and rejected
    ///
    /// Returns whether the global cap cut validation short.
    pub async fn validate_candidates(&self, set: &CandidateSet) -> (OutputArtifacts, bool) {
        let mut artifacts = OutputArtifacts::default();
        let mut validated = 0usize;

        for bucket in set.buckets() {
            info!(
                "Testing channel '{}' ({} candidates)",
                bucket.display,
                bucket.entries.len()
            );
            let mut accepted_in_bucket = 0usize;

            for entry in &bucket.entries {
                if self.global_cap_covered(validated) {
                    info!("Reached global limit of {} validated streams", validated);
                    return (artifacts, true);
                }

                let outcome = self.validator.validate(&entry.url).await;
                info!("  -> {} [{}]: {}", entry.url, entry.label, outcome);
                validated += 1;

                if outcome.is_accepted() {
                    accepted_in_bucket += 1;
                }
                artifacts.record(entry.clone(), outcome);

                if self
                    .selector
                    .cap()
                    .is_some_and(|cap| accepted_in_bucket >= cap)
                {
                    break;
                }
            }
        }

        (artifacts, false)
    }

    /// Per raw keyword label, how many entries matched its token
    fn keyword_tally(&self, set: &CandidateSet) -> Vec<(String, usize)> {
        self.selector
            .keywords()
            .map(|keywords| {
                keywords
                    .raw_labels()
                    .iter()
                    .map(|(label, keyword)| {
                        let matched = set.get(keyword).map_or(0, |bucket| bucket.matched);
                        (label.clone(), matched)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ingest, select and validate; does not touch the filesystem
    pub async fn run(&self, sources: &[SourceLocation]) -> RunReport {
        let started_at = Utc::now();
        let clock = Instant::now();

        let (set, ingestion) = self.collect_candidates(sources).await;
        let (artifacts, global_cap_reached) = self.validate_candidates(&set).await;

        let summary = RunSummary {
            started_at,
            elapsed: clock.elapsed(),
            ingestion,
            candidates: set.len(),
            accepted: artifacts.filtered.len(),
            rejected: artifacts.skipped.len(),
            keyword_tally: self.keyword_tally(&set),
            global_cap_reached,
        };

        RunReport { artifacts, summary }
    }
}

fn selector_for(filter: &FilterConfig, keywords: Option<KeywordList>) -> CandidateSelector {
    match keywords {
        Some(keywords) if filter.keyword_filter_enabled => {
            CandidateSelector::by_keywords(keywords, filter.max_links_per_channel)
        }
        _ => CandidateSelector::passthrough(),
    }
}

/// Read the keyword file when keyword filtering is enabled
pub async fn load_keywords(config: &Config) -> AppResult<Option<KeywordList>> {
    if !config.filter.keyword_filter_enabled {
        return Ok(None);
    }

    let path = &config.paths.keywords_file;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::input_file(path, e))?;
    let keywords = KeywordList::parse(&content, &config.filter.keyword_sentinel);
    if keywords.is_empty() {
        warn!(
            "Keyword file {} has no usable keywords; no stream will be selected",
            path.display()
        );
    } else {
        info!("Loaded {} keywords from {}", keywords.len(), path.display());
    }
    Ok(Some(keywords))
}

/// Full run: load inputs, run the pipeline, write both artifacts, log the summary
///
/// Input files are read before anything else, so a missing file aborts the
/// run without touching previous output.
pub async fn run_pipeline(config: &Config) -> AppResult<RunReport> {
    config.validate()?;

    let sources = load_source_list(&config.paths.sources_file).await?;
    info!(
        "Loaded {} sources from {}",
        sources.len(),
        config.paths.sources_file.display()
    );
    let keywords = load_keywords(config).await?;

    let orchestrator = PipelineOrchestrator::from_config(config, keywords)?;
    let report = orchestrator.run(&sources).await;

    write_artifacts(&report.artifacts, &config.paths).await?;
    report.summary.log();
    Ok(report)
}
