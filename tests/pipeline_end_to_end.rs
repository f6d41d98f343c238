use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stream_curator::config::{Config, FilterConfig, PathsConfig};
use stream_curator::errors::{AppError, ProbeResult};
use stream_curator::ingestor::{M3uIngestor, M3uParser, SourceLocation};
use stream_curator::models::{RejectionReason, Resolution};
use stream_curator::pipeline::output::write_artifacts;
use stream_curator::pipeline::{CandidateSelector, PipelineOrchestrator, run_pipeline};
use stream_curator::services::{
    HttpThroughputProbe, ResolutionProbe, StreamValidator, ValidationSettings,
};
use stream_curator::utils::KeywordList;

const STRICT_CHUNK: usize = 512 * 1024;

/// Stands in for ffprobe: reports the same resolution for every URL
struct FixedResolution(Resolution);

#[async_trait]
impl ResolutionProbe for FixedResolution {
    async fn probe_resolution(&self, _url: &str) -> ProbeResult<Option<Resolution>> {
        Ok(Some(self.0))
    }
}

async fn mount_playlist(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_stream(server: &MockServer, route: &str, bytes: usize) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x47u8; bytes]))
        .mount(server)
        .await;
}

fn strict_orchestrator(keywords: &[&str], resolution: Resolution) -> PipelineOrchestrator {
    let filter = FilterConfig::default();
    let ingestor = M3uIngestor::new(Client::new(), Duration::from_secs(5), M3uParser::default());
    let validator = StreamValidator::new(
        Box::new(FixedResolution(resolution)),
        Box::new(HttpThroughputProbe::new(Client::new(), Duration::from_secs(5))),
        ValidationSettings::from(&filter),
    );
    PipelineOrchestrator::new(
        Box::new(ingestor),
        CandidateSelector::by_keywords(
            KeywordList::from_labels(keywords.iter().copied()),
            filter.max_links_per_channel,
        ),
        validator,
        None,
    )
}

fn paths_in(dir: &std::path::Path) -> PathsConfig {
    PathsConfig {
        sources_file: dir.join("sources.txt"),
        keywords_file: dir.join("demo.txt"),
        output_dir: dir.join("output"),
        ..PathsConfig::default()
    }
}

#[tokio::test]
async fn test_accepted_entry_written_verbatim() {
    let server = MockServer::start().await;
    let stream_url = format!("{}/a.ts", server.uri());
    mount_playlist(
        &server,
        "/list.m3u",
        format!("#EXTM3U\n#EXTINF:-1,Sports HD\n{stream_url}\n"),
    )
    .await;
    mount_stream(&server, "/a.ts", STRICT_CHUNK).await;

    let orchestrator = strict_orchestrator(&["sports"], Resolution { width: 1920, height: 1080 });
    let sources = vec![SourceLocation::Remote(format!("{}/list.m3u", server.uri()))];
    let report = orchestrator.run(&sources).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = paths_in(dir.path());
    write_artifacts(&report.artifacts, &paths).await.unwrap();

    let filtered = std::fs::read_to_string(paths.filtered_path()).unwrap();
    assert_eq!(filtered, format!("#EXTM3U\n#EXTINF:-1,Sports HD\n{stream_url}\n"));
    let skipped = std::fs::read_to_string(paths.skipped_path()).unwrap();
    assert_eq!(skipped, "# no streams were rejected\n");
    assert_eq!(report.summary.accepted, 1);
    assert_eq!(report.summary.rejected, 0);
}

#[tokio::test]
async fn test_low_resolution_entry_lands_in_skipped_report() {
    let server = MockServer::start().await;
    let stream_url = format!("{}/a.ts", server.uri());
    mount_playlist(
        &server,
        "/list.m3u",
        format!("#EXTM3U\n#EXTINF:-1,Sports HD\n{stream_url}\n"),
    )
    .await;
    mount_stream(&server, "/a.ts", STRICT_CHUNK).await;

    let orchestrator = strict_orchestrator(&["sports"], Resolution { width: 640, height: 480 });
    let sources = vec![SourceLocation::Remote(format!("{}/list.m3u", server.uri()))];
    let report = orchestrator.run(&sources).await;

    assert_eq!(
        report.artifacts.skipped[0].reason,
        RejectionReason::LowResolution { width: 640, height: 480 }
    );

    let dir = tempfile::tempdir().unwrap();
    let paths = paths_in(dir.path());
    write_artifacts(&report.artifacts, &paths).await.unwrap();

    let skipped = std::fs::read_to_string(paths.skipped_path()).unwrap();
    assert_eq!(
        skipped,
        format!("#EXTINF:-1,Sports HD\n{stream_url}\n# reason: resolution too low: 640x480\n")
    );
    let filtered = std::fs::read_to_string(paths.filtered_path()).unwrap();
    assert_eq!(filtered, "#EXTM3U\n# no streams met the filter criteria\n");
}

#[tokio::test]
async fn test_short_stream_is_low_throughput() {
    let server = MockServer::start().await;
    let stream_url = format!("{}/slow.ts", server.uri());
    mount_playlist(
        &server,
        "/list.m3u",
        format!("#EXTINF:-1,Sports HD\n{stream_url}\n"),
    )
    .await;
    mount_stream(&server, "/slow.ts", 1024).await;

    let orchestrator = strict_orchestrator(&["sports"], Resolution { width: 1920, height: 1080 });
    let sources = vec![SourceLocation::Remote(format!("{}/list.m3u", server.uri()))];
    let report = orchestrator.run(&sources).await;

    assert_eq!(report.artifacts.skipped[0].reason, RejectionReason::LowThroughput);
}

#[tokio::test]
async fn test_ipv6_entry_never_reaches_outputs() {
    let server = MockServer::start().await;
    mount_playlist(
        &server,
        "/list.m3u",
        "#EXTM3U\n#EXTINF:-1,Sports HD\nhttp://[2001:db8::1]:8080/a.ts\n".to_string(),
    )
    .await;

    let orchestrator = strict_orchestrator(&["sports"], Resolution { width: 1920, height: 1080 });
    let sources = vec![SourceLocation::Remote(format!("{}/list.m3u", server.uri()))];
    let report = orchestrator.run(&sources).await;

    assert_eq!(report.summary.candidates, 0);
    assert!(report.artifacts.filtered.is_empty());
    assert!(report.artifacts.skipped.is_empty());
}

#[tokio::test]
async fn test_equivalent_keywords_share_cap() {
    let server = MockServer::start().await;
    let mut playlist = String::from("#EXTM3U\n");
    for i in 0..15 {
        let route = format!("/s{i}.ts");
        mount_stream(&server, &route, STRICT_CHUNK).await;
        playlist.push_str(&format!("#EXTINF:-1,Sports {i}\n{}{route}\n", server.uri()));
    }
    mount_playlist(&server, "/list.m3u", playlist).await;

    let orchestrator =
        strict_orchestrator(&["Sports", "sports!"], Resolution { width: 1920, height: 1080 });
    let sources = vec![SourceLocation::Remote(format!("{}/list.m3u", server.uri()))];
    let report = orchestrator.run(&sources).await;

    assert_eq!(report.summary.candidates, 10);
    assert_eq!(report.artifacts.filtered.len(), 10);
    assert_eq!(
        report.summary.keyword_tally,
        vec![("Sports".to_string(), 15), ("sports!".to_string(), 15)]
    );
}

#[tokio::test]
async fn test_lenient_run_writes_artifacts() {
    let server = MockServer::start().await;
    let up = format!("{}/up.ts", server.uri());
    let down = format!("{}/down.ts", server.uri());
    mount_playlist(
        &server,
        "/list.m3u",
        format!("#EXTM3U\n#EXTINF:-1,News\n{up}\n#EXTINF:-1,Movies\n{down}\n"),
    )
    .await;
    mount_stream(&server, "/up.ts", 10).await;
    Mock::given(method("GET"))
        .and(path("/down.ts"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.paths = paths_in(dir.path());
    config.filter.enable_strict_filter = false;
    config.filter.keyword_filter_enabled = false;
    std::fs::write(
        &config.paths.sources_file,
        format!("# upstream\n{}/list.m3u\n", server.uri()),
    )
    .unwrap();

    let report = run_pipeline(&config).await.unwrap();
    assert_eq!(report.summary.accepted, 1);
    assert_eq!(report.summary.rejected, 1);

    let filtered = std::fs::read_to_string(config.paths.filtered_path()).unwrap();
    assert_eq!(filtered, format!("#EXTM3U\n#EXTINF:-1,News\n{up}\n"));
    let skipped = std::fs::read_to_string(config.paths.skipped_path()).unwrap();
    assert_eq!(
        skipped,
        format!("#EXTINF:-1,Movies\n{down}\n# reason: probe error: HTTP status 404\n")
    );
}

#[tokio::test]
async fn test_missing_keyword_file_aborts_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.paths = paths_in(dir.path());
    std::fs::write(&config.paths.sources_file, "http://127.0.0.1:9/list.m3u\n").unwrap();

    let err = run_pipeline(&config).await.unwrap_err();

    assert!(matches!(err, AppError::InputFile { .. }));
    assert!(!config.paths.output_dir.exists());
}

#[tokio::test]
async fn test_reruns_produce_identical_artifacts() {
    let server = MockServer::start().await;
    let up = format!("{}/up.ts", server.uri());
    mount_playlist(
        &server,
        "/list.m3u",
        format!("#EXTINF:-1,News\n{up}\n#EXTINF:-1,Sports\nhttp://[::1]/x.ts\n"),
    )
    .await;
    mount_stream(&server, "/up.ts", 2048).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.paths = paths_in(dir.path());
    config.filter.enable_strict_filter = false;
    std::fs::write(&config.paths.sources_file, format!("{}/list.m3u\n", server.uri())).unwrap();
    std::fs::write(&config.paths.keywords_file, "News\nSports\n#genre#\n").unwrap();

    run_pipeline(&config).await.unwrap();
    let first = std::fs::read_to_string(config.paths.filtered_path()).unwrap();
    run_pipeline(&config).await.unwrap();
    let second = std::fs::read_to_string(config.paths.filtered_path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, format!("#EXTM3U\n#EXTINF:-1,News\n{up}\n"));
}
