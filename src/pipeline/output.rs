//! Rendering and persisting the accepted playlist and the rejection report

use std::path::Path;
use tracing::info;

use crate::config::PathsConfig;
use crate::errors::{AppError, AppResult};
use crate::ingestor::m3u_parser::M3U_HEADER;
use crate::models::{OutputArtifacts, PlaylistEntry, SkippedEntry};

pub const NO_FILTERED_PLACEHOLDER: &str = "# no streams met the filter criteria";
pub const NO_SKIPPED_PLACEHOLDER: &str = "# no streams were rejected";

/// `#EXTM3U` header followed by one `label\nurl` record per accepted entry
pub fn render_filtered(entries: &[PlaylistEntry]) -> String {
    let body = if entries.is_empty() {
        NO_FILTERED_PLACEHOLDER.to_string()
    } else {
        entries
            .iter()
            .map(|e| format!("{}\n{}", e.label, e.url))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("{M3U_HEADER}\n{body}\n")
}

/// One `label\nurl\n# reason: ...` record per rejection, blank-line separated
pub fn render_skipped(skipped: &[SkippedEntry]) -> String {
    if skipped.is_empty() {
        return format!("{NO_SKIPPED_PLACEHOLDER}\n");
    }
    skipped
        .iter()
        .map(|s| format!("{}\n{}\n# reason: {}\n", s.entry.label, s.entry.url, s.reason))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn write_file(path: &Path, contents: String) -> AppResult<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| AppError::output_file(path, e))
}

/// Overwrite both artifacts, creating the output directory if needed
pub async fn write_artifacts(artifacts: &OutputArtifacts, paths: &PathsConfig) -> AppResult<()> {
    tokio::fs::create_dir_all(&paths.output_dir)
        .await
        .map_err(|e| AppError::output_file(&paths.output_dir, e))?;

    let filtered_path = paths.filtered_path();
    let skipped_path = paths.skipped_path();
    write_file(&filtered_path, render_filtered(&artifacts.filtered)).await?;
    write_file(&skipped_path, render_skipped(&artifacts.skipped)).await?;

    info!(
        "Wrote {} and {}",
        filtered_path.display(),
        skipped_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RejectionReason;

    fn sports() -> PlaylistEntry {
        PlaylistEntry::new("#EXTINF:-1,Sports HD", "http://example.com/a.ts")
    }

    #[test]
    fn test_render_filtered() {
        let news = PlaylistEntry::new("#EXTINF:-1,News", "http://example.com/n.ts");
        assert_eq!(
            render_filtered(&[sports(), news]),
            "#EXTM3U\n#EXTINF:-1,Sports HD\nhttp://example.com/a.ts\n#EXTINF:-1,News\nhttp://example.com/n.ts\n"
        );
    }

    #[test]
    fn test_render_filtered_placeholder() {
        assert_eq!(
            render_filtered(&[]),
            "#EXTM3U\n# no streams met the filter criteria\n"
        );
    }

    #[test]
    fn test_render_skipped_records_are_blank_separated() {
        let skipped = vec![
            SkippedEntry {
                entry: sports(),
                reason: RejectionReason::LowResolution {
                    width: 640,
                    height: 480,
                },
            },
            SkippedEntry {
                entry: PlaylistEntry::new("#EXTINF:-1,News", "http://example.com/n.ts"),
                reason: RejectionReason::LowThroughput,
            },
        ];

        assert_eq!(
            render_skipped(&skipped),
            "#EXTINF:-1,Sports HD\nhttp://example.com/a.ts\n# reason: resolution too low: 640x480\n\
\n#EXTINF:-1,News\nhttp://example.com/n.ts\n# reason: throughput too low\n"
        );
    }

    #[test]
    fn test_render_skipped_placeholder() {
        assert_eq!(render_skipped(&[]), "# no streams were rejected\n");
    }

    #[tokio::test]
    async fn test_write_artifacts_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathsConfig {
            output_dir: dir.path().join("out"),
            ..PathsConfig::default()
        };

        let mut artifacts = OutputArtifacts::default();
        artifacts.filtered.push(sports());
        write_artifacts(&artifacts, &paths).await.unwrap();
        write_artifacts(&OutputArtifacts::default(), &paths).await.unwrap();

        let filtered = std::fs::read_to_string(paths.filtered_path()).unwrap();
        assert_eq!(filtered, "#EXTM3U\n# no streams met the filter criteria\n");
        let skipped = std::fs::read_to_string(paths.skipped_path()).unwrap();
        assert_eq!(skipped, "# no streams were rejected\n");
    }
}
