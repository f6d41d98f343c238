/// Configuration default values
///
/// Defaults follow the strictest filtering profile: resolution and
/// throughput checks enabled, 720p minimum, 512 KiB read per candidate.
// Path defaults
pub const DEFAULT_SOURCES_FILE: &str = "sources.txt";
pub const DEFAULT_KEYWORDS_FILE: &str = "demo.txt";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_FILTERED_FILE_NAME: &str = "filtered.m3u";
pub const DEFAULT_SKIPPED_FILE_NAME: &str = "skipped.txt";

// Filter defaults
pub const DEFAULT_ENABLE_STRICT_FILTER: bool = true;
pub const DEFAULT_MIN_WIDTH: u32 = 1280;
pub const DEFAULT_MIN_HEIGHT: u32 = 720;
pub const DEFAULT_MIN_THROUGHPUT_BYTES: usize = 512 * 1024; // 512 KiB
pub const DEFAULT_LENIENT_CHUNK_BYTES: usize = 1024; // 1 KiB
pub const DEFAULT_MAX_LINKS_PER_CHANNEL: usize = 10;
pub const DEFAULT_KEYWORD_FILTER_ENABLED: bool = true;
pub const DEFAULT_KEYWORD_SENTINEL: &str = "genre";
pub const DEFAULT_SYNTHESIZE_MISSING_LABELS: bool = false;

// Probe defaults
pub const DEFAULT_FFPROBE_COMMAND: &str = "ffprobe";
pub const DEFAULT_RESOLUTION_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_THROUGHPUT_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_SOURCE_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("stream-curator/", env!("CARGO_PKG_VERSION"));
