use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stream_curator::{config::Config, pipeline::run_pipeline};

#[derive(Parser)]
#[command(name = "stream-curator")]
#[command(version)]
#[command(about = "Curates M3U live stream playlists by keyword matching and stream quality probing")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Source list file (overrides config file)
    #[arg(short, long, value_name = "FILE")]
    sources: Option<PathBuf>,

    /// Keyword list file (overrides config file)
    #[arg(short, long, value_name = "FILE")]
    keywords: Option<PathBuf>,

    /// Output directory (overrides config file)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Only check that streams respond (skip resolution and throughput thresholds)
    #[arg(long)]
    lenient: bool,

    /// Validate every ingested entry instead of matching keywords
    #[arg(long)]
    no_keywords: bool,

    /// Stop after validating this many streams
    #[arg(long, value_name = "N")]
    max_total: Option<usize>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("stream_curator={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting stream-curator v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;

    // Override config with CLI arguments
    if let Some(sources) = cli.sources {
        config.paths.sources_file = sources;
    }
    if let Some(keywords) = cli.keywords {
        config.paths.keywords_file = keywords;
    }
    if let Some(output_dir) = cli.output_dir {
        config.paths.output_dir = output_dir;
    }
    if cli.lenient {
        config.filter.enable_strict_filter = false;
    }
    if cli.no_keywords {
        config.filter.keyword_filter_enabled = false;
    }
    if cli.max_total.is_some() {
        config.filter.max_links_total = cli.max_total;
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!(
        "Filter mode: {}, minimum {}x{}, {} per channel, global limit {:?}",
        if config.filter.enable_strict_filter { "strict" } else { "reachability only" },
        config.filter.min_width,
        config.filter.min_height,
        config.filter.max_links_per_channel,
        config.filter.max_links_total
    );

    run_pipeline(&config).await?;
    Ok(())
}
