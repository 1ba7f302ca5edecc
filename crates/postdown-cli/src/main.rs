use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use log::{info, warn};
use postdown_cli::{logging, FetchSettings, HarvestSettings, Harvester, ReqwestFetcher};
use postdown_medium::config::IMAGE_CDN;

/// Convert Medium articles into blog posts with local images
#[derive(Debug, Parser)]
#[command(name = "postdown", version, about)]
struct Cli {
    /// Article URLs, processed in order
    #[arg(required = true)]
    sources: Vec<String>,

    /// Site root; documents go to <dir>/blog, images to <dir>/blog/images
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Pause before every request, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Base URL images are downloaded from
    #[arg(long, env = "POSTDOWN_IMAGE_CDN", default_value = IMAGE_CDN)]
    image_cdn: String,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose);

    let settings = HarvestSettings {
        output_dir: cli.output_dir,
        request_delay: Duration::from_millis(cli.delay_ms),
        fetch: FetchSettings::default(),
        image_cdn: cli.image_cdn,
    };
    let fetcher = ReqwestFetcher::new(settings.fetch.clone()).context("building http client")?;
    let harvester = Harvester::new(fetcher, settings);

    let reports = harvester.run(&cli.sources).await;

    let mut failed = 0;
    for report in &reports {
        match &report.outcome {
            Ok(summary) => {
                info!(
                    "{} -> {} ({} images, {} failed)",
                    report.source_url,
                    summary.document.display(),
                    summary.images.len(),
                    summary.failed_images()
                );
            }
            Err(err) => {
                failed += 1;
                warn!("{}: {err}", report.source_url);
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} sources failed", reports.len());
    }
    Ok(())
}
