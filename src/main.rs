use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use promo_thumbnail::ThumbnailConfig;

/// Render the Ai Learning Language promotional thumbnail as PNG and JPEG.
///
/// With no arguments both files are written to the working directory.
#[derive(Parser, Debug)]
#[command(name = "promo-thumbnail", version, about)]
struct Cli {
    /// JSON file with a base `ThumbnailConfig`; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to write the output files to (created if missing)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// JPEG quality
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: Option<u8>,

    /// Write the PNG with fast compression instead of the smallest encoding
    #[arg(long)]
    no_optimize: bool,

    /// Warn when an output file is larger than this many megabytes
    #[arg(long, value_name = "MB")]
    size_limit_mb: Option<f64>,

    /// Print the generation report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ThumbnailConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => ThumbnailConfig::default(),
        };
        if let Some(dir) = self.out_dir {
            config.output_dir = dir;
        }
        if let Some(q) = self.jpeg_quality {
            config.jpeg_quality = q;
        }
        if self.no_optimize {
            config.optimize_png = false;
        }
        if let Some(mb) = self.size_limit_mb {
            anyhow::ensure!(mb > 0.0, "--size-limit-mb must be positive, got {}", mb);
            config.size_limit_bytes = (mb * 1024.0 * 1024.0) as u64;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json = cli.json;
    let config = cli.into_config()?;

    let report = promo_thumbnail::generate_with(&config).context("failed to generate thumbnail")?;
    log::debug!("Canvas SHA-256: {}", report.canvas_sha256);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report.lines() {
            println!("{}", line);
        }
    }
    Ok(())
}
