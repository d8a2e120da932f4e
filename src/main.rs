use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locpack::capture::run_pack;
use locpack::codec;
use locpack::models::{PackConfig, QuantizeRectEntry, DEFAULT_TOOL_URL};
use sprite_finalize::SpriteFinalizer;

#[derive(Parser)]
#[command(name = "locpack")]
#[command(about = "Captures localized UI elements from the loc tool and packs game-ready asset archives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture all images and data files for a localization CSV and zip them
    Pack {
        /// Input Loc.csv file
        #[arg(long)]
        csv: PathBuf,

        /// URL of the loc tool page
        #[arg(long, default_value = DEFAULT_TOOL_URL)]
        url: String,

        /// Output directory for the staging tree and the zip
        #[arg(short, long)]
        out: PathBuf,

        /// Capture supersampling factor (screenshots at scale times target size)
        #[arg(long, default_value_t = 1)]
        scale: u32,

        /// Also export font data files
        #[arg(long)]
        make_fonts: bool,

        /// Seconds to wait for page resources before giving up
        #[arg(long, default_value_t = 60)]
        resource_timeout: u64,
    },
    /// Run the finalization pipeline on an already-captured PNG (no browser)
    Finalize {
        /// Input PNG; overwritten in place unless --output is given
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target sprite width
        #[arg(long)]
        width: u32,

        /// Target sprite height
        #[arg(long)]
        height: u32,

        /// Crop to content bounds before the other stages
        #[arg(long)]
        autocrop: bool,

        /// JSON file with quantize regions (rect + colors, hex or [r,g,b])
        #[arg(long)]
        regions: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "locpack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Pack {
            csv,
            url,
            out,
            scale,
            make_fonts,
            resource_timeout,
        } => run_pack_command(PackConfig {
            csv_path: csv,
            tool_url: url,
            output_dir: out,
            scale,
            make_fonts,
            resource_timeout: Duration::from_secs(resource_timeout),
        }),
        Commands::Finalize {
            input,
            output,
            width,
            height,
            autocrop,
            regions,
        } => run_finalize_command(input, output, width, height, autocrop, regions),
    }
}

fn run_pack_command(config: PackConfig) -> anyhow::Result<()> {
    if !config.csv_path.exists() {
        anyhow::bail!("CSV file not found: {}", config.csv_path.display());
    }
    if config.scale == 0 {
        anyhow::bail!("--scale must be a positive integer");
    }

    let summary = run_pack(&config)?;
    tracing::info!(
        lang = %summary.lang,
        images = summary.images,
        failed = summary.failed_images,
        data_files = summary.data_files,
        archive = %summary.archive.display(),
        "Pack finished"
    );

    if summary.failed_images > 0 {
        anyhow::bail!("{} image(s) failed to capture", summary.failed_images);
    }
    Ok(())
}

fn run_finalize_command(
    input: PathBuf,
    output: Option<PathBuf>,
    width: u32,
    height: u32,
    autocrop: bool,
    regions: Option<PathBuf>,
) -> anyhow::Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("--width and --height must be positive");
    }

    let mut finalizer = SpriteFinalizer::new(width, height).autocrop(autocrop);

    if let Some(regions_path) = regions {
        let text = std::fs::read_to_string(&regions_path)?;
        let entries: Vec<QuantizeRectEntry> = serde_json::from_str(&text)?;
        for entry in entries {
            let palette = entry.palette()?;
            finalizer = finalizer.quantize_region(entry.rect.into(), palette);
        }
    }

    let capture = codec::read_png(&input)?;
    tracing::info!(
        input = %input.display(),
        capture_width = capture.width(),
        capture_height = capture.height(),
        "Finalizing"
    );

    let sprite = finalizer.finalize(capture)?;

    let target = output.unwrap_or(input);
    codec::write_png(&target, &sprite)?;
    tracing::info!(output = %target.display(), "Wrote sprite");
    Ok(())
}
