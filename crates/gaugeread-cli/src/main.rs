//! gaugeread CLI: read analog gauges from images.

use ab_glyph::FontVec;
use clap::{Args, Parser, Subcommand};
use gaugeread::{AngleRange, GaugeReader, GaugeReading, GuideConfig, ReadConfig, ValueRange};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "gaugeread")]
#[command(about = "Read the value shown by an analog dial gauge in a still image")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read one or more gauge images.
    Read(CliReadArgs),

    /// Write a copy of an image with angle guides around the dial.
    Guides(CliGuidesArgs),

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliReadArgs {
    /// Input images, processed in order.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Value at the start of the scale (overrides the config file).
    #[arg(long, allow_hyphen_values = true)]
    min_value: Option<f64>,

    /// Value at the end of the scale (overrides the config file).
    #[arg(long, allow_hyphen_values = true)]
    max_value: Option<f64>,

    /// Unit printed after each value.
    #[arg(long, default_value = "℃")]
    unit: String,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Manual scale start angle in degrees (requires --max-angle).
    #[arg(long, requires = "max_angle")]
    min_angle: Option<f64>,

    /// Manual scale end angle in degrees (requires --min-angle).
    #[arg(long, requires = "min_angle")]
    max_angle: Option<f64>,

    /// Seed of the probabilistic line detector.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to write all readings (JSON).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliGuidesArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path of the annotated output image.
    #[arg(long)]
    out: PathBuf,

    /// TrueType font for the angle labels. Without it only ticks are drawn.
    #[arg(long)]
    font: Option<PathBuf>,

    /// JSON configuration file (dial search settings).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> CliResult<ReadConfig> {
    match path {
        Some(p) => {
            tracing::info!("Loading config: {}", p.display());
            ReadConfig::from_json_file(p)
        }
        None => Ok(ReadConfig::default()),
    }
}

fn build_read_config(args: &CliReadArgs) -> CliResult<ReadConfig> {
    let mut config = load_config(args.config.as_deref())?;
    let vr = config.value_range;
    config.value_range = ValueRange::new(
        args.min_value.unwrap_or(vr.min_value),
        args.max_value.unwrap_or(vr.max_value),
    );
    if let (Some(min), Some(max)) = (args.min_angle, args.max_angle) {
        config.angle_range = Some(AngleRange::new(min, max)?);
    }
    if let Some(seed) = args.seed {
        config.line_seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Read(args) => run_read(&args),
        Commands::Guides(args) => run_guides(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

// ── read ───────────────────────────────────────────────────────────────

#[derive(serde::Serialize)]
struct ImageReport {
    image: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    reading: Option<GaugeReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn run_read(args: &CliReadArgs) -> CliResult<()> {
    let reader = GaugeReader::with_config(build_read_config(args)?);
    let mut reports = Vec::with_capacity(args.images.len());
    let mut failed = 0usize;

    for path in &args.images {
        tracing::info!("Reading image: {}", path.display());
        match reader.read_path(path) {
            Ok(reading) => {
                println!("{} {}", reading.value, args.unit);
                reports.push(ImageReport {
                    image: path.clone(),
                    reading: Some(reading),
                    error: None,
                });
            }
            Err(e) => {
                println!("{}: {}", path.display(), e);
                failed += 1;
                reports.push(ImageReport {
                    image: path.clone(),
                    reading: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(out, json)?;
        tracing::info!("Results written to {}", out.display());
    }

    if failed > 0 {
        return Err(format!("{} of {} images could not be read", failed, args.images.len()).into());
    }
    Ok(())
}

// ── guides ─────────────────────────────────────────────────────────────

fn guides_reader(config: Option<&Path>) -> CliResult<GaugeReader> {
    match config {
        Some(p) => {
            tracing::info!("Loading config: {}", p.display());
            GaugeReader::from_config_file(p)
        }
        None => Ok(GaugeReader::with_config(ReadConfig::default())),
    }
}

fn run_guides(args: &CliGuidesArgs) -> CliResult<()> {
    let reader = guides_reader(args.config.as_deref())?;
    tracing::info!("Loading image: {}", args.image.display());
    let gray = image::open(&args.image)?.to_luma8();

    let dial = reader
        .locate_dial(&gray)
        .ok_or_else(|| format!("dial not found in {}", args.image.display()))?;

    let font = match &args.font {
        Some(p) => Some(FontVec::try_from_vec(std::fs::read(p)?)?),
        None => {
            tracing::warn!("No --font given; drawing ticks without labels");
            None
        }
    };

    gaugeread::write_angle_guides(&gray, &dial, &GuideConfig::default(), font.as_ref(), &args.out)?;
    println!(
        "dial center ({}, {}) radius {}",
        dial.center_x, dial.center_y, dial.radius
    );
    Ok(())
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&ReadConfig::default())?);
    Ok(())
}
