use anyhow::Context;
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glitch_engine::effects::ShiftDirection;
use glitch_engine::{
    ComponentOrder, RgbChannel, SortAlgorithm, SortStats, SpectralBandEngine, ZigzagStyle,
};
use glitchsort::models::{GlitchConfig, OperationReport};
use glitchsort::services::{
    encode_indexed_png, encode_png, load_png, save_png, timestamped_output_path, GlitchSession,
};

#[derive(Parser)]
#[command(name = "glitchsort")]
#[command(about = "Glitch art for PNG images: pixel sorting, FFT band glitches and color quantization")]
struct Cli {
    /// YAML preset file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Random seed for reproducible output (overrides the preset)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log engine details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print a JSON report of the operation to stdout
    #[arg(long, global = true)]
    report: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ImageArgs {
    /// Input PNG file
    input: PathBuf,

    /// Output PNG file (default: a timestamped copy next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Glitch sort image rows
    Sort {
        #[command(flatten)]
        image: ImageArgs,

        /// Number of row passes
        #[arg(long, default_value_t = 1)]
        passes: usize,

        /// Sort algorithm: quick, shell, bubble or insert
        #[arg(long)]
        algorithm: Option<SortAlgorithm>,

        /// Component order of the sort key, e.g. rgb or hsb
        #[arg(long)]
        order: Option<ComponentOrder>,

        /// Break point in [0, 1000]; higher means fewer glitches
        #[arg(long)]
        break_point: Option<f32>,

        /// Sort completely, without random breaks
        #[arg(long)]
        no_break: bool,
    },
    /// Sort square blocks in zigzag order
    Zigzag {
        #[command(flatten)]
        image: ImageArgs,

        /// Block edge (default: random between the preset floor and ceiling)
        #[arg(long)]
        edge: Option<u32>,

        /// Block orientation style: align, random or permute
        #[arg(long)]
        style: Option<ZigzagStyle>,

        /// Share of blocks to sort, in percent
        #[arg(long)]
        percent: Option<f32>,
    },
    /// Scale FFT bands with equalizer levels
    Equalize {
        #[command(flatten)]
        image: ImageArgs,

        /// Comma-separated levels in [-1, 1], lowest band first
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        levels: Vec<f32>,

        /// FFT block edge, a power of two
        #[arg(long)]
        block_size: Option<u32>,
    },
    /// Boost or cut FFT bins by their statistics
    Stat {
        #[command(flatten)]
        image: ImageArgs,

        /// FFT block edge, a power of two
        #[arg(long)]
        block_size: Option<u32>,
    },
    /// Reduce the image to a small palette
    Quantize {
        #[command(flatten)]
        image: ImageArgs,

        /// Palette size, 2 to 255
        #[arg(long)]
        colors: Option<usize>,

        /// Write an indexed PNG instead of RGBA
        #[arg(long)]
        indexed: bool,
    },
    /// Median filter
    Denoise {
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Shift one color channel by a pixel
    Shift {
        #[command(flatten)]
        image: ImageArgs,

        /// Channel to shift: r, g or b
        #[arg(long)]
        channel: Option<RgbChannel>,

        #[arg(long, default_value_t = ShiftDirection::Left)]
        direction: ShiftDirection,
    },
    /// Replace pixels changed since BACKUP with pixels from SNAPSHOT
    Munge {
        #[command(flatten)]
        image: ImageArgs,

        /// Image before the glitch
        #[arg(long)]
        backup: PathBuf,

        /// Image to copy replaced pixels from
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        threshold: Option<u8>,

        /// Replace unchanged pixels instead
        #[arg(long)]
        inverted: bool,
    },
    /// Rotate the image by a quarter turn
    Rotate {
        #[command(flatten)]
        image: ImageArgs,

        /// Rotate counter-clockwise
        #[arg(long)]
        left: bool,
    },
    /// Report the mean amplitude of each FFT band
    Analyze {
        /// Input PNG file
        input: PathBuf,

        /// FFT block edge, a power of two
        #[arg(long)]
        block_size: Option<u32>,
    },
    /// Print the FFT band table for a block size
    Bands {
        /// FFT block edge, a power of two
        #[arg(default_value_t = 64)]
        block_size: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "glitchsort=debug,glitch_engine=debug"
    } else {
        "glitchsort=info,glitch_engine=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => GlitchConfig::load(path),
        None => GlitchConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let started_at = Local::now();
    let report = run_command(cli.command, config, started_at)?.finish();
    if cli.report {
        println!("{}", report.to_json()?);
    }
    Ok(())
}

fn run_command(
    command: Commands,
    mut config: GlitchConfig,
    started_at: DateTime<Local>,
) -> anyhow::Result<OperationReport> {
    let report = match command {
        Commands::Sort {
            image,
            passes,
            algorithm,
            order,
            break_point,
            no_break,
        } => {
            if let Some(algorithm) = algorithm {
                config.sort.algorithm = algorithm;
            }
            if let Some(order) = order {
                config.sort.order = order;
            }
            if break_point.is_some() {
                config.sort.break_point = break_point;
            }
            if no_break {
                config.sort.random_break = false;
            }
            let mut session = open_session(&image, config)?;
            let step = session.sort(passes);
            let output = save_image(&image, &encode_png(session.image())?, started_at)?;
            image_report("sort", &session, started_at).details(json!({
                "output": output.display().to_string(),
                "algorithm": session.config().sort.algorithm.to_string(),
                "rows_sorted": step.rows_sorted,
                "new_cycle": step.new_cycle,
                "stats": stats_json(&step.stats),
            }))
        }
        Commands::Zigzag {
            image,
            edge,
            style,
            percent,
        } => {
            if let Some(style) = style {
                config.zigzag.style = style;
            }
            if let Some(percent) = percent {
                config.zigzag.percent = percent;
            }
            let mut session = open_session(&image, config)?;
            let zigzag = session.zigzag(edge);
            let output = save_image(&image, &encode_png(session.image())?, started_at)?;
            image_report("zigzag", &session, started_at).details(json!({
                "output": output.display().to_string(),
                "edge": zigzag.edge,
                "blocks_sorted": zigzag.blocks_sorted,
                "blocks_skipped": zigzag.blocks_skipped,
                "stats": stats_json(&zigzag.stats),
            }))
        }
        Commands::Equalize {
            image,
            levels,
            block_size,
        } => {
            if let Some(block_size) = block_size {
                config.fft.block_size = block_size;
            }
            let mut session = open_session(&image, config)?;
            let levels = (!levels.is_empty()).then_some(levels.as_slice());
            let spectral = session.equalize(levels)?;
            let output = save_image(&image, &encode_png(session.image())?, started_at)?;
            image_report("equalize", &session, started_at).details(json!({
                "output": output.display().to_string(),
                "block_size": spectral.edge,
                "blocks": spectral.blocks,
                "channels": spectral.channels,
            }))
        }
        Commands::Stat { image, block_size } => {
            if let Some(block_size) = block_size {
                config.fft.block_size = block_size;
            }
            let mut session = open_session(&image, config)?;
            let spectral = session.statistical()?;
            let output = save_image(&image, &encode_png(session.image())?, started_at)?;
            let stats = spectral.stats.map(|s| {
                json!({
                    "min": s.min,
                    "max": s.max,
                    "mean": s.mean,
                    "median": s.median,
                    "std_dev": s.std_dev,
                    "skew": s.skew,
                })
            });
            image_report("stat", &session, started_at).details(json!({
                "output": output.display().to_string(),
                "block_size": spectral.edge,
                "blocks": spectral.blocks,
                "channels": spectral.channels,
                "mean_stats": stats,
            }))
        }
        Commands::Quantize {
            image,
            colors,
            indexed,
        } => {
            if let Some(colors) = colors {
                config.quantize.colors = colors;
            }
            let mut session = open_session(&image, config)?;
            let quantized = session.quantize();
            let png = if indexed {
                encode_indexed_png(&quantized)?
            } else {
                encode_png(&quantized.buffer)?
            };
            let output = save_image(&image, &png, started_at)?;
            let palette: Vec<String> = quantized
                .colormap
                .iter()
                .map(|c| format!("#{:06X}", c & 0x00FF_FFFF))
                .collect();
            image_report("quantize", &session, started_at).details(json!({
                "output": output.display().to_string(),
                "colors": quantized.colormap.len(),
                "palette": palette,
            }))
        }
        Commands::Denoise { image } => {
            let mut session = open_session(&image, config)?;
            session.denoise();
            let output = save_image(&image, &encode_png(session.image())?, started_at)?;
            image_report("denoise", &session, started_at).details(json!({
                "output": output.display().to_string(),
            }))
        }
        Commands::Shift {
            image,
            channel,
            direction,
        } => {
            if let Some(channel) = channel {
                config.shift.channel = channel;
            }
            let mut session = open_session(&image, config)?;
            session.shift(direction);
            let output = save_image(&image, &encode_png(session.image())?, started_at)?;
            image_report("shift", &session, started_at).details(json!({
                "output": output.display().to_string(),
                "channel": session.config().shift.channel.to_string(),
                "direction": direction.to_string(),
            }))
        }
        Commands::Munge {
            image,
            backup,
            snapshot,
            threshold,
            inverted,
        } => {
            if let Some(threshold) = threshold {
                config.munge.threshold = threshold;
            }
            if inverted {
                config.munge.inverted = true;
            }
            let mut session = open_session(&image, config)?;
            session.set_backup(read_png(&backup)?);
            session.set_snapshot(read_png(&snapshot)?);
            let replaced = session.munge()?;
            let output = save_image(&image, &encode_png(session.image())?, started_at)?;
            image_report("munge", &session, started_at).details(json!({
                "output": output.display().to_string(),
                "replaced": replaced,
            }))
        }
        Commands::Rotate { image, left } => {
            let mut session = open_session(&image, config)?;
            session.rotate(!left);
            let output = save_image(&image, &encode_png(session.image())?, started_at)?;
            image_report("rotate", &session, started_at).details(json!({
                "output": output.display().to_string(),
                "clockwise": !left,
            }))
        }
        Commands::Analyze { input, block_size } => {
            if let Some(block_size) = block_size {
                config.fft.block_size = block_size;
            }
            let mut session = GlitchSession::new(read_png(&input)?, config);
            let analysis = session.analyze()?;
            for (band, mean) in analysis.bands.iter().zip(&analysis.band_means) {
                println!("{:>12}  {mean:>12.3}", band.to_string());
            }
            let bands: Vec<Value> = analysis
                .bands
                .iter()
                .zip(&analysis.band_means)
                .map(|(band, mean)| json!({ "lower": band.lower, "upper": band.upper, "mean": mean }))
                .collect();
            let (width, height) = (session.image().width(), session.image().height());
            return Ok(OperationReport::new("analyze", started_at)
                .size(width, height)
                .details(json!({
                    "block_size": analysis.edge,
                    "blocks": analysis.blocks,
                    "min": analysis.min,
                    "max": analysis.max,
                    "bands": bands,
                })));
        }
        Commands::Bands { block_size } => {
            let engine = SpectralBandEngine::new(block_size)?;
            let mut bands = Vec::with_capacity(engine.band_count());
            for (i, band) in engine.bands().iter().enumerate() {
                let center = engine.band_center_frequency(band);
                println!("{i:>3}  {:>12}  {center:>10.1} Hz", band.to_string());
                bands.push(json!({ "lower": band.lower, "upper": band.upper, "center_hz": center }));
            }
            return Ok(OperationReport::new("bands", started_at).details(json!({
                "block_size": block_size,
                "spec_size": engine.spec_size(),
                "bands": bands,
            })));
        }
    };

    Ok(report)
}

fn read_png(path: &Path) -> anyhow::Result<glitch_engine::PixelBuffer> {
    load_png(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn open_session(image: &ImageArgs, config: GlitchConfig) -> anyhow::Result<GlitchSession> {
    Ok(GlitchSession::new(read_png(&image.input)?, config))
}

/// Save `png` to the requested output, or a fresh timestamped path.
fn save_image(
    image: &ImageArgs,
    png: &[u8],
    started_at: DateTime<Local>,
) -> anyhow::Result<PathBuf> {
    let path = image
        .output
        .clone()
        .unwrap_or_else(|| timestamped_output_path(&image.input, None, started_at));
    save_png(&path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Saved {}", path.display());
    Ok(path)
}

fn image_report(
    operation: &str,
    session: &GlitchSession,
    started_at: DateTime<Local>,
) -> OperationReport {
    let image = session.image();
    OperationReport::new(operation, started_at).size(image.width(), image.height())
}

fn stats_json(stats: &SortStats) -> Value {
    json!({
        "comparisons": stats.comparisons,
        "exchanges": stats.exchanges,
        "breaks": stats.breaks,
    })
}
