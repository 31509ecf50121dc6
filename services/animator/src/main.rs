//! Snapshot animator.
//!
//! Renders every timestep of a rank-decomposed simulation run into a
//! `frame_NNNNN.png` sequence and encodes the sequence into an animation.

mod summary;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pipeline::{
    animate, discover_frames, latest_output_dir, Animation, EncodeStatus, EncoderConfig,
    FfmpegEncoder, PipelineConfig, Scheduler, WorkerCount, DEFAULT_OUTFILE, RUN_DIR_PREFIX,
};
use renderer::{Colormap, Origin, RenderConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use summary::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "animator")]
#[command(about = "Render per-rank simulation snapshots into an animation")]
struct Args {
    /// Directory holding the snapshot files
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// Use the most recent output-* directory under --output-root
    #[arg(short, long, conflicts_with = "directory")]
    latest: bool,

    /// Root searched by --latest
    #[arg(long, default_value = "../output")]
    output_root: PathBuf,

    /// Animation file name, relative to the snapshot directory
    #[arg(short, long, default_value = DEFAULT_OUTFILE)]
    outfile: PathBuf,

    /// Number of worker threads
    #[arg(short, long, conflicts_with = "all_cores")]
    nproc: Option<usize>,

    /// Use one worker per available core
    #[arg(long)]
    all_cores: bool,

    /// Skip rendering and encode the frames already in the directory
    #[arg(long)]
    no_read: bool,

    /// Render configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Colormap (jet, viridis, grayscale)
    #[arg(long)]
    colormap: Option<Colormap>,

    /// Lower clamp bound of log10(density)
    #[arg(long, allow_hyphen_values = true)]
    vmin: Option<f32>,

    /// Upper clamp bound of log10(density)
    #[arg(long, allow_hyphen_values = true)]
    vmax: Option<f32>,

    /// Vertical placement of grid row 0 (lower, upper)
    #[arg(long)]
    origin: Option<Origin>,

    /// Skip the encode phase
    #[arg(long)]
    no_encode: bool,

    /// Show a progress bar while rendering
    #[arg(long)]
    progress: bool,

    /// Summary format
    #[arg(long, value_enum, default_value = "table")]
    summary: SummaryFormat,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = ?e, "Animator failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr);

    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Returns whether the run counts as successful.
fn run(args: Args) -> Result<bool> {
    let config = build_config(&args)?;

    let dir = if args.latest {
        latest_output_dir(&args.output_root, RUN_DIR_PREFIX)?
    } else {
        args.directory.clone()
    };
    let output = dir.join(&args.outfile);

    info!(
        dir = %dir.display(),
        workers = ?config.workers,
        colormap = %config.render.colormap,
        vmin = config.render.vmin,
        vmax = config.render.vmax,
        "Starting animator"
    );

    let scheduler = Scheduler::new(config)?;

    if args.no_encode {
        let animation = if args.no_read {
            let frames = discover_frames(&dir, &scheduler.config().frame_prefix)?.len();
            info!(frames, "Rendering and encoding skipped");
            Animation {
                run: None,
                frames,
                encode: EncodeStatus::Skipped,
                encode_secs: 0.0,
            }
        } else {
            let report = scheduler.run(&dir)?;
            Animation {
                frames: report.frames_written(),
                run: Some(report),
                encode: EncodeStatus::Skipped,
                encode_secs: 0.0,
            }
        };
        print_summary(&animation, args.summary)?;
        return Ok(match &animation.run {
            Some(report) => report.is_success(),
            None => animation.frames > 0,
        });
    }

    let encoder = FfmpegEncoder::new(EncoderConfig::from_env());
    let animation = animate(&scheduler, &encoder, &dir, &output, !args.no_read)?;
    print_summary(&animation, args.summary)?;
    Ok(animation.is_success())
}

/// Defaults, then environment, then the YAML file, then flags.
fn build_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env().context("invalid ANIMATOR_* environment")?;

    if let Some(path) = &args.config {
        config.render = RenderConfig::from_file(path)
            .with_context(|| format!("failed to load render config {}", path.display()))?;
    }
    if let Some(colormap) = args.colormap {
        config.render.colormap = colormap;
    }
    if let Some(vmin) = args.vmin {
        config.render.vmin = vmin;
    }
    if let Some(vmax) = args.vmax {
        config.render.vmax = vmax;
    }
    if let Some(origin) = args.origin {
        config.render.origin = origin;
    }

    if args.all_cores {
        config.workers = WorkerCount::AllAvailable;
    } else if let Some(n) = args.nproc {
        anyhow::ensure!(n > 0, "--nproc must be > 0");
        config.workers = WorkerCount::Fixed(n);
    }
    config.progress = args.progress;

    config.validate()?;
    Ok(config)
}

fn print_summary(animation: &Animation, format: SummaryFormat) -> Result<()> {
    match format {
        SummaryFormat::Table => println!("{}", Summary::format_table(animation)),
        SummaryFormat::Json => println!("{}", Summary::format_json(animation)?),
    }
    Ok(())
}
