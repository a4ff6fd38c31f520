//! air-gesture - hand-landmark gesture control
//!
//! Entry point for the command-line binary. Reads landmark frames as JSON
//! lines (file or stdin), runs them through the gesture engine and writes
//! the resulting commands to stdout. Logs go to stderr.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

use air_gesture::config::{Config, LoggingConfig, ScreenConfig};
use air_gesture::dispatch::{
    CommandSink, Dispatcher, JsonLinesSink, LevelSink, SimulatedLevels, TextSink, TracingSink,
};
use air_gesture::gesture::GestureLabel;
use air_gesture::ingest::{FrameClock, FrameReader};
use air_gesture::utils::{format_user_error, metric_names, MetricsCollector};
use air_gesture::GestureEngine;

/// Where emitted commands are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per command
    Pretty,
    /// One JSON object per command
    Json,
    /// Commands only appear in the log
    None,
}

/// Command-line arguments for air-gesture
#[derive(Parser, Debug)]
#[command(name = "air-gesture")]
#[command(version, about = "Hand-landmark gesture control engine", long_about = None)]
pub struct Args {
    /// Configuration file path (defaults to the user config directory)
    #[arg(short, long, env = "AIR_GESTURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Threshold profile (default, precise, responsive, or one from the config file)
    #[arg(short, long, env = "AIR_GESTURE_PROFILE")]
    pub profile: Option<String>,

    /// Landmark frames as JSON lines; `-` reads stdin
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Process every Nth frame
    #[arg(long, env = "AIR_GESTURE_FRAME_SKIP")]
    pub frame_skip: Option<u32>,

    /// Screen size used for cursor scaling, e.g. 2560x1440
    #[arg(long, env = "AIR_GESTURE_SCREEN")]
    pub screen: Option<ScreenConfig>,

    /// Command output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact), overrides the config file
    #[arg(long)]
    pub log_format: Option<String>,

    /// Write logs to file (in addition to stderr)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// List available threshold profiles and exit
    #[arg(long)]
    pub list_profiles: bool,

    /// List recognized gestures in priority order and exit
    #[arg(long)]
    pub show_gestures: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args);
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let _log_guard = init_logging(&args, &logging)?;

    info!("════════════════════════════════════════════════════════");
    info!("  air-gesture v{}", env!("CARGO_PKG_VERSION"));
    info!("  Built: {} {}", env!("BUILD_DATE"), env!("BUILD_TIME"));
    info!("  Commit: {}", env!("GIT_HASH"));
    info!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    info!("════════════════════════════════════════════════════════");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_user_error(&e));
            return Err(e);
        }
    };
    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    if args.list_profiles {
        print_profiles(&config);
        return Ok(());
    }
    if args.show_gestures {
        print_gestures();
        return Ok(());
    }

    if let Err(e) = run(&args, config).await {
        eprintln!("{}", format_user_error(&e));
        return Err(e);
    }

    info!("air-gesture shut down");
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    Config::load_or_default(args.config.as_deref())?.with_overrides(
        args.profile.clone(),
        args.frame_skip,
        args.screen,
    )
}

async fn run(args: &Args, config: Config) -> Result<()> {
    let metrics = Arc::new(MetricsCollector::new());
    let mut engine = GestureEngine::new(&config)?.with_metrics(metrics.clone());

    let sink = LevelSink::new(SimulatedLevels::default(), output_sink(args.output))
        .with_metrics(metrics.clone());
    let mut dispatcher = Dispatcher::new(Box::new(sink), metrics.clone());

    let mut reader = FrameReader::open(&args.input)
        .await?
        .with_metrics(metrics.clone());

    info!(
        input = %args.input.display(),
        profile = engine.active_profile_name(),
        "Processing frames (Ctrl+C to stop)"
    );

    let mut clock = FrameClock::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            frame = reader.next_frame() => {
                let Some(frame) = frame? else {
                    info!("End of input");
                    break;
                };
                let now = clock.now(&frame);

                let report = engine.process_frame(&frame, now);
                dispatcher.dispatch(&report.commands);

                if report.exit_requested {
                    info!("Exit gesture received, shutting down");
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    dispatcher.flush()?;
    log_summary(&metrics);
    Ok(())
}

fn output_sink(format: OutputFormat) -> Box<dyn CommandSink + Send> {
    match format {
        OutputFormat::Pretty => Box::new(TextSink::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonLinesSink::new(io::stdout())),
        OutputFormat::None => Box::new(TracingSink),
    }
}

fn log_summary(metrics: &MetricsCollector) {
    let snapshot = metrics.snapshot();
    let frame_time = metrics
        .get_histogram(metric_names::FRAME_TIME_US)
        .unwrap_or_default();

    info!(
        received = snapshot.counter(metric_names::FRAMES_RECEIVED),
        processed = snapshot.counter(metric_names::FRAMES_PROCESSED),
        skipped = snapshot.counter(metric_names::FRAMES_SKIPPED),
        malformed = snapshot.counter(metric_names::FRAMES_MALFORMED),
        hands_skipped = snapshot.counter(metric_names::HANDS_SKIPPED),
        commands = snapshot.counter(metric_names::COMMANDS_EMITTED),
        sink_failures = snapshot.counter(metric_names::SINK_FAILURES),
        "Session summary"
    );
    info!(
        mean_us = frame_time.mean,
        max_us = frame_time.max,
        "Frame processing time"
    );
    if snapshot.counter(metric_names::SINK_FAILURES) > 0 {
        warn!("Some commands could not be delivered, see the log above");
    }
}

fn print_profiles(config: &Config) {
    println!("Available profiles:");
    for (name, profile) in config.profiles.iter() {
        let marker = if name == config.active_profile.to_lowercase() {
            "*"
        } else {
            " "
        };
        println!(
            " {} {:<12} pinch={:.3} apart={:.3} together={:.3} namaste={:.3} smoothing={:.2} cooldown={:.1}s",
            marker,
            name,
            profile.pinch_distance,
            profile.fingers_apart_distance,
            profile.fingers_together_distance,
            profile.namaste_distance,
            profile.cursor_smoothing,
            profile.palm_open_cooldown,
        );
    }
}

fn print_gestures() {
    println!("Gestures (highest priority first):");
    for label in GestureLabel::PRIORITY {
        println!("  {}. {}", label.priority(), label);
    }
}

fn format_layer<S, W>(format: &str, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        "json" => layer.json().boxed(),
        "compact" => layer.compact().boxed(),
        _ => layer.pretty().boxed(),
    }
}

/// Console logs to stderr, optionally mirrored to a file.
///
/// `--log-file` writes a single file; otherwise `logging.log_dir` gets a
/// daily rolling file. The returned guard must live until exit.
fn init_logging(args: &Args, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let log_level = match args.verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let format = args.log_format.as_deref().unwrap_or(&logging.format);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("air_gesture={},warn", log_level))
    });

    let file_appender = match (&args.log_file, &logging.log_dir) {
        (Some(path), _) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;
            Some(tracing_appender::rolling::never(dir, name))
        }
        (None, Some(dir)) => Some(tracing_appender::rolling::daily(dir, "air-gesture.log")),
        (None, None) => None,
    };
    let (file_writer, guard) = match file_appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> =
        vec![format_layer(format, io::stderr, true)];
    if let Some(writer) = file_writer {
        layers.push(format_layer(format, writer, false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    if let Some(path) = &args.log_file {
        info!("Logging to file: {}", path.display());
    } else if let Some(dir) = &logging.log_dir {
        info!("Logging to directory: {}", dir.display());
    }

    Ok(guard)
}
