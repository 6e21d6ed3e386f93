use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::{Path, PathBuf};

use shakeclear::config::{Angle, KioskConfig, RetentionWindow};
use shakeclear::monitor::{GestureMonitor, MonitorStats};
use shakeclear::orientation::Axis;
use shakeclear::output::{Formatter, OutputFormat, create_formatter};
use shakeclear::sensor::{SensorAccuracy, SensorSource, TraceSource};

#[derive(Parser, Debug)]
#[command(name = "shakeclear")]
#[command(about = "Replay orientation sensor traces and report shake-to-clear gestures", long_about = None)]
struct Args {
    /// Trace files to replay ("-" reads stdin)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Distance to exceed when turning away (e.g., "70", "1.22rad")
    #[arg(long)]
    far: Option<Angle>,

    /// Distance to undercut when coming back (e.g., "20", "20deg")
    #[arg(long)]
    near: Option<Angle>,

    /// How long samples are retained (e.g., "3s", "2500ms")
    #[arg(long)]
    retention: Option<RetentionWindow>,

    /// Lowest sensor accuracy whose readings are used
    #[arg(long, value_enum)]
    min_accuracy: Option<SensorAccuracy>,

    /// Device axis mapped to the surface X axis (x, y, z, -x, -y, -z)
    #[arg(long)]
    remap_x: Option<Axis>,

    /// Device axis mapped to the surface Y axis (x, y, z, -x, -y, -z)
    #[arg(long)]
    remap_y: Option<Axis>,

    /// Skip the per-file summary
    #[arg(long)]
    no_summary: bool,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    count: usize,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct FileReplay {
    filename: String,
    samples: u64,
    gestures: u64,
    accepted: u64,
    dropped: u64,
    span_s: f64,
    interval_ms: Option<StatsSummary>,
    error: Option<String>,
}

impl FileReplay {
    fn failed(filename: String, error: &anyhow::Error) -> Self {
        Self {
            filename,
            samples: 0,
            gestures: 0,
            accepted: 0,
            dropped: 0,
            span_s: 0.0,
            interval_ms: None,
            error: Some(format!("{:#}", error)),
        }
    }
}

fn build_config(args: &Args) -> anyhow::Result<KioskConfig> {
    let mut config = match args.config {
        Some(ref path) => KioskConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => KioskConfig::default(),
    };

    if let Some(far) = args.far {
        config.gesture.far_threshold = far;
    }
    if let Some(near) = args.near {
        config.gesture.near_threshold = near;
    }
    if let Some(retention) = args.retention {
        config.gesture.retention_window = retention;
    }
    if let Some(min_accuracy) = args.min_accuracy {
        config.sensor.min_accuracy = min_accuracy;
    }
    if let Some(x) = args.remap_x {
        config.sensor.remap_x = x;
    }
    if let Some(y) = args.remap_y {
        config.sensor.remap_y = y;
    }

    config.validate()?;
    Ok(config)
}

fn display_name(path: &Path) -> String {
    if path.as_os_str() == "-" {
        return "<stdin>".to_string();
    }
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn replay_file(
    path: &Path,
    config: &KioskConfig,
    formatter: &dyn Formatter,
) -> anyhow::Result<FileReplay> {
    let mut source: Box<dyn SensorSource> = if path.as_os_str() == "-" {
        Box::new(TraceSource::stdin())
    } else {
        Box::new(TraceSource::open(path)?)
    };

    let mut monitor = GestureMonitor::new(config)?;
    let mut interval_stats: Stats<f64> = Stats::new();
    let mut samples = 0u64;
    let mut first_ns: Option<i64> = None;
    let mut last_ns: Option<i64> = None;

    while let Some(event) = source.next_event()? {
        samples += 1;
        if let Some(prev) = last_ns {
            interval_stats.update(event.timestamp_ns.saturating_sub(prev) as f64 / 1e6);
        }
        first_ns.get_or_insert(event.timestamp_ns);
        last_ns = Some(event.timestamp_ns);

        if let Some(gesture) = monitor.on_orientation_sample(&event) {
            println!("{}", formatter.format(&gesture));
        }
    }

    let stats: MonitorStats = monitor.stats();
    let span_s = match (first_ns, last_ns) {
        (Some(first), Some(last)) => last.saturating_sub(first) as f64 / 1e9,
        _ => 0.0,
    };

    Ok(FileReplay {
        filename: display_name(path),
        samples,
        gestures: stats.gestures,
        accepted: stats.accepted,
        dropped: stats.dropped(),
        span_s,
        interval_ms: StatsSummary::from_stats(&interval_stats),
        error: None,
    })
}

fn print_summary(results: &[FileReplay], format: OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        eprintln!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    eprintln!();
    eprintln!(
        "{:<40} {:>8} {:>8} {:>8} {:>8} {:>10} {:>12}",
        "File", "Samples", "Accepted", "Dropped", "Gestures", "Span(s)", "Interval(ms)"
    );
    eprintln!("{}", "-".repeat(100));

    for result in results {
        if let Some(ref err) = result.error {
            eprintln!("{:<40} ERROR: {}", result.filename, err);
            continue;
        }
        let interval = result
            .interval_ms
            .as_ref()
            .map(|s| format!("{:.2}±{:.2}", s.mean, s.std_dev))
            .unwrap_or_else(|| "-".to_string());
        eprintln!(
            "{:<40} {:>8} {:>8} {:>8} {:>8} {:>10.2} {:>12}",
            result.filename,
            result.samples,
            result.accepted,
            result.dropped,
            result.gestures,
            result.span_s,
            interval
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let config = build_config(&args)?;
    log::info!(
        "Retention {}, far {}, near {}, min accuracy {}",
        config.gesture.retention_window,
        config.gesture.far_threshold,
        config.gesture.near_threshold,
        config.sensor.min_accuracy
    );

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let mut results = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let result = match replay_file(path, &config, formatter.as_ref()) {
            Ok(result) => result,
            Err(e) => {
                log::error!("{}: {:#}", path.display(), e);
                FileReplay::failed(display_name(path), &e)
            }
        };
        results.push(result);
    }

    if !args.no_summary {
        print_summary(&results, args.format)?;
    }

    if results.iter().all(|r| r.error.is_some()) {
        anyhow::bail!("No trace could be replayed");
    }
    Ok(())
}
