use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use shakeclear::sensor::TraceWriter;
use shakeclear::simulation::{Keyframe, NoiseConfig, OrientationPath, Scenario, generate_trace};

#[derive(Parser, Debug)]
#[command(name = "generate_trace")]
#[command(about = "Generate synthetic rotation-vector traces for gesture testing")]
struct Args {
    /// Canned scenario to generate
    #[arg(long, value_enum, default_value = "shake")]
    scenario: Scenario,

    /// TOML scenario file with keyframes and noise (replaces --scenario)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of times to repeat the scenario
    #[arg(short, long, default_value_t = 1)]
    repeat: u32,

    /// Pause between repetitions in seconds
    #[arg(long, default_value_t = 1.0)]
    gap: f64,

    /// Sensor rate in Hz
    #[arg(long, default_value_t = 50.0)]
    rate_hz: f64,

    /// Sensor timestamp of the first sample in nanoseconds
    #[arg(long, default_value_t = 0)]
    start_ns: i64,

    /// Seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Orientation jitter standard deviation in degrees (CLI override)
    #[arg(long)]
    jitter: Option<f64>,

    /// Fraction of unreliable readings (CLI override)
    #[arg(long)]
    unreliable: Option<f64>,

    /// Sample interval jitter standard deviation in ms (CLI override)
    #[arg(long)]
    timing_jitter: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlScenario {
    rate_hz: Option<f64>,
    noise: Option<NoiseConfig>,
    #[serde(default)]
    keyframe: Vec<Keyframe>,
}

fn load_toml_scenario(path: &PathBuf) -> Result<TomlScenario> {
    let content = fs::read_to_string(path).context("Failed to read scenario file")?;
    toml::from_str(&content).context("Failed to parse scenario file")
}

fn build_noise_config(toml: &TomlScenario, args: &Args) -> NoiseConfig {
    let mut config = toml.noise.clone().unwrap_or_default();

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(jitter) = args.jitter {
        config = config.with_jitter(jitter);
    }
    if let Some(fraction) = args.unreliable {
        config = config.with_unreliable(fraction);
    }
    if let Some(jitter_ms) = args.timing_jitter {
        config = config.with_timing_jitter(jitter_ms);
    }

    config
}

fn main() -> Result<()> {
    let args = Args::parse();

    let toml_scenario = if let Some(ref config_path) = args.config {
        load_toml_scenario(config_path)?
    } else {
        TomlScenario::default()
    };

    let once = if toml_scenario.keyframe.is_empty() {
        args.scenario.path()
    } else {
        OrientationPath::new(toml_scenario.keyframe.clone())
    };

    let mut path = once.clone();
    for _ in 1..args.repeat.max(1) {
        path = path.then(&once, args.gap);
    }

    let rate_hz = toml_scenario.rate_hz.unwrap_or(args.rate_hz);
    if rate_hz.is_nan() || rate_hz <= 0.0 {
        anyhow::bail!("Sensor rate must be positive, got {}", rate_hz);
    }

    let noise = build_noise_config(&toml_scenario, &args);
    let events = generate_trace(&path, rate_hz, args.start_ns, &noise);

    let out: Box<dyn Write> = match args.output {
        Some(ref p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Failed to create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut writer = TraceWriter::new(out)?;
    for event in &events {
        writer.write_event(event)?;
    }
    writer.finish()?;

    eprintln!(
        "Generated {} samples over {:.2}s at {} Hz",
        events.len(),
        path.duration_s(),
        rate_hz
    );
    Ok(())
}
