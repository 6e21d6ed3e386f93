use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::constants::NANOS_PER_SEC;
use crate::sensor::{SensorAccuracy, SensorEvent};

use super::path::{OrientationPath, pose_quaternion};

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    /// Gaussian jitter on yaw and tilt, standard deviation in degrees
    pub jitter_deg: Option<f64>,
    /// Fraction of readings reported with unreliable accuracy
    pub unreliable_fraction: Option<f64>,
    /// Gaussian jitter on the sample interval, standard deviation in ms
    pub timing_jitter_ms: Option<f64>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_jitter(mut self, jitter_deg: f64) -> Self {
        self.jitter_deg = Some(jitter_deg);
        self
    }

    pub fn with_unreliable(mut self, fraction: f64) -> Self {
        self.unreliable_fraction = Some(fraction);
        self
    }

    pub fn with_timing_jitter(mut self, jitter_ms: f64) -> Self {
        self.timing_jitter_ms = Some(jitter_ms);
        self
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

fn gaussian(std_dev: Option<f64>) -> Option<Normal<f64>> {
    std_dev
        .filter(|&s| s > 0.0)
        .and_then(|s| Normal::new(0.0, s).ok())
}

/// Sample `path` at `rate_hz` into rotation-vector sensor events.
///
/// Timestamps start at `start_ns` and stay strictly increasing even with
/// timing jitter.
pub fn generate_trace(
    path: &OrientationPath,
    rate_hz: f64,
    start_ns: i64,
    noise: &NoiseConfig,
) -> Vec<SensorEvent> {
    let mut rng = create_rng(noise.seed);
    let angle_noise = gaussian(noise.jitter_deg);
    let timing_noise = gaussian(noise.timing_jitter_ms);
    let unreliable = noise.unreliable_fraction.unwrap_or(0.0);

    let interval_ns = (NANOS_PER_SEC as f64 / rate_hz).round() as i64;
    let count = (path.duration_s() * rate_hz).floor() as usize + 1;

    let mut events = Vec::with_capacity(count);
    let mut last_ns = start_ns - 1;

    for i in 0..count {
        let mut offset_ns = i as i64 * interval_ns;
        if let Some(ref n) = timing_noise {
            offset_ns += (n.sample(&mut rng) * 1e6) as i64;
        }
        let timestamp_ns = (start_ns + offset_ns).max(last_ns + 1);
        last_ns = timestamp_ns;

        let t = (timestamp_ns - start_ns) as f64 / NANOS_PER_SEC as f64;
        let (mut yaw, mut tilt) = path.at(t);
        if let Some(ref n) = angle_noise {
            yaw += n.sample(&mut rng);
            tilt += n.sample(&mut rng);
        }

        let accuracy = if unreliable > 0.0 && rng.random::<f64>() < unreliable {
            SensorAccuracy::Unreliable
        } else {
            SensorAccuracy::High
        };

        events.push(SensorEvent::new(
            timestamp_ns,
            accuracy,
            pose_quaternion(yaw, tilt).to_reading(),
        ));
    }

    events
}
