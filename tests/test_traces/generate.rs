use shakeclear::config::KioskConfig;
use shakeclear::monitor::GestureEvent;
use shakeclear::sensor::{SensorAccuracy, SensorEvent};
use shakeclear::simulation::{NoiseConfig, OrientationPath, generate_trace, pose_quaternion, replay};

pub const SEC: i64 = 1_000_000_000;

/// Single high-accuracy reading of an upright device turned by `yaw_deg`
pub fn at_yaw(timestamp_ns: i64, yaw_deg: f64) -> SensorEvent {
    SensorEvent::new(
        timestamp_ns,
        SensorAccuracy::High,
        pose_quaternion(yaw_deg, 0.0).to_reading(),
    )
}

/// Device lying flat on the table, screen up
pub fn flat(timestamp_ns: i64) -> SensorEvent {
    SensorEvent::new(
        timestamp_ns,
        SensorAccuracy::High,
        pose_quaternion(0.0, -90.0).to_reading(),
    )
}

/// Noise-free trace following `(time_s, yaw_deg)` keyframes
pub fn yaw_trace(points: &[(f64, f64)], rate_hz: f64) -> Vec<SensorEvent> {
    generate_trace(
        &OrientationPath::yaw(points),
        rate_hz,
        0,
        &NoiseConfig::default(),
    )
}

/// Gestures found when replaying a yaw trace with default settings
pub fn replay_yaw(points: &[(f64, f64)], rate_hz: f64) -> Vec<GestureEvent> {
    replay(&yaw_trace(points, rate_hz), &KioskConfig::default())
        .expect("default config is valid")
        .gestures
}
