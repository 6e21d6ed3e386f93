//! Gesture detection constants
//!
//! Defaults for the shake-to-clear gesture. All angles are radians and all
//! times are in sensor-clock units (nanoseconds).

use std::f64::consts::PI;

/// How long orientation samples are retained for matching (3 s).
pub const RETENTION_WINDOW_NS: i64 = 3_000_000_000;

/// Distance from the resting orientation that counts as "rotated away" (70°).
pub const FAR_THRESHOLD_RAD: f64 = 70.0 / 180.0 * PI;

/// Distance from the resting orientation that counts as "back" (20°).
pub const NEAR_THRESHOLD_RAD: f64 = 20.0 / 180.0 * PI;

/// Nanoseconds per second of sensor clock.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Below this norm a quaternion is treated as degenerate and left unnormalized.
pub const QUATERNION_EPSILON: f64 = 1e-9;
