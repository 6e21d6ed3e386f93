use std::fmt;
use std::str::FromStr;

/// Reported accuracy of a rotation sensor reading
///
/// Ordered from least to most trustworthy, so a minimum trusted level can be
/// expressed as a simple comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SensorAccuracy {
    /// Sensor reports it cannot be trusted (needs calibration or lost contact)
    Unreliable,
    Low,
    Medium,
    High,
}

impl SensorAccuracy {
    /// Map a platform status code (-1 no contact, 0 unreliable, 1 low,
    /// 2 medium, 3 high) to an accuracy level.
    pub fn from_status(status: i32) -> Self {
        match status {
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::Unreliable,
        }
    }

    pub fn status(&self) -> i32 {
        match self {
            Self::Unreliable => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Whether a reading at this level may be used, given the minimum trusted level.
    pub fn is_trusted(&self, minimum: SensorAccuracy) -> bool {
        *self != Self::Unreliable && *self >= minimum
    }
}

impl fmt::Display for SensorAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unreliable => "unreliable",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

impl FromStr for SensorAccuracy {
    type Err = String;

    /// Accepts either a status code (`0`..`3`, `-1`) or a level name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(status) = s.parse::<i32>() {
            return Ok(Self::from_status(status));
        }
        match s.to_ascii_lowercase().as_str() {
            "unreliable" => Ok(Self::Unreliable),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("invalid accuracy: {}", s)),
        }
    }
}

/// Raw rotation-vector reading
///
/// The vector part of a unit quaternion `(x, y, z)`, optionally accompanied by
/// the scalar part `w`. Older sensors omit `w`; it is then reconstructed from
/// the unit-norm constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: Option<f64>,
}

impl RotationReading {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: None }
    }

    pub fn with_scalar(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w: Some(w) }
    }

    /// Scalar part of the quaternion, derived when the sensor did not supply it
    pub fn scalar(&self) -> f64 {
        self.w.unwrap_or_else(|| {
            let w2 = 1.0 - self.x * self.x - self.y * self.y - self.z * self.z;
            if w2 > 0.0 { w2.sqrt() } else { 0.0 }
        })
    }
}

/// A single timestamped reading delivered by the sensor subsystem
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorEvent {
    /// Monotonic sensor clock in nanoseconds
    pub timestamp_ns: i64,
    pub accuracy: SensorAccuracy,
    pub reading: RotationReading,
}

impl SensorEvent {
    pub fn new(timestamp_ns: i64, accuracy: SensorAccuracy, reading: RotationReading) -> Self {
        Self {
            timestamp_ns,
            accuracy,
            reading,
        }
    }
}
