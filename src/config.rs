//! Configuration for the shake-to-clear kiosk.
//!
//! Defaults match a child holding a tablet upright: samples older than three
//! seconds are forgotten, the device has to be turned more than 70° away from
//! where it rests and brought back within 20° of it.
//!
//! Settings can be loaded from a TOML file; every key is optional:
//!
//! ```toml
//! [sensor]
//! min_accuracy = "medium"
//! remap = ["x", "z"]
//!
//! [gesture]
//! retention_secs = 3.0
//! far_degrees = 70.0
//! near_degrees = 20.0
//!
//! [archive]
//! directory = "/sdcard/Pictures"
//! folder = "DrawingForKids"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{FAR_THRESHOLD_RAD, NANOS_PER_SEC, NEAR_THRESHOLD_RAD, RETENTION_WINDOW_NS};
use crate::error::{GestureError, Result};
use crate::orientation::{Axis, OrientationConverter};
use crate::sensor::SensorAccuracy;

/// Angle threshold
///
/// Stored in radians. Parsed from degrees by default.
///
/// # Parsing formats
/// - `70` or `70deg` or `70°` - degrees
/// - `1.22rad` - radians
///
/// # Example
/// ```
/// use shakeclear::config::Angle;
///
/// let far: Angle = "70deg".parse().unwrap();
/// assert!((far.as_degrees() - 70.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub fn from_radians(rad: f64) -> Self {
        Self(rad)
    }

    pub fn from_degrees(deg: f64) -> Self {
        Self(deg / 180.0 * std::f64::consts::PI)
    }

    pub fn as_radians(&self) -> f64 {
        self.0
    }

    pub fn as_degrees(&self) -> f64 {
        self.0.to_degrees()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.as_degrees())
    }
}

impl FromStr for Angle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(num) = s.strip_suffix("rad") {
            let rad: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid angle: {}", s))?;
            return Ok(Self::from_radians(rad));
        }

        let num = s
            .strip_suffix("deg")
            .or_else(|| s.strip_suffix('°'))
            .unwrap_or(s);
        let deg: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid angle: {}", s))?;
        Ok(Self::from_degrees(deg))
    }
}

/// Sliding time span over which orientation samples are kept
///
/// Stored in sensor-clock nanoseconds.
///
/// # Parsing formats
/// - `3` or `3s` - seconds
/// - `2500ms` - milliseconds
/// - `3000000000ns` - nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RetentionWindow(i64);

impl RetentionWindow {
    pub fn from_nanos(ns: i64) -> Self {
        Self(ns)
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * NANOS_PER_SEC as f64).round() as i64)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self(RETENTION_WINDOW_NS)
    }
}

impl fmt::Display for RetentionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

impl FromStr for RetentionWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || format!("invalid duration: {}", s);

        if let Some(num) = s.strip_suffix("ns") {
            let ns: i64 = num.trim().parse().map_err(|_| invalid())?;
            return Ok(Self::from_nanos(ns));
        }
        if let Some(num) = s.strip_suffix("ms") {
            let ms: f64 = num.trim().parse().map_err(|_| invalid())?;
            if !ms.is_finite() {
                return Err(invalid());
            }
            return Ok(Self::from_secs_f64(ms / 1000.0));
        }
        let num = s.strip_suffix('s').unwrap_or(s);
        let secs: f64 = num.trim().parse().map_err(|_| invalid())?;
        if !secs.is_finite() {
            return Err(invalid());
        }
        Ok(Self::from_secs_f64(secs))
    }
}

/// Top-level kiosk configuration
///
/// # Example
/// ```
/// use shakeclear::config::{Angle, KioskConfig};
///
/// let mut config = KioskConfig::default();
/// config.gesture.far_threshold = Angle::from_degrees(60.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct KioskConfig {
    /// Orientation sensor handling
    pub sensor: SensorConfig,
    /// Gesture thresholds and retention
    pub gesture: GestureConfig,
    /// Where drawings are saved before a clear
    pub archive: ArchiveConfig,
}

/// Orientation sensor configuration
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Lowest accuracy level whose readings are used
    pub min_accuracy: SensorAccuracy,
    /// Device axis mapped onto the drawing surface X axis
    pub remap_x: Axis,
    /// Device axis mapped onto the drawing surface Y axis
    pub remap_y: Axis,
}

/// Gesture detection configuration
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// How long samples stay in the history
    pub retention_window: RetentionWindow,
    /// Distance that has to be exceeded to count as "rotated away"
    pub far_threshold: Angle,
    /// Distance that has to be undercut to count as "back"
    pub near_threshold: Angle,
}

/// Drawing archive configuration
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Base pictures directory
    pub directory: PathBuf,
    /// Folder created inside `directory` for saved drawings
    pub folder: String,
    /// `chrono` format string for the file stem
    pub file_name_format: String,
}

impl ArchiveConfig {
    pub fn drawings_dir(&self) -> PathBuf {
        self.directory.join(&self.folder)
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            min_accuracy: SensorAccuracy::Low,
            remap_x: Axis::X,
            remap_y: Axis::Z,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            retention_window: RetentionWindow::default(),
            far_threshold: Angle::from_radians(FAR_THRESHOLD_RAD),
            near_threshold: Angle::from_radians(NEAR_THRESHOLD_RAD),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            folder: "DrawingForKids".to_string(),
            file_name_format: "%Y%m%d-%H%M%S".to_string(),
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.retention_window.as_nanos() <= 0 {
            return Err(GestureError::Config(format!(
                "retention window must be positive, got {}",
                self.retention_window
            )));
        }
        for (name, angle) in [("far", self.far_threshold), ("near", self.near_threshold)] {
            if !angle.as_radians().is_finite() {
                return Err(GestureError::Config(format!(
                    "{} threshold must be finite, got {}",
                    name, angle
                )));
            }
        }
        if self.near_threshold.as_radians() <= 0.0 {
            return Err(GestureError::Config(format!(
                "near threshold must be positive, got {}",
                self.near_threshold
            )));
        }
        if self.near_threshold >= self.far_threshold {
            return Err(GestureError::Config(format!(
                "near threshold {} must be below far threshold {}",
                self.near_threshold, self.far_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    sensor: Option<SensorSection>,
    gesture: Option<GestureSection>,
    archive: Option<ArchiveSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SensorSection {
    min_accuracy: Option<SensorAccuracy>,
    remap: Option<[Axis; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GestureSection {
    retention_secs: Option<f64>,
    far_degrees: Option<f64>,
    near_degrees: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArchiveSection {
    directory: Option<PathBuf>,
    folder: Option<String>,
    file_name_format: Option<String>,
}

impl KioskConfig {
    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let toml: TomlConfig =
            toml::from_str(content).map_err(|e| GestureError::Config(e.to_string()))?;
        let mut config = Self::default();

        if let Some(sensor) = toml.sensor {
            if let Some(min_accuracy) = sensor.min_accuracy {
                config.sensor.min_accuracy = min_accuracy;
            }
            if let Some([x, y]) = sensor.remap {
                config.sensor.remap_x = x;
                config.sensor.remap_y = y;
            }
        }

        if let Some(gesture) = toml.gesture {
            if let Some(secs) = gesture.retention_secs {
                if !secs.is_finite() {
                    return Err(GestureError::Config(format!(
                        "retention_secs must be finite, got {}",
                        secs
                    )));
                }
                config.gesture.retention_window = RetentionWindow::from_secs_f64(secs);
            }
            if let Some(deg) = gesture.far_degrees {
                config.gesture.far_threshold = Angle::from_degrees(deg);
            }
            if let Some(deg) = gesture.near_degrees {
                config.gesture.near_threshold = Angle::from_degrees(deg);
            }
        }

        if let Some(archive) = toml.archive {
            if let Some(directory) = archive.directory {
                config.archive.directory = directory;
            }
            if let Some(folder) = archive.folder {
                config.archive.folder = folder;
            }
            if let Some(format) = archive.file_name_format {
                config.archive.file_name_format = format;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.gesture.validate()?;
        OrientationConverter::new(self.sensor.remap_x, self.sensor.remap_y)?;
        if self.archive.folder.is_empty() {
            return Err(GestureError::Config("archive folder must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_default_unit_is_degrees() {
        let angle: Angle = "70".parse().unwrap();
        assert_relative_eq!(angle.as_radians(), FAR_THRESHOLD_RAD, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_suffixes() {
        let deg: Angle = "20deg".parse().unwrap();
        assert_relative_eq!(deg.as_radians(), NEAR_THRESHOLD_RAD, epsilon = 1e-12);

        let sym: Angle = "20°".parse().unwrap();
        assert_relative_eq!(sym.as_degrees(), 20.0, epsilon = 1e-9);

        let rad: Angle = "1.3rad".parse().unwrap();
        assert_relative_eq!(rad.as_radians(), 1.3);

        assert!("seventy".parse::<Angle>().is_err());
    }

    #[test]
    fn test_retention_window_parse() {
        let w: RetentionWindow = "3s".parse().unwrap();
        assert_eq!(w.as_nanos(), RETENTION_WINDOW_NS);

        let w: RetentionWindow = "2500ms".parse().unwrap();
        assert_eq!(w.as_nanos(), 2_500_000_000);

        let w: RetentionWindow = "42ns".parse().unwrap();
        assert_eq!(w.as_nanos(), 42);

        let w: RetentionWindow = "1.5".parse().unwrap();
        assert_eq!(w.as_nanos(), 1_500_000_000);

        assert!("soon".parse::<RetentionWindow>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = KioskConfig::default();
        assert_eq!(config.gesture.retention_window.as_nanos(), 3_000_000_000);
        assert_relative_eq!(config.gesture.far_threshold.as_degrees(), 70.0, epsilon = 1e-9);
        assert_relative_eq!(config.gesture.near_threshold.as_degrees(), 20.0, epsilon = 1e-9);
        assert_eq!(config.sensor.min_accuracy, SensorAccuracy::Low);
        assert_eq!(config.sensor.remap_x, Axis::X);
        assert_eq!(config.sensor.remap_y, Axis::Z);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = GestureConfig::default();
        config.near_threshold = Angle::from_degrees(80.0);
        assert!(config.validate().is_err());

        let mut config = GestureConfig::default();
        config.retention_window = RetentionWindow::from_nanos(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = KioskConfig::from_toml_str(
            r#"
            [sensor]
            min_accuracy = "medium"
            remap = ["-y", "x"]

            [gesture]
            retention_secs = 2.0
            far_degrees = 60.0

            [archive]
            folder = "Doodles"
            "#,
        )
        .unwrap();

        assert_eq!(config.sensor.min_accuracy, SensorAccuracy::Medium);
        assert_eq!(config.sensor.remap_x, Axis::MinusY);
        assert_eq!(config.sensor.remap_y, Axis::X);
        assert_eq!(config.gesture.retention_window.as_nanos(), 2_000_000_000);
        assert_relative_eq!(config.gesture.far_threshold.as_degrees(), 60.0, epsilon = 1e-9);
        // Untouched keys keep their defaults
        assert_relative_eq!(config.gesture.near_threshold.as_degrees(), 20.0, epsilon = 1e-9);
        assert_eq!(config.archive.drawings_dir(), PathBuf::from("./Doodles"));
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(KioskConfig::from_toml_str("[gesture]\nfar_degrees = \"lots\"").is_err());
        assert!(KioskConfig::from_toml_str("[sensor]\nremap = [\"x\", \"-x\"]").is_err());
        assert!(KioskConfig::from_toml_str("[gesture]\nnear_degrees = 90.0").is_err());
        assert!(KioskConfig::from_toml_str("[mystery]\nkey = 1").is_err());
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        assert!(KioskConfig::from_toml_str("[gesture]\nfar_degrees = nan").is_err());
        assert!(KioskConfig::from_toml_str("[gesture]\nnear_degrees = nan").is_err());
        assert!(KioskConfig::from_toml_str("[gesture]\nfar_degrees = inf").is_err());
        assert!(KioskConfig::from_toml_str("[gesture]\nretention_secs = nan").is_err());
        assert!(KioskConfig::from_toml_str("[gesture]\nretention_secs = inf").is_err());

        let far: Angle = "nan".parse().unwrap();
        let config = GestureConfig {
            far_threshold: far,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_err());

        assert!("nan".parse::<RetentionWindow>().is_err());
        assert!("infms".parse::<RetentionWindow>().is_err());
    }
}
