use serde::Deserialize;

use crate::orientation::Quaternion;

/// Device pose at a point in scenario time
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Keyframe {
    pub time_s: f64,
    /// Turn about the vertical axis, degrees
    pub yaw_deg: f64,
    /// Forward/backward lean from upright, degrees
    #[serde(default)]
    pub tilt_deg: f64,
}

impl Keyframe {
    pub fn new(time_s: f64, yaw_deg: f64, tilt_deg: f64) -> Self {
        Self {
            time_s,
            yaw_deg,
            tilt_deg,
        }
    }
}

/// Piecewise-linear orientation path through keyframes
#[derive(Debug, Clone)]
pub struct OrientationPath {
    keyframes: Vec<Keyframe>,
}

impl OrientationPath {
    pub fn new(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        Self { keyframes }
    }

    /// Yaw-only path from `(time_s, yaw_deg)` pairs
    pub fn yaw(points: &[(f64, f64)]) -> Self {
        Self::new(
            points
                .iter()
                .map(|&(t, yaw)| Keyframe::new(t, yaw, 0.0))
                .collect(),
        )
    }

    pub fn duration_s(&self) -> f64 {
        self.keyframes.last().map_or(0.0, |k| k.time_s)
    }

    /// `(yaw_deg, tilt_deg)` at `t`, holding the end poses outside the path
    pub fn at(&self, t: f64) -> (f64, f64) {
        let Some(first) = self.keyframes.first() else {
            return (0.0, 0.0);
        };
        if t <= first.time_s {
            return (first.yaw_deg, first.tilt_deg);
        }

        for pair in self.keyframes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time_s {
                let span = b.time_s - a.time_s;
                let frac = if span > 0.0 { (t - a.time_s) / span } else { 1.0 };
                return (
                    a.yaw_deg + (b.yaw_deg - a.yaw_deg) * frac,
                    a.tilt_deg + (b.tilt_deg - a.tilt_deg) * frac,
                );
            }
        }

        let last = self.keyframes[self.keyframes.len() - 1];
        (last.yaw_deg, last.tilt_deg)
    }

    /// Append `other`, shifted to start `gap_s` after this path ends
    pub fn then(mut self, other: &OrientationPath, gap_s: f64) -> Self {
        let offset = self.duration_s() + gap_s;
        self.keyframes.extend(
            other
                .keyframes
                .iter()
                .map(|k| Keyframe::new(k.time_s + offset, k.yaw_deg, k.tilt_deg)),
        );
        self
    }
}

/// Quaternion of an upright device turned by `yaw_deg` and leaning by `tilt_deg`.
///
/// With the default axis remap this reads back as azimuth `-yaw` and pitch
/// `-tilt`.
pub fn pose_quaternion(yaw_deg: f64, tilt_deg: f64) -> Quaternion {
    let lean = Quaternion::from_axis_angle([1.0, 0.0, 0.0], (90.0 + tilt_deg).to_radians());
    let turn = Quaternion::from_axis_angle([0.0, 0.0, 1.0], yaw_deg.to_radians());
    turn.multiply(&lean)
}

/// Turn well past 70°, hold briefly, come back to rest.
pub fn shake_gesture() -> OrientationPath {
    OrientationPath::yaw(&[
        (0.0, 0.0),
        (0.5, 0.0),
        (1.0, 100.0),
        (1.2, 100.0),
        (1.7, 0.0),
        (2.5, 0.0),
    ])
}

/// Turn 90° and keep the new orientation.
pub fn turn_and_keep() -> OrientationPath {
    OrientationPath::yaw(&[(0.0, 0.0), (0.5, 0.0), (1.0, 90.0), (5.0, 90.0)])
}

/// Turn 90° and back, but too slowly to fit in the retention window.
pub fn slow_round_trip() -> OrientationPath {
    OrientationPath::yaw(&[(0.0, 0.0), (4.0, 90.0), (8.0, 0.0)])
}

/// Small wobble while the child draws.
pub fn handling_jitter() -> OrientationPath {
    OrientationPath::new(vec![
        Keyframe::new(0.0, 0.0, 0.0),
        Keyframe::new(0.7, 8.0, -3.0),
        Keyframe::new(1.3, -6.0, 4.0),
        Keyframe::new(2.0, 5.0, 6.0),
        Keyframe::new(2.8, -4.0, -5.0),
        Keyframe::new(3.5, 7.0, 2.0),
        Keyframe::new(4.2, 0.0, 0.0),
    ])
}
