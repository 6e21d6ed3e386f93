pub mod quaternion;
pub mod rotation;

use std::fmt;

pub use quaternion::Quaternion;
pub use rotation::{
    Axis, Matrix3, OrientationConverter, orientation_from_matrix, remap_coordinate_system,
    rotation_matrix, rotation_matrix_from_reading,
};

/// Device orientation as azimuth, pitch and roll in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub azimuth: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Orientation {
    pub fn new(azimuth: f64, pitch: f64, roll: f64) -> Self {
        Self {
            azimuth,
            pitch,
            roll,
        }
    }

    /// Euclidean distance treating the three angles as a flat space.
    ///
    /// Angle wraparound is not corrected: +179° and -179° azimuth are about
    /// 358° apart by this measure.
    pub fn distance(&self, other: &Orientation) -> f64 {
        let da = self.azimuth - other.azimuth;
        let dp = self.pitch - other.pitch;
        let dr = self.roll - other.roll;
        (da * da + dp * dp + dr * dr).sqrt()
    }

    pub fn to_degrees(&self) -> [f64; 3] {
        [
            self.azimuth.to_degrees(),
            self.pitch.to_degrees(),
            self.roll.to_degrees(),
        ]
    }
}

impl From<[f64; 3]> for Orientation {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Orientation {
    /// Whole degrees, e.g. `[12, -3, 0]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, p, r] = self.to_degrees();
        write!(f, "[{:.0}, {:.0}, {:.0}]", a, p, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Orientation::new(0.0, 0.0, 0.0);
        let b = Orientation::new(0.3, 0.4, 0.0);
        assert_relative_eq!(a.distance(&b), 0.5, epsilon = 1e-12);
        assert_relative_eq!(b.distance(&a), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_does_not_wrap() {
        let a = Orientation::new(179f64.to_radians(), 0.0, 0.0);
        let b = Orientation::new(-179f64.to_radians(), 0.0, 0.0);
        assert_relative_eq!(a.distance(&b).to_degrees(), 358.0, epsilon = 1e-9);
    }

    #[test]
    fn test_display_in_degrees() {
        let o = Orientation::new(std::f64::consts::FRAC_PI_2, 0.0, -0.1);
        assert_eq!(o.to_string(), "[90, 0, -6]");
    }
}
