use crate::constants::QUATERNION_EPSILON;
use crate::sensor::RotationReading;

/// Unit quaternion in (w, x, y, z) form, `w` being the scalar part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub xyz: [f64; 3],
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, xyz: [x, y, z] }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians about `axis` (need not be normalized).
    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        let norm = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if norm < QUATERNION_EPSILON {
            return Self::identity();
        }
        let (s, c) = (angle / 2.0).sin_cos();
        Self::new(c, axis[0] / norm * s, axis[1] / norm * s, axis[2] / norm * s)
    }

    pub fn from_reading(reading: &RotationReading) -> Self {
        Self::new(reading.scalar(), reading.x, reading.y, reading.z)
    }

    /// Rotation-vector reading carrying the explicit scalar part.
    pub fn to_reading(&self) -> RotationReading {
        RotationReading::with_scalar(self.xyz[0], self.xyz[1], self.xyz[2], self.w)
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.xyz.iter().map(|v| v * v).sum::<f64>()).sqrt()
    }

    pub fn normalize(&mut self) {
        let len = self.norm();
        if len > QUATERNION_EPSILON {
            self.w /= len;
            self.xyz.iter_mut().for_each(|v| *v /= len);
        }
    }

    /// Hamilton product: `self * other` applies `other` first, then `self`.
    pub fn multiply(&self, other: &Quaternion) -> Quaternion {
        let [x1, y1, z1] = self.xyz;
        let [x2, y2, z2] = other.xyz;
        Quaternion {
            w: self.w * other.w - x1 * x2 - y1 * y2 - z1 * z2,
            xyz: [
                self.w * x2 + x1 * other.w + y1 * z2 - z1 * y2,
                self.w * y2 - x1 * z2 + y1 * other.w + z1 * x2,
                self.w * z2 + x1 * y2 - y1 * x2 + z1 * other.w,
            ],
        }
    }
}
