//! Rotation vector to orientation angles
//!
//! The conversion mirrors the usual mobile sensor pipeline:
//!
//! 1. the rotation-vector quaternion is expanded into a 3x3 rotation matrix
//!    (device frame to world frame, row-major),
//! 2. the matrix is remapped so that the device axes line up with the drawing
//!    surface (by default device X stays X and device Z becomes Y, i.e. the
//!    device is held upright),
//! 3. azimuth, pitch and roll are extracted from the remapped matrix.

use std::fmt;
use std::str::FromStr;

use super::{Orientation, Quaternion};
use crate::error::{GestureError, Result};
use crate::sensor::RotationReading;

/// Row-major 3x3 rotation matrix
pub type Matrix3 = [[f64; 3]; 3];

/// Signed device axis used to remap a rotation matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum Axis {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "z")]
    Z,
    #[serde(rename = "-x")]
    MinusX,
    #[serde(rename = "-y")]
    MinusY,
    #[serde(rename = "-z")]
    MinusZ,
}

impl Axis {
    fn index(&self) -> usize {
        match self {
            Self::X | Self::MinusX => 0,
            Self::Y | Self::MinusY => 1,
            Self::Z | Self::MinusZ => 2,
        }
    }

    fn is_negative(&self) -> bool {
        matches!(self, Self::MinusX | Self::MinusY | Self::MinusZ)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::MinusX => "-x",
            Self::MinusY => "-y",
            Self::MinusZ => "-z",
        };
        f.write_str(name)
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            "-x" => Ok(Self::MinusX),
            "-y" => Ok(Self::MinusY),
            "-z" => Ok(Self::MinusZ),
            _ => Err(format!("invalid axis: {}", s)),
        }
    }
}

/// Rotation matrix from a unit quaternion.
pub fn rotation_matrix(q: &Quaternion) -> Matrix3 {
    let [q1, q2, q3] = q.xyz;
    let q0 = q.w;

    let sq_q1 = 2.0 * q1 * q1;
    let sq_q2 = 2.0 * q2 * q2;
    let sq_q3 = 2.0 * q3 * q3;
    let q1_q2 = 2.0 * q1 * q2;
    let q3_q0 = 2.0 * q3 * q0;
    let q1_q3 = 2.0 * q1 * q3;
    let q2_q0 = 2.0 * q2 * q0;
    let q2_q3 = 2.0 * q2 * q3;
    let q1_q0 = 2.0 * q1 * q0;

    [
        [1.0 - sq_q2 - sq_q3, q1_q2 - q3_q0, q1_q3 + q2_q0],
        [q1_q2 + q3_q0, 1.0 - sq_q1 - sq_q3, q2_q3 - q1_q0],
        [q1_q3 - q2_q0, q2_q3 + q1_q0, 1.0 - sq_q1 - sq_q2],
    ]
}

/// Rotation matrix straight from a sensor reading.
pub fn rotation_matrix_from_reading(reading: &RotationReading) -> Matrix3 {
    rotation_matrix(&Quaternion::from_reading(reading))
}

/// Express `matrix` in a coordinate system whose X and Y axes are the given
/// device axes. The third axis completes a right-handed frame.
pub fn remap_coordinate_system(matrix: &Matrix3, x: Axis, y: Axis) -> Result<Matrix3> {
    let (xi, yi) = (x.index(), y.index());
    if xi == yi {
        return Err(GestureError::InvalidRemap {
            x: x.to_string(),
            y: y.to_string(),
        });
    }
    let zi = 3 - xi - yi;

    // A non-cyclic axis order flips handedness, which the Z sign compensates
    let cyclic = xi == (zi + 1) % 3 && yi == (zi + 2) % 3;
    let (sx, sy) = (x.is_negative(), y.is_negative());
    let sz = sx ^ sy ^ !cyclic;

    let signed = |value: f64, negative: bool| if negative { -value } else { value };

    let mut out = [[0.0; 3]; 3];
    for (row_out, row_in) in out.iter_mut().zip(matrix.iter()) {
        row_out[xi] = signed(row_in[0], sx);
        row_out[yi] = signed(row_in[1], sy);
        row_out[zi] = signed(row_in[2], sz);
    }
    Ok(out)
}

/// Azimuth, pitch and roll (radians) of a rotation matrix.
pub fn orientation_from_matrix(m: &Matrix3) -> Orientation {
    Orientation::new(
        m[0][1].atan2(m[1][1]),
        (-m[2][1]).clamp(-1.0, 1.0).asin(),
        (-m[2][0]).atan2(m[2][2]),
    )
}

/// Converts raw rotation-vector readings into orientation angles
#[derive(Debug, Clone, Copy)]
pub struct OrientationConverter {
    remap_x: Axis,
    remap_y: Axis,
}

impl OrientationConverter {
    pub fn new(remap_x: Axis, remap_y: Axis) -> Result<Self> {
        if remap_x.index() == remap_y.index() {
            return Err(GestureError::InvalidRemap {
                x: remap_x.to_string(),
                y: remap_y.to_string(),
            });
        }
        Ok(Self { remap_x, remap_y })
    }

    pub fn convert(&self, reading: &RotationReading) -> Orientation {
        let matrix = rotation_matrix_from_reading(reading);
        // Axes were validated on construction
        let remapped = remap_coordinate_system(&matrix, self.remap_x, self.remap_y)
            .unwrap_or(matrix);
        orientation_from_matrix(&remapped)
    }
}

impl Default for OrientationConverter {
    fn default() -> Self {
        Self {
            remap_x: Axis::X,
            remap_y: Axis::Z,
        }
    }
}
