use std::ops::Mul;

/// Rotation quaternion `w + xi + yj + zk`.
///
/// Orientation quaternions rotate body-frame vectors into the launch frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Build from roll, pitch and yaw in radians, applied in Z-Y-X order.
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sr, cr) = (roll / 2.0).sin_cos();
        let (sp, cp) = (pitch / 2.0).sin_cos();
        let (sy, cy) = (yaw / 2.0).sin_cos();

        Self {
            w: cy * cp * cr + sy * sp * sr,
            x: cy * cp * sr - sy * sp * cr,
            y: sy * cp * sr + cy * sp * cr,
            z: sy * cp * cr - cy * sp * sr,
        }
    }

    /// Rotation of `|v|` radians about the axis `v`, i.e. `exp(v / 2)`.
    pub fn from_rotation_vector(v: [f64; 3]) -> Self {
        let angle = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if angle == 0.0 {
            return Self::IDENTITY;
        }
        let (sin_half, cos_half) = (angle / 2.0).sin_cos();
        let scale = sin_half / angle;
        Self {
            w: cos_half,
            x: v[0] * scale,
            y: v[1] * scale,
            z: v[2] * scale,
        }
    }

    /// Roll, pitch and yaw in radians.
    pub fn to_euler(&self) -> (f64, f64, f64) {
        let Self { w, x, y, z } = *self;
        let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
        let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));
        (roll, pitch, yaw)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit quaternion in the same direction. A zero quaternion becomes the
    /// identity.
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Self::IDENTITY;
        }
        Self::new(self.w / norm, self.x / norm, self.y / norm, self.z / norm)
    }

    /// Rotate a vector by this (unit) quaternion.
    pub fn rotate(&self, v: [f64; 3]) -> [f64; 3] {
        let rotated = *self * Self::new(0.0, v[0], v[1], v[2]) * self.conjugate();
        [rotated.x, rotated.y, rotated.z]
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.w - other.w).abs() < epsilon
            && (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

/// Hamilton product, `self ⊗ other`. Order matters.
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, other: Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }
}
