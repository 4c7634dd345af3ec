use super::quaternion::Quaternion;

/// Estimates the resting attitude from gravity and the magnetic field.
///
/// For the first samples of a flight the rocket sits on the pad. The mean
/// acceleration gives roll and pitch, and the tilt-compensated mean
/// magnetometer reading gives yaw.
#[derive(Debug, Clone)]
pub struct OrientationInitializer {
    required_samples: usize,
    sample_count: usize,
    acceleration_sum: [f64; 3],
    magnetometer_sum: [f64; 3],
}

impl OrientationInitializer {
    pub fn new(required_samples: usize) -> Self {
        Self {
            required_samples,
            sample_count: 0,
            acceleration_sum: [0.0; 3],
            magnetometer_sum: [0.0; 3],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.sample_count >= self.required_samples
    }

    /// Feed one resting sample and return the reference orientation from
    /// the means so far. Returns `None` once the window is over.
    pub fn observe(
        &mut self,
        acceleration: [f64; 3],
        magnetometer: [f64; 3],
    ) -> Option<Quaternion> {
        if self.is_complete() {
            return None;
        }

        for axis in 0..3 {
            self.acceleration_sum[axis] += acceleration[axis];
            self.magnetometer_sum[axis] += magnetometer[axis];
        }
        self.sample_count += 1;

        let count = self.sample_count as f64;
        Some(reference_orientation(
            self.acceleration_sum.map(|sum| sum / count),
            self.magnetometer_sum.map(|sum| sum / count),
        ))
    }
}

/// Attitude of a body at rest measuring `acceleration` (g) and
/// `magnetometer` (any unit).
pub fn reference_orientation(acceleration: [f64; 3], magnetometer: [f64; 3]) -> Quaternion {
    let [ax, ay, az] = acceleration;
    if ax == 0.0 && ay == 0.0 && az == 0.0 {
        return Quaternion::IDENTITY;
    }

    let roll = ay.atan2(az);
    let pitch = (-ax).atan2((ay * ay + az * az).sqrt());

    let [mx, my, mz] = magnetometer;
    let (sin_roll, cos_roll) = roll.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    let heading_x = mx * cos_pitch + my * sin_roll * sin_pitch + mz * cos_roll * sin_pitch;
    let heading_y = my * cos_roll - mz * sin_roll;
    let yaw = (-heading_y).atan2(heading_x);

    Quaternion::from_euler(roll, pitch, yaw)
}
