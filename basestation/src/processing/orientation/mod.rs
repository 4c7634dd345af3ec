//! Rocket attitude estimation.
//!
//! While the rocket rests on the pad the attitude is taken from gravity and
//! the magnetic field. After the initialization window the gyroscope alone
//! drives it.

mod initializer;
mod integrator;
mod quaternion;

pub use initializer::{reference_orientation, OrientationInitializer};
pub use integrator::AngularSpeedIntegrator;
pub use quaternion::Quaternion;

use crate::packet::Packet;

/// Owns the current orientation and chooses how each packet updates it.
#[derive(Debug, Clone)]
pub struct OrientationProcessor {
    initializer: OrientationInitializer,
    integrator: AngularSpeedIntegrator,
    orientation: Quaternion,
}

impl OrientationProcessor {
    pub fn new(initializer: OrientationInitializer, integrator: AngularSpeedIntegrator) -> Self {
        Self {
            initializer,
            integrator,
            orientation: Quaternion::IDENTITY,
        }
    }

    pub fn update(&mut self, packet: &Packet) -> Quaternion {
        let acceleration = [
            f64::from(packet.acceleration_x),
            f64::from(packet.acceleration_y),
            f64::from(packet.acceleration_z),
        ];
        let magnetometer = [
            f64::from(packet.magnetometer_x),
            f64::from(packet.magnetometer_y),
            f64::from(packet.magnetometer_z),
        ];

        self.orientation = match self.initializer.observe(acceleration, magnetometer) {
            Some(reference) => reference,
            None => {
                let angular_speed = [
                    f64::from(packet.angular_speed_x),
                    f64::from(packet.angular_speed_y),
                    f64::from(packet.angular_speed_z),
                ];
                self.integrator.integrate(self.orientation, angular_speed)
            }
        };
        self.orientation
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    pub fn is_initialized(&self) -> bool {
        self.initializer.is_complete()
    }
}
