use super::quaternion::Quaternion;

/// Integrates gyroscope samples into an orientation.
///
/// Each step applies the rotation accumulated over one sampling period,
/// assuming the angular speed is constant during it, then renormalizes.
#[derive(Debug, Clone, Copy)]
pub struct AngularSpeedIntegrator {
    time_step: f64,
}

impl AngularSpeedIntegrator {
    pub fn new(sampling_frequency: f64) -> Self {
        let time_step = if sampling_frequency > 0.0 {
            1.0 / sampling_frequency
        } else {
            0.0
        };
        Self { time_step }
    }

    /// Seconds between two samples.
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Advance `orientation` by one sample of body angular speed in degrees
    /// per second.
    pub fn integrate(&self, orientation: Quaternion, angular_speed: [f64; 3]) -> Quaternion {
        let rotation = angular_speed.map(|rate| rate.to_radians() * self.time_step);
        (orientation * Quaternion::from_rotation_vector(rotation)).normalized()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The orientation stays a unit quaternion whatever the gyro reads.
        #[test]
        fn integration_keeps_unit_norm(
            sampling_frequency in 0.5f64..1000.0,
            rates in prop::collection::vec(prop::array::uniform3(-2000.0f64..2000.0), 0..500)
        ) {
            let integrator = AngularSpeedIntegrator::new(sampling_frequency);
            let mut q = Quaternion::IDENTITY;

            for rate in rates {
                q = integrator.integrate(q, rate);
                prop_assert!((q.norm() - 1.0).abs() < 1e-9, "norm {}", q.norm());
            }
        }
    }
}
