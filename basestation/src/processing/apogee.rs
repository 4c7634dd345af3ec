//! Running apogee tracker.

/// Highest altitude seen so far and when it was first reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Apogee {
    pub time_stamp: u32,
    /// Altitude in meters.
    pub altitude: f64,
}

/// Keeps the running maximum of the altitude samples.
#[derive(Debug, Clone, Default)]
pub struct ApogeeCalculator {
    apogee: Option<Apogee>,
}

impl ApogeeCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample. Only a strictly higher altitude replaces the apogee,
    /// so ties keep the earliest time stamp.
    pub fn update(&mut self, time_stamp: u32, altitude: f64) {
        let is_higher = match self.apogee {
            Some(current) => altitude > current.altitude,
            None => true,
        };
        if is_higher {
            self.apogee = Some(Apogee {
                time_stamp,
                altitude,
            });
        }
    }

    pub fn apogee(&self) -> Option<Apogee> {
        self.apogee
    }
}
