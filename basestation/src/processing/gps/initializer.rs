//! Base camp resolution.
//!
//! The launch pad position is the mean of the valid fixes received during
//! the first `ceil(delay × frequency)` samples. Until it is known every
//! position is reported as the origin.

use tracing::{info, warn};

use super::utm::PlanarPosition;

/// Projected launch site, the origin of every relative position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseCamp {
    pub easting: f64,
    pub northing: f64,
}

#[derive(Debug, Clone)]
enum State {
    Initializing {
        sample_count: usize,
        eastings: Vec<f64>,
        northings: Vec<f64>,
    },
    Active {
        base_camp: BaseCamp,
    },
}

/// Two-state machine collecting fixes until the base camp is known.
#[derive(Debug, Clone)]
pub struct BaseCampInitializer {
    required_samples: usize,
    state: State,
}

/// Number of samples covered by an initialization window.
pub fn window_samples(delay_seconds: f64, sampling_frequency: f64) -> usize {
    let samples = (delay_seconds * sampling_frequency).ceil();
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

impl BaseCampInitializer {
    pub fn new(delay_seconds: f64, sampling_frequency: f64) -> Self {
        Self::with_window(window_samples(delay_seconds, sampling_frequency))
    }

    pub fn with_window(required_samples: usize) -> Self {
        Self {
            required_samples,
            state: State::Initializing {
                sample_count: 0,
                eastings: Vec::new(),
                northings: Vec::new(),
            },
        }
    }

    pub fn required_samples(&self) -> usize {
        self.required_samples
    }

    pub fn base_camp(&self) -> Option<BaseCamp> {
        match self.state {
            State::Active { base_camp } => Some(base_camp),
            State::Initializing { .. } => None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    /// Feed the next sample, `None` when its fix was invalid.
    ///
    /// Returns the base camp once it is known, including for the sample
    /// that resolved it.
    pub fn observe(&mut self, fix: Option<PlanarPosition>) -> Option<BaseCamp> {
        let (sample_count, eastings, northings) = match &mut self.state {
            State::Active { base_camp } => return Some(*base_camp),
            State::Initializing {
                sample_count,
                eastings,
                northings,
            } => (sample_count, eastings, northings),
        };

        if *sample_count < self.required_samples {
            if let Some(position) = fix {
                eastings.push(position.easting);
                northings.push(position.northing);
            }
            *sample_count += 1;
            return None;
        }

        if eastings.is_empty() {
            match fix {
                Some(position) => {
                    eastings.push(position.easting);
                    northings.push(position.northing);
                }
                None => {
                    if *sample_count == self.required_samples {
                        warn!(
                            samples = *sample_count,
                            "No valid GPS fix during initialization, waiting for the first one"
                        );
                    }
                    *sample_count += 1;
                    return None;
                }
            }
        }

        let base_camp = BaseCamp {
            easting: mean(eastings),
            northing: mean(northings),
        };
        info!(
            easting = base_camp.easting,
            northing = base_camp.northing,
            fixes = eastings.len(),
            "Base camp resolved"
        );
        self.state = State::Active { base_camp };
        Some(base_camp)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
