use serde::{Deserialize, Serialize};

use crate::errors::SimulationError;

/// One row of the trajectory. Field names follow the `time,h,v` CSV columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    #[serde(rename = "h")]
    pub height: f64,
    #[serde(rename = "v")]
    pub velocity: f64,
}

impl TrajectorySample {
    pub fn new(time: f64, height: f64, velocity: f64) -> Self {
        TrajectorySample {
            time,
            height,
            velocity,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.height.is_finite() && self.velocity.is_finite()
    }
}

/// Non-empty, strictly time-ordered sequence of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub fn new(samples: Vec<TrajectorySample>) -> Result<Self, SimulationError> {
        if samples.is_empty() {
            return Err(SimulationError::ValidationError(
                "trajectory has no samples".to_string(),
            ));
        }
        if let Some(bad) = samples.iter().find(|sample| !sample.is_finite()) {
            return Err(SimulationError::ValidationError(format!(
                "non-finite sample at t={}",
                bad.time
            )));
        }
        if samples[0].time < 0.0 {
            return Err(SimulationError::ValidationError(
                "trajectory starts before t=0".to_string(),
            ));
        }
        if let Some(pair) = samples.windows(2).find(|pair| pair[1].time <= pair[0].time) {
            return Err(SimulationError::ValidationError(format!(
                "time is not strictly increasing at t={}",
                pair[1].time
            )));
        }

        Ok(Trajectory { samples })
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> &TrajectorySample {
        &self.samples[0]
    }

    pub fn last(&self) -> &TrajectorySample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn time_range(&self) -> (f64, f64) {
        (self.first().time, self.last().time)
    }

    pub fn max_height(&self) -> f64 {
        self.samples
            .iter()
            .map(|sample| sample.height)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.time).collect()
    }

    pub fn heights(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.height).collect()
    }
}
