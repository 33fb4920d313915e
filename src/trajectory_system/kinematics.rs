use serde::{Deserialize, Serialize};

use crate::constants::{
    CONTACT_TIME_TOLERANCE, MAX_GROUND_CONTACTS, RESTITUTION, REST_SPEED, SAMPLE_INTERVAL,
    STOP_TIME,
};
use crate::errors::SimulationError;

use super::trajectory::{Trajectory, TrajectorySample};

const MAX_GRID_SAMPLES: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceParameters {
    pub sample_interval: f64, // s
    pub stop_time: f64,       // s
    pub restitution: f64,
    pub rest_speed: f64, // m/s
    pub max_contacts: usize,
}

impl Default for BounceParameters {
    fn default() -> Self {
        BounceParameters {
            sample_interval: SAMPLE_INTERVAL,
            stop_time: STOP_TIME,
            restitution: RESTITUTION,
            rest_speed: REST_SPEED,
            max_contacts: MAX_GROUND_CONTACTS,
        }
    }
}

impl BounceParameters {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.sample_interval.is_finite() || self.sample_interval <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "sample_interval must be positive, got {}",
                self.sample_interval
            )));
        }
        if !self.stop_time.is_finite() || self.stop_time < self.sample_interval {
            return Err(SimulationError::ConfigurationError(format!(
                "stop_time must be at least one sample_interval, got {}",
                self.stop_time
            )));
        }
        if self.stop_time / self.sample_interval > MAX_GRID_SAMPLES {
            return Err(SimulationError::ConfigurationError(format!(
                "stop_time / sample_interval exceeds {} samples",
                MAX_GRID_SAMPLES
            )));
        }
        if !(self.restitution > 0.0 && self.restitution <= 1.0) {
            return Err(SimulationError::ConfigurationError(format!(
                "restitution must be in (0, 1], got {}",
                self.restitution
            )));
        }
        if !self.rest_speed.is_finite() || self.rest_speed <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "rest_speed must be positive, got {}",
                self.rest_speed
            )));
        }
        if self.max_contacts == 0 {
            return Err(SimulationError::ConfigurationError(
                "max_contacts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn grid_steps(&self) -> usize {
        (self.stop_time / self.sample_interval + CONTACT_TIME_TOLERANCE).floor() as usize
    }
}

/// Ballistic motion between two ground contacts, evaluated in closed form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeFallSegment {
    pub start_time: f64,
    pub start_height: f64,
    pub start_velocity: f64,
    pub gravity: f64,
}

impl FreeFallSegment {
    pub fn new(start_time: f64, start_height: f64, start_velocity: f64, gravity: f64) -> Self {
        FreeFallSegment {
            start_time,
            start_height,
            start_velocity,
            gravity,
        }
    }

    pub fn height_at(&self, time: f64) -> f64 {
        let tau = time - self.start_time;
        self.start_height + self.start_velocity * tau - 0.5 * self.gravity * tau * tau
    }

    pub fn velocity_at(&self, time: f64) -> f64 {
        self.start_velocity - self.gravity * (time - self.start_time)
    }

    /// Duration until `h = 0`: the positive root of `h0 + v0·τ − ½gτ² = 0`.
    pub fn time_to_ground(&self) -> f64 {
        let v0 = self.start_velocity;
        let discriminant = v0 * v0 + 2.0 * self.gravity * self.start_height.max(0.0);
        (v0 + discriminant.sqrt()) / self.gravity
    }

    pub fn contact_time(&self) -> f64 {
        self.start_time + self.time_to_ground()
    }
}

/// One impact with the ground. `rebound_velocity` is 0 on the contact that
/// puts the ball to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    pub time: f64,
    pub impact_velocity: f64,
    pub rebound_velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Flight(FreeFallSegment),
    Resting { since: f64 },
}

impl Phase {
    fn start_time(&self) -> f64 {
        match self {
            Phase::Flight(segment) => segment.start_time,
            Phase::Resting { since } => *since,
        }
    }

    fn sample_at(&self, time: f64) -> TrajectorySample {
        match self {
            Phase::Flight(segment) => TrajectorySample::new(
                time,
                segment.height_at(time).max(0.0),
                segment.velocity_at(time),
            ),
            Phase::Resting { .. } => TrajectorySample::new(time, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub trajectory: Trajectory,
    pub contacts: Vec<GroundContact>,
    /// Time the ball stopped bouncing, if it did so inside the window.
    pub rest_time: Option<f64>,
}

impl SimulationResult {
    pub fn first_contact(&self) -> Option<&GroundContact> {
        self.contacts.first()
    }
}

/// Drops a point mass and bounces it off `h = 0` until `stop_time`.
///
/// Pure: the output depends only on the parameters and the two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BounceSimulator {
    params: BounceParameters,
}

impl BounceSimulator {
    pub fn new(params: BounceParameters) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(BounceSimulator { params })
    }

    pub fn simulate(
        &self,
        initial_height: f64,
        gravity: f64,
    ) -> Result<SimulationResult, SimulationError> {
        if !initial_height.is_finite() || initial_height <= 0.0 {
            return Err(SimulationError::ValidationError(
                "height must be positive".to_string(),
            ));
        }
        if !gravity.is_finite() || gravity <= 0.0 {
            return Err(SimulationError::ValidationError(
                "gravity must be positive".to_string(),
            ));
        }

        let (phases, contacts, rest_time) = self.plan(initial_height, gravity);
        let samples = self.sample(&phases, &contacts);
        let trajectory = Trajectory::new(samples).map_err(|e| {
            SimulationError::EngineError(format!("integration produced {}", e.detail()))
        })?;

        Ok(SimulationResult {
            trajectory,
            contacts,
            rest_time,
        })
    }

    fn plan(&self, initial_height: f64, gravity: f64) -> (Vec<Phase>, Vec<GroundContact>, Option<f64>) {
        let params = &self.params;
        let mut phases = Vec::new();
        let mut contacts: Vec<GroundContact> = Vec::new();
        let mut segment = FreeFallSegment::new(0.0, initial_height, 0.0, gravity);

        loop {
            phases.push(Phase::Flight(segment));

            let contact_time = segment.contact_time();
            if contact_time >= params.stop_time {
                return (phases, contacts, None);
            }

            let impact_velocity = segment.velocity_at(contact_time);
            let rebound_velocity = -params.restitution * impact_velocity;

            if rebound_velocity.abs() < params.rest_speed || contacts.len() + 1 >= params.max_contacts {
                contacts.push(GroundContact {
                    time: contact_time,
                    impact_velocity,
                    rebound_velocity: 0.0,
                });
                phases.push(Phase::Resting {
                    since: contact_time,
                });
                return (phases, contacts, Some(contact_time));
            }

            contacts.push(GroundContact {
                time: contact_time,
                impact_velocity,
                rebound_velocity,
            });

            segment = FreeFallSegment::new(contact_time, 0.0, rebound_velocity, gravity);
        }
    }

    // Uniform grid merged with exact contact samples; a grid point that
    // coincides with a contact is replaced by it.
    fn sample(&self, phases: &[Phase], contacts: &[GroundContact]) -> Vec<TrajectorySample> {
        let steps = self.params.grid_steps();
        let mut samples = Vec::with_capacity(steps + 1 + contacts.len());
        let mut phase_index = 0;
        let mut contact_index = 0;

        for step in 0..=steps {
            let time = step as f64 * self.params.sample_interval;

            while contact_index < contacts.len()
                && contacts[contact_index].time < time - CONTACT_TIME_TOLERANCE
            {
                samples.push(contact_sample(&contacts[contact_index]));
                contact_index += 1;
            }

            // The release sample at t = 0 is never replaced
            if step > 0
                && contact_index < contacts.len()
                && (contacts[contact_index].time - time).abs() <= CONTACT_TIME_TOLERANCE
            {
                samples.push(contact_sample(&contacts[contact_index]));
                contact_index += 1;
                continue;
            }

            while phase_index + 1 < phases.len() && phases[phase_index + 1].start_time() <= time {
                phase_index += 1;
            }
            samples.push(phases[phase_index].sample_at(time));
        }

        // Contacts between the last grid point and stop_time
        for contact in &contacts[contact_index..] {
            samples.push(contact_sample(contact));
        }

        samples
    }
}

fn contact_sample(contact: &GroundContact) -> TrajectorySample {
    TrajectorySample::new(contact.time, 0.0, contact.impact_velocity)
}
