use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::trajectory_system::kinematics::SimulationResult;

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Key metrics of one drop, logged once the run completes.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSummary {
    pub max_height: f64,
    pub max_speed: f64,
    pub ground_contacts: usize,
    pub first_contact: Option<f64>,
    pub rest_time: Option<f64>,
    pub duration: f64,
    pub samples: usize,
}

impl FlightSummary {
    pub fn from_result(result: &SimulationResult) -> Self {
        let samples = result.trajectory.samples();
        let mut max_height = 0.0f64;
        let mut max_speed = 0.0f64;
        for sample in samples {
            max_height = max_height.max(sample.height);
            max_speed = max_speed.max(sample.velocity.abs());
        }

        FlightSummary {
            max_height,
            max_speed,
            ground_contacts: result.contacts.len(),
            first_contact: result.first_contact().map(|contact| contact.time),
            rest_time: result.rest_time,
            duration: result.trajectory.last().time,
            samples: samples.len(),
        }
    }

    pub fn log(&self, planet: &str) {
        tracing::info!(
            planet = %planet,
            max_height = self.max_height,
            max_speed = self.max_speed,
            ground_contacts = self.ground_contacts,
            first_contact = ?self.first_contact,
            rest_time = ?self.rest_time,
            duration = self.duration,
            samples = self.samples,
            summary = %self.describe(),
            "Simulation completed"
        );
    }

    /// One-line report, e.g. `peak 3.000 m, 41 contacts (first 0.782 s, rest 7.038 s), 1042 samples over 10.000 s`.
    pub fn describe(&self) -> String {
        let mut events = Vec::new();
        if let Some(time) = self.first_contact {
            events.push(format!("first {}", seconds(time)));
        }
        if let Some(time) = self.rest_time {
            events.push(format!("rest {}", seconds(time)));
        }
        let events = if events.is_empty() {
            String::new()
        } else {
            format!(" ({})", events.join(", "))
        };

        format!(
            "peak {:.3} m, {} contacts{}, {} samples over {}",
            self.max_height,
            self.ground_contacts,
            events,
            self.samples,
            seconds(self.duration)
        )
    }
}

fn seconds(time: f64) -> String {
    format!("{:.3} s", time)
}
