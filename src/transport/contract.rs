//! Wire formats shared by the simulator, the dashboard and the trajectory client.
//!
//! Requests are JSON, successful simulations come back as CSV with a
//! `time,h,v` header, and every failure is a JSON `{"error": ...}` body.

use serde::{Deserialize, Serialize};

use crate::errors::SimulationError;
use crate::trajectory_system::trajectory::{Trajectory, TrajectorySample};

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const TRAJECTORY_COLUMNS: [&str; 3] = ["time", "h", "v"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub planet: String,
    #[serde(rename = "height")]
    pub initial_height: f64,
}

impl SimulationRequest {
    pub fn new(planet: impl Into<String>, initial_height: f64) -> Self {
        SimulationRequest {
            planet: planet.into(),
            initial_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorBody {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub graph: serde_json::Value,
    pub message: String,
}

pub fn encode_trajectory(trajectory: &Trajectory) -> Result<String, SimulationError> {
    let mut writer = csv::Writer::from_writer(Vec::with_capacity(trajectory.len() * 32));
    for sample in trajectory.samples() {
        writer
            .serialize(sample)
            .map_err(|e| SimulationError::EngineError(format!("failed to write CSV: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SimulationError::EngineError(format!("failed to flush CSV: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| SimulationError::EngineError(format!("CSV is not UTF-8: {}", e)))
}

/// Parses a CSV trajectory and checks its structure. Any defect is reported as
/// a `TransportError` starting with "malformed trajectory".
pub fn decode_trajectory(body: &str) -> Result<Trajectory, SimulationError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader.headers().map_err(malformed)?.clone();
    for column in TRAJECTORY_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(malformed(format!("missing column {}", column)));
        }
    }

    let samples = reader
        .deserialize::<TrajectorySample>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(malformed)?;

    Trajectory::new(samples).map_err(|e| malformed(e.detail()))
}

fn malformed(cause: impl std::fmt::Display) -> SimulationError {
    SimulationError::TransportError(format!("malformed trajectory: {}", cause))
}
