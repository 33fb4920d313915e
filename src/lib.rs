pub mod config;
pub mod constants;
pub mod environment;
pub mod errors;
pub mod service;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod transport;
pub mod visualization;

pub use constants::*;
pub use environment::gravity::{GravityTable, Planet};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::kinematics::{
    BounceParameters, BounceSimulator, FreeFallSegment, GroundContact, SimulationResult,
};
pub use trajectory_system::trajectory::{Trajectory, TrajectorySample};

// Re-export the wire contract and its client
pub use transport::client::TrajectoryClient;
pub use transport::contract::{decode_trajectory, encode_trajectory, SimulationRequest};

pub use telemetry_system::telemetry::FlightSummary;
pub use visualization::chart::{prepare, ChartSpec};
