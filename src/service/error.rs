use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::SimulationError;
use crate::transport::contract::ErrorBody;

/// Simulator-side mapping: validation is 400 with the reason, anything else is
/// a generic 500 and the cause stays in the server log.
#[derive(Debug)]
pub struct SimulatorError(pub SimulationError);

impl From<SimulationError> for SimulatorError {
    fn from(err: SimulationError) -> Self {
        SimulatorError(err)
    }
}

impl IntoResponse for SimulatorError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SimulationError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => {
                tracing::error!(error = %other, "Simulation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "simulation failed".to_string(),
                )
            }
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Dashboard-side mapping, always a single-sentence JSON error.
#[derive(Debug)]
pub struct DashboardError(pub SimulationError);

impl From<SimulationError> for DashboardError {
    fn from(err: SimulationError) -> Self {
        DashboardError(err)
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SimulationError::ValidationError(msg) | SimulationError::RemoteValidationError(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            SimulationError::TransportError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Simulation server error: {}", msg),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred: {}", other.detail()),
            ),
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}
