use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SimulatorSettings;
use crate::constants::{DEFAULT_DROP_HEIGHT, DEFAULT_PLANET};
use crate::environment::gravity::GravityTable;
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::FlightSummary;
use crate::trajectory_system::kinematics::{BounceSimulator, SimulationResult};
use crate::transport::contract::{encode_trajectory, SimulationRequest, CSV_CONTENT_TYPE};

/// Validates simulation requests and runs the engine for the valid ones.
#[derive(Debug)]
pub struct SimulationHandler {
    table: Arc<GravityTable>,
    simulator: BounceSimulator,
    runs: AtomicUsize,
}

impl SimulationHandler {
    pub fn new(table: Arc<GravityTable>, simulator: BounceSimulator) -> Self {
        SimulationHandler {
            table,
            simulator,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn table(&self) -> &GravityTable {
        &self.table
    }

    /// Number of requests that reached the engine.
    pub fn simulations_run(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn handle(&self, body: &[u8]) -> Result<SimulationResult, SimulationError> {
        let request = parse_request(body).map_err(|err| {
            tracing::warn!(error = %err, "Rejected simulation request");
            err
        })?;
        self.run(&request)
    }

    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
        let height = request.initial_height;
        if !height.is_finite() || height <= 0.0 {
            tracing::warn!(planet = %request.planet, height, "Rejected non-positive height");
            return Err(SimulationError::ValidationError(
                "height must be positive".to_string(),
            ));
        }

        let gravity = self.table.lookup(&request.planet).ok_or_else(|| {
            tracing::warn!(planet = %request.planet, "Rejected unknown planet");
            SimulationError::ValidationError(format!("unknown planet: {}", request.planet))
        })?;

        tracing::info!(
            planet = %request.planet,
            height,
            gravity,
            "Running simulation"
        );
        self.runs.fetch_add(1, Ordering::Relaxed);

        let result = self.simulator.simulate(height, gravity).map_err(|err| match err {
            SimulationError::EngineError(_) => err,
            other => SimulationError::EngineError(other.detail().to_string()),
        })?;

        FlightSummary::from_result(&result).log(&request.planet);
        Ok(result)
    }
}

// Missing keys take the service defaults; present ones must be well-typed.
// Height is checked before the planet so a bad height never reaches the table.
fn parse_request(body: &[u8]) -> Result<SimulationRequest, SimulationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SimulationError::ValidationError(
            "no JSON data provided".to_string(),
        ));
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| {
        SimulationError::ValidationError("malformed request body".to_string())
    })?;
    let fields = match value {
        Value::Null => {
            return Err(SimulationError::ValidationError(
                "no JSON data provided".to_string(),
            ))
        }
        Value::Object(fields) if fields.is_empty() => {
            return Err(SimulationError::ValidationError(
                "no JSON data provided".to_string(),
            ))
        }
        Value::Object(fields) => fields,
        _ => {
            return Err(SimulationError::ValidationError(
                "request body must be a JSON object".to_string(),
            ))
        }
    };

    let initial_height = match fields.get("height") {
        None | Some(Value::Null) => DEFAULT_DROP_HEIGHT,
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(_) => f64::NAN,
    };
    if !initial_height.is_finite() || initial_height <= 0.0 {
        return Err(SimulationError::ValidationError(
            "height must be positive".to_string(),
        ));
    }

    let planet = match fields.get("planet") {
        None | Some(Value::Null) => DEFAULT_PLANET.to_string(),
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(SimulationError::ValidationError(format!(
                "unknown planet: {}",
                other
            )))
        }
    };

    Ok(SimulationRequest {
        planet,
        initial_height,
    })
}

pub fn create_router(handler: Arc<SimulationHandler>, settings: &SimulatorSettings) -> Router {
    Router::new()
        .route(&settings.simulate_endpoint, post(simulate))
        .route(&settings.planets_endpoint, get(list_planets))
        .route("/health", get(health_check))
        .with_state(handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn simulate(
    State(handler): State<Arc<SimulationHandler>>,
    body: Bytes,
) -> Result<Response, super::error::SimulatorError> {
    let result = handler.handle(&body)?;
    let csv = encode_trajectory(&result.trajectory)?;

    Ok(([(header::CONTENT_TYPE, CSV_CONTENT_TYPE)], csv).into_response())
}

async fn list_planets(State(handler): State<Arc<SimulationHandler>>) -> Json<GravityTable> {
    Json(handler.table().clone())
}

async fn health_check() -> &'static str {
    "OK"
}
