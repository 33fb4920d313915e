use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DashboardSettings;
use crate::environment::gravity::GravityTable;
use crate::errors::SimulationError;
use crate::transport::client::TrajectoryClient;
use crate::transport::contract::DashboardResponse;
use crate::visualization::chart;

use super::error::DashboardError;

pub struct DashboardState {
    client: TrajectoryClient,
    fallback: Arc<GravityTable>,
}

impl DashboardState {
    pub fn new(client: TrajectoryClient, fallback: Arc<GravityTable>) -> Self {
        DashboardState { client, fallback }
    }

    /// The simulator's catalog, or the built-in one when the simulator is unreachable.
    pub async fn catalog(&self) -> GravityTable {
        match self.client.fetch_planets().await {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(error = %err, "Planet discovery failed, using built-in table");
                self.fallback.as_ref().clone()
            }
        }
    }

    pub async fn simulate(&self, planet: &str, height: f64) -> Result<DashboardResponse, SimulationError> {
        let trajectory = self.client.request_trajectory(planet, height).await?;
        let gravity = self.catalog().await.lookup(planet).ok_or_else(|| {
            SimulationError::ValidationError(format!("unknown planet: {}", planet))
        })?;

        let chart = chart::prepare(&trajectory, planet, height, gravity);
        tracing::info!(planet = %planet, height, gravity, samples = trajectory.len(), "Chart prepared");

        Ok(DashboardResponse {
            success: true,
            graph: chart.to_plotly(),
            message: format!("Simulation completed for {}", planet),
        })
    }
}

/// Form input is looser than the simulator contract: height may arrive as a string.
pub fn parse_user_input(body: &[u8]) -> Result<(String, f64), SimulationError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| {
        SimulationError::ValidationError("no JSON data provided".to_string())
    })?;
    let fields = value.as_object().ok_or_else(|| {
        SimulationError::ValidationError("no JSON data provided".to_string())
    })?;

    let height = match fields.get("height") {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|height| height.is_finite())
    .ok_or_else(|| {
        SimulationError::ValidationError("Please enter a valid number for height".to_string())
    })?;
    if height <= 0.0 {
        return Err(SimulationError::ValidationError(
            "Height must be greater than 0".to_string(),
        ));
    }

    let planet = fields
        .get("planet")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SimulationError::ValidationError("planet is required".to_string()))?;

    Ok((planet, height))
}

pub fn create_router(state: Arc<DashboardState>, settings: &DashboardSettings) -> Router {
    Router::new()
        .route(&settings.user_input_endpoint, post(simulate))
        .route(&settings.planets_endpoint, get(planets))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn simulate(
    State(state): State<Arc<DashboardState>>,
    body: Bytes,
) -> Result<Json<DashboardResponse>, DashboardError> {
    let (planet, height) = parse_user_input(&body).map_err(|err| {
        tracing::warn!(error = %err, "Rejected dashboard input");
        err
    })?;

    let response = state.simulate(&planet, height).await.map_err(|err| {
        if err.is_caller_error() {
            tracing::warn!(planet = %planet, height, error = %err, "Simulation rejected");
        } else {
            tracing::error!(planet = %planet, height, error = %err, "Dashboard simulation failed");
        }
        err
    })?;
    Ok(Json(response))
}

async fn planets(State(state): State<Arc<DashboardState>>) -> Json<GravityTable> {
    Json(state.catalog().await)
}

async fn health_check() -> &'static str {
    "OK"
}
