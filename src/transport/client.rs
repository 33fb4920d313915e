use std::time::Duration;

use reqwest::StatusCode;

use crate::config::SimulationRequestSettings;
use crate::environment::gravity::GravityTable;
use crate::errors::SimulationError;
use crate::trajectory_system::trajectory::Trajectory;

use super::contract::{decode_trajectory, ErrorBody, SimulationRequest};

/// Calls the simulator service. Every call is bounded by `timeout` and never retried.
#[derive(Debug, Clone)]
pub struct TrajectoryClient {
    http: reqwest::Client,
    base_url: String,
    simulate_endpoint: String,
    planets_endpoint: String,
    timeout: Duration,
}

impl TrajectoryClient {
    pub fn new(
        base_url: impl Into<String>,
        simulate_endpoint: impl Into<String>,
        planets_endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SimulationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SimulationError::ConfigurationError(format!("HTTP client: {}", e)))?;

        Ok(TrajectoryClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            simulate_endpoint: simulate_endpoint.into(),
            planets_endpoint: planets_endpoint.into(),
            timeout,
        })
    }

    pub fn from_settings(settings: &SimulationRequestSettings) -> Result<Self, SimulationError> {
        TrajectoryClient::new(
            settings.base_url(),
            settings.endpoint.clone(),
            settings.planets_endpoint.clone(),
            settings.timeout(),
        )
    }

    pub fn simulate_url(&self) -> String {
        format!("{}{}", self.base_url, self.simulate_endpoint)
    }

    pub fn planets_url(&self) -> String {
        format!("{}{}", self.base_url, self.planets_endpoint)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn request_trajectory(
        &self,
        planet: &str,
        height: f64,
    ) -> Result<Trajectory, SimulationError> {
        let url = self.simulate_url();
        let request = SimulationRequest::new(planet, height);
        tracing::debug!(url = %url, planet = %planet, height, "Requesting trajectory");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let err = remote_error(status, &body);
            tracing::warn!(url = %url, status = status.as_u16(), error = %err, "Simulation request failed");
            return Err(err);
        }

        decode_trajectory(&body).map_err(|err| {
            tracing::warn!(url = %url, error = %err, "Simulator returned an unusable trajectory");
            err
        })
    }

    pub async fn fetch_planets(&self) -> Result<GravityTable, SimulationError> {
        let url = self.planets_url();
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str::<GravityTable>(&body).map_err(|e| {
            SimulationError::TransportError(format!("malformed planet catalog: {}", e))
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> SimulationError {
        if err.is_timeout() {
            SimulationError::TransportError(format!(
                "request timed out after {:.1}s",
                self.timeout.as_secs_f64()
            ))
        } else if err.is_connect() {
            SimulationError::TransportError(format!("could not connect to simulator: {}", err))
        } else {
            SimulationError::TransportError(err.to_string())
        }
    }
}

// 4xx is the caller's fault and keeps the remote message; anything else is a transport fault.
fn remote_error(status: StatusCode, body: &str) -> SimulationError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    if status.is_client_error() {
        SimulationError::RemoteValidationError(message)
    } else {
        SimulationError::TransportError(format!("{} {}", status.as_u16(), message))
    }
}
