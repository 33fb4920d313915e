use std::path::Path;
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DASHBOARD_PORT, REQUEST_TIMEOUT_SECS, SIMULATOR_PORT};
use crate::errors::SimulationError;
use crate::trajectory_system::kinematics::BounceParameters;

pub const DEFAULT_CONFIG_NAME: &str = "bounce";
pub const CONFIG_PATH_VAR: &str = "BOUNCE_CONFIG";
pub const ENV_PREFIX: &str = "BOUNCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub host: String,
    pub port: u16,
    pub simulate_endpoint: String,
    pub planets_endpoint: String,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        SimulatorSettings {
            host: "0.0.0.0".to_string(),
            port: SIMULATOR_PORT,
            simulate_endpoint: "/simulate".to_string(),
            planets_endpoint: "/planets".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub host: String,
    pub port: u16,
    pub user_input_endpoint: String,
    pub planets_endpoint: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            host: "0.0.0.0".to_string(),
            port: DASHBOARD_PORT,
            user_input_endpoint: "/api/simulate".to_string(),
            planets_endpoint: "/api/planets".to_string(),
        }
    }
}

/// Where the dashboard finds the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRequestSettings {
    pub address: String,
    pub port: u16,
    pub endpoint: String,
    pub planets_endpoint: String,
    pub timeout_secs: u64,
}

impl Default for SimulationRequestSettings {
    fn default() -> Self {
        SimulationRequestSettings {
            address: "http://localhost".to_string(),
            port: SIMULATOR_PORT,
            endpoint: "/simulate".to_string(),
            planets_endpoint: "/planets".to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SimulationRequestSettings {
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.address.trim_end_matches('/'), self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulator: SimulatorSettings,
    pub dashboard: DashboardSettings,
    pub simulation_request: SimulationRequestSettings,
    pub engine: BounceParameters,
}

impl Settings {
    /// Reads `$BOUNCE_CONFIG` (or `bounce.{toml,json,yaml,...}` in the working
    /// directory), then `BOUNCE__SECTION__KEY` environment overrides.
    pub fn load() -> Result<Self, SimulationError> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Settings::load_from(Some(Path::new(&path))),
            Err(_) => Settings::load_from(None),
        }
    }

    /// A missing file means defaults; a present but invalid one is an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SimulationError> {
        let file = match path {
            Some(path) => File::from(path).required(false),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let endpoints = [
            ("simulator.simulate_endpoint", &self.simulator.simulate_endpoint),
            ("simulator.planets_endpoint", &self.simulator.planets_endpoint),
            ("dashboard.user_input_endpoint", &self.dashboard.user_input_endpoint),
            ("dashboard.planets_endpoint", &self.dashboard.planets_endpoint),
            ("simulation_request.endpoint", &self.simulation_request.endpoint),
            (
                "simulation_request.planets_endpoint",
                &self.simulation_request.planets_endpoint,
            ),
        ];
        for (key, endpoint) in endpoints {
            if !endpoint.starts_with('/') {
                return Err(SimulationError::ConfigurationError(format!(
                    "{} must start with '/', got {:?}",
                    key, endpoint
                )));
            }
        }

        let ports = [
            ("simulator.port", self.simulator.port),
            ("dashboard.port", self.dashboard.port),
            ("simulation_request.port", self.simulation_request.port),
        ];
        for (key, port) in ports {
            if port == 0 {
                return Err(SimulationError::ConfigurationError(format!(
                    "{} must be non-zero",
                    key
                )));
            }
        }

        let address = &self.simulation_request.address;
        // The client is built without a TLS backend
        if !address.starts_with("http://") {
            return Err(SimulationError::ConfigurationError(format!(
                "simulation_request.address must be a plain http:// URL, got {:?}",
                address
            )));
        }
        if self.simulation_request.timeout_secs == 0 {
            return Err(SimulationError::ConfigurationError(
                "simulation_request.timeout_secs must be positive".to_string(),
            ));
        }

        self.engine.validate()
    }

    pub fn simulator_addr(&self) -> String {
        format!("{}:{}", self.simulator.host, self.simulator.port)
    }

    pub fn dashboard_addr(&self) -> String {
        format!("{}:{}", self.dashboard.host, self.dashboard.port)
    }
}
