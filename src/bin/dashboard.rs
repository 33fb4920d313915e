use std::sync::Arc;

use bounce_simulation::config::Settings;
use bounce_simulation::service::{self, dashboard::DashboardState};
use bounce_simulation::telemetry_system::telemetry::init_tracing;
use bounce_simulation::{GravityTable, TrajectoryClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = Settings::load()?;
    let client = TrajectoryClient::from_settings(&settings.simulation_request)?;
    tracing::info!(
        simulator = %client.simulate_url(),
        timeout_secs = client.timeout().as_secs(),
        "Dashboard will forward simulations"
    );

    let state = Arc::new(DashboardState::new(client, Arc::new(GravityTable::standard())));
    let app = service::dashboard::create_router(state, &settings.dashboard);

    let addr = settings.dashboard_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Starting dashboard");

    axum::serve(listener, app)
        .with_graceful_shutdown(service::shutdown_signal())
        .await?;

    Ok(())
}
