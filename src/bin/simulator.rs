use std::sync::Arc;

use bounce_simulation::config::Settings;
use bounce_simulation::service::{self, simulator::SimulationHandler};
use bounce_simulation::telemetry_system::telemetry::init_tracing;
use bounce_simulation::{BounceSimulator, GravityTable};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = Settings::load()?;
    let simulator = BounceSimulator::new(settings.engine)?;
    let handler = Arc::new(SimulationHandler::new(
        Arc::new(GravityTable::standard()),
        simulator,
    ));

    let app = service::simulator::create_router(handler, &settings.simulator);

    let addr = settings.simulator_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        endpoint = %settings.simulator.simulate_endpoint,
        "Starting bouncing ball simulator"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(service::shutdown_signal())
        .await?;

    Ok(())
}
