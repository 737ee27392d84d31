use relay_service::config::RelayConfig;
use relay_service::services::metrics::init_metrics;
use relay_service::startup::Application;
use service_core::observability::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration - fail fast if invalid
    let config = RelayConfig::load()?;

    init_tracing("relay-service", "info", config.otlp_endpoint.as_deref())?;
    init_metrics()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.common.port,
        "Starting relay service"
    );

    let app = Application::build(config).await?;
    let result = app.run_until_stopped().await;

    shutdown_tracing();
    result?;
    Ok(())
}
