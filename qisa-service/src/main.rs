use qisa_service::config::QisaConfig;
use qisa_service::startup::Application;
use service_core::observability::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = QisaConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "qisa-service",
        &config.observability.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!("🚀 API Qisa rodando em http://localhost:{}", app.port());

    let result = app.run_until_stopped().await;
    shutdown_tracing();
    result
}
