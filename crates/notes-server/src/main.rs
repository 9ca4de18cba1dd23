//! Entry point for the notes-server binary.

use notes_server::{config::ServerConfig, run_server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    tracing::info!("Starting notes-server");
    tracing::info!(
        "Configuration: port={}, log_level={}, cors_allowed_origins={}",
        config.port,
        config.log_level,
        config.cors_allowed_origins
    );

    run_server(config).await
}
