//! Switchboard HTTP server
//!
//! Starts an Axum web server exposing the endpoint registry, health
//! dashboard, preset store, system-prompt push, and broker relay APIs, and
//! kicks off the background sweep scheduler.

use clap::Parser;
use std::net::SocketAddr;
use switchboard::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                println!("Wrote configuration template to {path}");
            }
            None => print!("{template}"),
        }
        return Ok(());
    }

    // Load configuration
    let config = Config::from_file(&cli.config)?;

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    tracing::info!(
        "Starting Switchboard server on {}:{}",
        config.server.host,
        config.server.port
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let probe_interval = config.probe.interval();

    // Build application state and start the background sweep scheduler
    let state = AppState::new(config)?;
    state.scheduler().start(probe_interval);

    let endpoint_count = state.registry().read().await.len();
    let preset_count = state.presets().read().await.list().len();
    tracing::info!(
        endpoints = endpoint_count,
        presets = preset_count,
        interval_seconds = probe_interval.as_secs(),
        "Monitoring registered endpoints"
    );

    let app = handlers::app(state);

    // Create socket address
    let addr = SocketAddr::from((
        host.parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        port,
    ));

    tracing::info!("Listening on {}", addr);
    tracing::info!("Dashboard snapshot available at http://{}/api/dashboard", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
