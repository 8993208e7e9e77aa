//! Mesh console gateway binary.
//!
//! Bootstrap order: parse CLI → load config → init logging/metrics →
//! bind listener → serve until Ctrl+C.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mesh_console_gateway::config::{load_config, GatewayConfig};
use mesh_console_gateway::lifecycle::Shutdown;
use mesh_console_gateway::observability;
use mesh_console_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "mesh-console-gateway", about = "Reverse-proxy gateway for the mesh console")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    observability::logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_url = %config.web.request_url,
        monitor_url = %config.web.monitor_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.listen_for_ctrl_c();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
