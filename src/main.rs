//! Entry point: load configuration, set up logging, serve.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use devkit_mcp_server::core::config::{Config, LoggingConfig};
use devkit_mcp_server::core::{McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);
    match &config.storage.path {
        Some(path) => info!("Persisting tool inputs to {}", path.display()),
        None => info!("Tool inputs are kept in memory"),
    }
    info!(
        "Prompt builder: {}",
        if config.credentials.openrouter_api_key().is_some() {
            config.prompt_builder.model.as_str()
        } else {
            "disabled (no API key)"
        }
    );

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config);
    transport.run(server).await?;

    info!("Server shut down");
    Ok(())
}

/// Logs go to stderr so the STDIO transport keeps stdout for protocol frames.
/// `RUST_LOG` directives win over `MCP_LOG_LEVEL`.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
