// MCP server binary for the Bayarcash payment gateway
use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bayarcash_mcp::{BayarcashClient, BayarcashConfig, MCPServer};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match BayarcashConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "🤖 Starting Bayarcash MCP server ({} {}, {})",
        if config.use_sandbox { "sandbox" } else { "production" },
        config.api_version,
        config.base_url()
    );

    let client = BayarcashClient::new(config)?;
    let server = MCPServer::new(client);

    info!("✅ Bayarcash MCP server running on stdio");
    server.run().await?;

    info!("MCP server shutdown");
    Ok(())
}
