use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tictac_session::cli::Cli;
use tictac_session::config::ServerConfig;
use tictac_session::network::websocket::WebsocketServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::from(Cli::parse());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🎮 Starting tic-tac-toe session server...");
    let server = WebsocketServer::bind(&config).await?;
    server.run().await
}
