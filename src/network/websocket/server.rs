use std::{error::Error, io, net::SocketAddr};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::actors::dispatch::ChannelStrategy;
use crate::config::ServerConfig;
use crate::errors::AppError;
use crate::game::tictactoe::TicTacToe;
use crate::network::websocket::connection::ConnectionHandler;
use crate::session::coordinator::SessionCoordinator;

pub struct WebsocketServer {
    listener: TcpListener,
    default_name: String,
}

impl WebsocketServer {
    pub async fn bind(config: &ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(&config.address).await?;
        Ok(Self {
            listener,
            default_name: config.default_name.clone(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the listener fails or the session stops
    /// processing events, which needs a restart.
    pub async fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        info!("🌐 WebSocket server listening on {}", self.local_addr()?);

        let session = SessionCoordinator::new(TicTacToe::new());
        let (strategy, mut session_handle) = ChannelStrategy::spawn(session);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, addr) = accepted?;
                    info!("🔗 New connection from: {}", addr);

                    let strategy = strategy.clone();
                    let default_name = self.default_name.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            ConnectionHandler::handle_connection(stream, strategy, default_name).await
                        {
                            error!("❌ Error handling connection from {}: {}", addr, e);
                        }
                    });
                }
                stopped = &mut session_handle => {
                    let session = stopped?;
                    error!(
                        clients = session.registry().len(),
                        phase = ?session.phase(),
                        "Session stopped, shutting down server"
                    );
                    return Err(AppError::SessionClosed.into());
                }
            }
        }
    }
}
